//! Claim pricing
//!
//! Computes the patient/plan split for an approved fill. Tiers 1-3 price by
//! fixed copay; tiers 4-5 price by 30% coinsurance rounded half-up to the
//! cent. The patient share is always clamped to the total cost.

use core_kernel::{Money, Rate};
use domain_benefit::Tier;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Coinsurance rate applied to specialty tiers
fn coinsurance_rate() -> Rate {
    Rate::new(dec!(0.30))
}

/// Fixed copay by formulary tier
///
/// All five tiers are defined. Tiers 4-5 always take the coinsurance branch
/// in [`price`], so their copay values are inert under the current benefit
/// design; a plan configuration pricing specialty tiers by copay would read
/// them from here.
pub fn copay_for_tier(tier: Tier) -> Money {
    match tier {
        Tier::Generic => Money::new(dec!(10.00)),
        Tier::PreferredBrand => Money::new(dec!(25.00)),
        Tier::NonPreferredBrand => Money::new(dec!(50.00)),
        Tier::Specialty => Money::new(dec!(100.00)),
        Tier::HighCostSpecialty => Money::new(dec!(150.00)),
    }
}

/// Computed cost split for an approved claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricingResult {
    pub patient_pay: Money,
    pub plan_pay: Money,
    pub total_cost: Money,
    pub deductible_applied: Money,
    pub out_of_pocket_applied: Money,
}

/// Prices a fill
///
/// total = ingredient cost + dispensing fee; the patient share is the tier
/// copay (tiers 1-3) or 30% coinsurance (tiers 4-5), never more than the
/// total. Deductible is fixed at zero in this simulation; a production
/// implementation would apply remaining deductible before coinsurance.
pub fn price(ingredient_cost: Money, dispensing_fee: Money, tier: Tier) -> PricingResult {
    let total_cost = ingredient_cost + dispensing_fee;

    let patient_pay = if tier.is_specialty() {
        coinsurance_rate().apply(total_cost)
    } else {
        copay_for_tier(tier)
    };
    let patient_pay = patient_pay.min(total_cost);

    let plan_pay = total_cost - patient_pay;

    PricingResult {
        patient_pay,
        plan_pay,
        total_cost,
        deductible_applied: Money::zero(),
        out_of_pocket_applied: patient_pay,
    }
}
