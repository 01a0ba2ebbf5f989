//! Property-based test data generators

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::Money;
use domain_adjudication::ClaimRequest;
use domain_benefit::Tier;

use crate::fixtures::DateFixtures;

/// An 11-digit NDC
pub fn arb_ndc() -> impl Strategy<Value = String> {
    "[0-9]{11}"
}

/// A string that is NOT a well-formed NDC (wrong length)
pub fn arb_malformed_ndc() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{0,10}",
        "[0-9]{12,16}",
    ]
}

/// Any formulary tier
pub fn arb_tier() -> impl Strategy<Value = Tier> {
    (1..=5u8).prop_map(|v| Tier::from_u8(v).unwrap())
}

/// A structurally valid claim request with varied quantities and costs
pub fn arb_valid_request() -> impl Strategy<Value = ClaimRequest> {
    (
        arb_ndc(),
        1i64..=1000,
        1i32..=90,
        0i32..=11,
        0i64..=10_000_000,
        0i64..=10_000,
    )
        .prop_map(
            |(ndc, quantity, days_supply, refill, ingredient_cents, fee_cents)| ClaimRequest {
                member_id: "M10001".to_string(),
                pharmacy_id: "1234567".to_string(),
                ndc,
                quantity_dispensed: Decimal::from(quantity),
                days_supply,
                refill_number: refill,
                date_of_service: DateFixtures::date_of_service(),
                ingredient_cost: Money::from_cents(ingredient_cents),
                dispensing_fee: Money::from_cents(fee_cents),
            },
        )
}
