//! Test data builders
//!
//! Builders start from the clean tier-1 approval scenario; tests override
//! only the fields under test.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Money, Ndc};
use domain_adjudication::ClaimRequest;
use domain_benefit::{Enrollment, FormularyEntry, FormularyStatus, Tier};

use crate::fixtures::{DateFixtures, IdFixtures, MoneyFixtures};

/// Builder for claim requests
pub struct ClaimRequestBuilder {
    request: ClaimRequest,
}

impl Default for ClaimRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: ClaimRequest {
                member_id: IdFixtures::member_number().to_string(),
                pharmacy_id: IdFixtures::ncpdp_id().to_string(),
                ndc: IdFixtures::ndc().to_string(),
                quantity_dispensed: dec!(30),
                days_supply: 30,
                refill_number: 0,
                date_of_service: DateFixtures::date_of_service(),
                ingredient_cost: MoneyFixtures::ingredient_cost(),
                dispensing_fee: MoneyFixtures::dispensing_fee(),
            },
        }
    }

    pub fn with_member_id(mut self, member_id: impl Into<String>) -> Self {
        self.request.member_id = member_id.into();
        self
    }

    pub fn with_pharmacy_id(mut self, pharmacy_id: impl Into<String>) -> Self {
        self.request.pharmacy_id = pharmacy_id.into();
        self
    }

    pub fn with_ndc(mut self, ndc: impl Into<String>) -> Self {
        self.request.ndc = ndc.into();
        self
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.request.quantity_dispensed = quantity;
        self
    }

    pub fn with_days_supply(mut self, days_supply: i32) -> Self {
        self.request.days_supply = days_supply;
        self
    }

    pub fn with_date_of_service(mut self, date: NaiveDate) -> Self {
        self.request.date_of_service = date;
        self
    }

    pub fn with_costs(mut self, ingredient_cost: Money, dispensing_fee: Money) -> Self {
        self.request.ingredient_cost = ingredient_cost;
        self.request.dispensing_fee = dispensing_fee;
        self
    }

    pub fn build(self) -> ClaimRequest {
        self.request
    }
}

/// Builder for enrollments
pub struct EnrollmentBuilder {
    enrollment: Enrollment,
}

impl Default for EnrollmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrollmentBuilder {
    pub fn new() -> Self {
        Self {
            enrollment: Enrollment {
                member_number: IdFixtures::member_number().to_string(),
                plan_code: IdFixtures::plan_code().to_string(),
                group_number: Some("G100".to_string()),
                effective_date: DateFixtures::plan_effective(),
                termination_date: None,
                relationship: Some("SELF".to_string()),
                is_active: true,
            },
        }
    }

    pub fn with_member_number(mut self, member_number: impl Into<String>) -> Self {
        self.enrollment.member_number = member_number.into();
        self
    }

    pub fn with_plan_code(mut self, plan_code: impl Into<String>) -> Self {
        self.enrollment.plan_code = plan_code.into();
        self
    }

    pub fn with_effective_date(mut self, date: NaiveDate) -> Self {
        self.enrollment.effective_date = date;
        self
    }

    pub fn with_termination_date(mut self, date: NaiveDate) -> Self {
        self.enrollment.termination_date = Some(date);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.enrollment.is_active = false;
        self
    }

    pub fn build(self) -> Enrollment {
        self.enrollment
    }
}

/// Builder for formulary entries
pub struct FormularyEntryBuilder {
    entry: FormularyEntry,
}

impl Default for FormularyEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormularyEntryBuilder {
    pub fn new() -> Self {
        Self {
            entry: FormularyEntry {
                ndc: Ndc::new(IdFixtures::ndc()).unwrap(),
                tier: Tier::Generic,
                status: FormularyStatus::Preferred,
                quantity_limit: None,
            },
        }
    }

    pub fn with_ndc(mut self, ndc: &str) -> Self {
        self.entry.ndc = Ndc::new(ndc).expect("builder requires a well-formed NDC");
        self
    }

    /// Sets the tier, applying the specialty quantity limit convention
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.entry.tier = tier;
        self.entry.quantity_limit = tier.is_specialty().then(|| dec!(30));
        self
    }

    pub fn with_quantity_limit(mut self, limit: Decimal) -> Self {
        self.entry.quantity_limit = Some(limit);
        self
    }

    pub fn with_status(mut self, status: FormularyStatus) -> Self {
        self.entry.status = status;
        self
    }

    pub fn build(self) -> FormularyEntry {
        self.entry
    }
}
