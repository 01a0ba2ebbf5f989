//! Pre-built test data

use chrono::NaiveDate;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

use core_kernel::{Money, Ndc};
use domain_benefit::{FormularyEntry, FormularyStatus, Gender, Member, Tier};

/// Well-known dates used across tests
pub struct DateFixtures;

impl DateFixtures {
    /// Standard date of service
    pub fn date_of_service() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    /// Plan-year start
    pub fn plan_effective() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    /// Plan-year end
    pub fn plan_termination() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
    }
}

/// Well-known money amounts
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn ingredient_cost() -> Money {
        Money::new(dec!(100.00))
    }

    pub fn dispensing_fee() -> Money {
        Money::new(dec!(2.50))
    }
}

/// Well-known identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn member_number() -> &'static str {
        "M10001"
    }

    pub fn ncpdp_id() -> &'static str {
        "1234567"
    }

    pub fn plan_code() -> &'static str {
        "GOLD-PPO"
    }

    pub fn ndc() -> &'static str {
        "12345678901"
    }
}

/// One formulary entry per tier, all for distinct NDCs
pub static STANDARD_FORMULARY: Lazy<Vec<FormularyEntry>> = Lazy::new(|| {
    (1..=5u8)
        .map(|tier_value| {
            let tier = Tier::from_u8(tier_value).unwrap();
            FormularyEntry {
                ndc: Ndc::new(format!("1234567890{tier_value}")).unwrap(),
                tier,
                status: FormularyStatus::Preferred,
                quantity_limit: tier.is_specialty().then(|| dec!(30)),
            }
        })
        .collect()
});

/// Generates `count` synthetic members with sequential member numbers
pub fn synthetic_members(count: usize) -> Vec<Member> {
    (0..count)
        .map(|i| Member {
            member_number: format!("M{:05}", 10001 + i),
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            date_of_birth: NaiveDate::from_ymd_opt(1970 + (i % 40) as i32, 1 + (i % 12) as u32, 15)
                .unwrap(),
            gender: if i % 2 == 0 { Gender::F } else { Gender::M },
        })
        .collect()
}
