//! Claim fill request

use chrono::NaiveDate;
use core_kernel::{Money, Ndc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point-of-sale fill request submitted for adjudication
///
/// Constructed by the caller and never mutated by the pipeline. Fields that
/// arrive empty on the wire are carried as empty strings; format validation
/// decides whether the request is processable at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRequest {
    /// Member number on the submitted claim
    pub member_id: String,
    /// NCPDP identifier of the dispensing pharmacy
    pub pharmacy_id: String,
    /// 11-character National Drug Code of the dispensed product
    pub ndc: String,
    pub quantity_dispensed: Decimal,
    pub days_supply: i32,
    pub refill_number: i32,
    pub date_of_service: NaiveDate,
    pub ingredient_cost: Money,
    pub dispensing_fee: Money,
}

impl ClaimRequest {
    /// Structural format check
    ///
    /// Rejects (as code M0) any request missing a member or pharmacy
    /// identifier, carrying a non-11-character NDC, or with a non-positive
    /// quantity or days supply. Purely a predicate: no lookups, no side
    /// effects.
    pub fn validate(&self) -> bool {
        if self.member_id.is_empty() {
            return false;
        }
        if self.pharmacy_id.is_empty() {
            return false;
        }
        if !Ndc::is_valid_format(&self.ndc) {
            return false;
        }
        if self.quantity_dispensed <= Decimal::ZERO {
            return false;
        }
        if self.days_supply <= 0 {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_request() -> ClaimRequest {
        ClaimRequest {
            member_id: "M10001".to_string(),
            pharmacy_id: "1234567".to_string(),
            ndc: "12345678901".to_string(),
            quantity_dispensed: dec!(30),
            days_supply: 30,
            refill_number: 0,
            date_of_service: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            ingredient_cost: Money::new(dec!(100.00)),
            dispensing_fee: Money::new(dec!(2.50)),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate());
    }

    #[test]
    fn test_missing_member_id() {
        let mut request = valid_request();
        request.member_id = String::new();
        assert!(!request.validate());
    }

    #[test]
    fn test_missing_pharmacy_id() {
        let mut request = valid_request();
        request.pharmacy_id = String::new();
        assert!(!request.validate());
    }

    #[test]
    fn test_ndc_must_be_eleven_characters() {
        let mut request = valid_request();
        request.ndc = "123".to_string();
        assert!(!request.validate());

        request.ndc = "123456789012".to_string();
        assert!(!request.validate());

        request.ndc = String::new();
        assert!(!request.validate());
    }

    #[test]
    fn test_quantity_must_be_positive() {
        let mut request = valid_request();
        request.quantity_dispensed = dec!(0);
        assert!(!request.validate());

        request.quantity_dispensed = dec!(-1);
        assert!(!request.validate());
    }

    #[test]
    fn test_days_supply_must_be_positive() {
        let mut request = valid_request();
        request.days_supply = 0;
        assert!(!request.validate());

        request.days_supply = -30;
        assert!(!request.validate());
    }
}
