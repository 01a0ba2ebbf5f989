//! Formulary coverage rules
//!
//! A formulary entry links an NDC to a cost-sharing tier and the
//! utilization-management flags the pipeline enforces: prior authorization
//! and quantity limits.

use core_kernel::Ndc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Formulary cost-sharing tier
///
/// Tiers 1-3 price by fixed copay; tiers 4-5 price by coinsurance and
/// require prior authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tier {
    Generic = 1,
    PreferredBrand = 2,
    NonPreferredBrand = 3,
    Specialty = 4,
    HighCostSpecialty = 5,
}

impl Tier {
    /// Numeric tier value (1-5)
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parses a numeric tier value
    pub fn from_u8(value: u8) -> Option<Tier> {
        match value {
            1 => Some(Tier::Generic),
            2 => Some(Tier::PreferredBrand),
            3 => Some(Tier::NonPreferredBrand),
            4 => Some(Tier::Specialty),
            5 => Some(Tier::HighCostSpecialty),
            _ => None,
        }
    }

    /// True for the specialty tiers (4-5)
    pub fn is_specialty(self) -> bool {
        self.as_u8() >= 4
    }
}

impl TryFrom<u8> for Tier {
    type Error = crate::error::BenefitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::from_u8(value).ok_or(crate::error::BenefitError::InvalidTier(value))
    }
}

/// Coverage status of a drug on a formulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormularyStatus {
    Preferred,
    NonPreferred,
    Specialty,
}

/// A drug's coverage entry on a plan's formulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormularyEntry {
    pub ndc: Ndc,
    pub tier: Tier,
    pub status: FormularyStatus,
    /// Maximum dispensable quantity per fill, when the tier carries a limit
    pub quantity_limit: Option<Decimal>,
}

impl FormularyEntry {
    /// Specialty tiers require an authorization on file before payment
    pub fn requires_prior_auth(&self) -> bool {
        self.tier.is_specialty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(tier: Tier) -> FormularyEntry {
        FormularyEntry {
            ndc: Ndc::new("12345678901").unwrap(),
            tier,
            status: FormularyStatus::Preferred,
            quantity_limit: if tier.is_specialty() { Some(dec!(30)) } else { None },
        }
    }

    #[test]
    fn test_tier_round_trip() {
        for value in 1..=5u8 {
            let tier = Tier::from_u8(value).unwrap();
            assert_eq!(tier.as_u8(), value);
        }
        assert!(Tier::from_u8(0).is_none());
        assert!(Tier::from_u8(6).is_none());
    }

    #[test]
    fn test_tier_try_from_reports_bad_values() {
        assert_eq!(Tier::try_from(3).unwrap(), Tier::NonPreferredBrand);
        let err = Tier::try_from(9).unwrap_err();
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn test_prior_auth_derivation_threshold() {
        assert!(!entry(Tier::Generic).requires_prior_auth());
        assert!(!entry(Tier::PreferredBrand).requires_prior_auth());
        assert!(!entry(Tier::NonPreferredBrand).requires_prior_auth());
        assert!(entry(Tier::Specialty).requires_prior_auth());
        assert!(entry(Tier::HighCostSpecialty).requires_prior_auth());
    }

    #[test]
    fn test_specialty_tiers_carry_quantity_limit() {
        assert!(entry(Tier::NonPreferredBrand).quantity_limit.is_none());
        assert_eq!(entry(Tier::Specialty).quantity_limit, Some(dec!(30)));
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Generic < Tier::Specialty);
        assert!(Tier::Specialty < Tier::HighCostSpecialty);
    }
}
