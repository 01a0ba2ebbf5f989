//! NCPDP-style response codes and the pipeline's response envelope

use serde::{Serialize, Serializer};
use std::fmt;

use crate::claim::Claim;
use crate::pricing::PricingResult;

/// Adjudication response code
///
/// The wire values reproduce the NCPDP-style table exactly. Note that
/// `PharmacyNotInNetwork` and `PriorAuthorizationRequired` both transmit as
/// "75" — a known collision carried forward for downstream compatibility.
/// In-process callers distinguish them by variant; wire consumers only by
/// the response message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// All checks passed
    Approved,
    /// Structural format failure
    InvalidRequestFormat,
    /// No active enrollment on the date of service
    PatientNotCovered,
    /// Dispensing pharmacy not in the plan's network
    PharmacyNotInNetwork,
    /// Drug not on the plan's formulary
    ProductNotCovered,
    /// Clinical (DUR) rejection; the message carries the reason text
    ClinicalReject,
    /// Specialty-tier drug with no authorization on file
    PriorAuthorizationRequired,
    /// Quantity or days-supply limit exceeded
    PlanLimitationsExceeded,
    /// Unexpected internal failure absorbed at the pipeline boundary
    HostProcessingError,
}

impl ResponseCode {
    /// The transmitted code value
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::Approved => "0",
            ResponseCode::InvalidRequestFormat => "M0",
            ResponseCode::PatientNotCovered => "85",
            ResponseCode::PharmacyNotInNetwork => "75",
            ResponseCode::ProductNotCovered => "70",
            ResponseCode::ClinicalReject => "88",
            ResponseCode::PriorAuthorizationRequired => "75",
            ResponseCode::PlanLimitationsExceeded => "76",
            ResponseCode::HostProcessingError => "99",
        }
    }

    /// Standard message text for codes with a fixed message
    ///
    /// `ClinicalReject` and `HostProcessingError` responses carry
    /// situation-specific text instead.
    pub fn standard_message(&self) -> &'static str {
        match self {
            ResponseCode::Approved => "Approved",
            ResponseCode::InvalidRequestFormat => "Invalid Request Format",
            ResponseCode::PatientNotCovered => "Patient Not Covered",
            ResponseCode::PharmacyNotInNetwork => "Pharmacy Not In Network",
            ResponseCode::ProductNotCovered => "Product Not Covered",
            ResponseCode::ClinicalReject => "DUR Reject",
            ResponseCode::PriorAuthorizationRequired => "Prior Authorization Required",
            ResponseCode::PlanLimitationsExceeded => "Plan Limitations Exceeded",
            ResponseCode::HostProcessingError => "Host Processing Error",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ResponseCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Result of one adjudication call
#[derive(Debug, Clone, Serialize)]
pub struct ClaimResponse {
    /// The durable claim record, stamped with the terminal outcome
    pub claim: Claim,
    pub approved: bool,
    /// Present only on approval
    pub pricing: Option<PricingResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table_values() {
        assert_eq!(ResponseCode::Approved.as_str(), "0");
        assert_eq!(ResponseCode::InvalidRequestFormat.as_str(), "M0");
        assert_eq!(ResponseCode::PatientNotCovered.as_str(), "85");
        assert_eq!(ResponseCode::ProductNotCovered.as_str(), "70");
        assert_eq!(ResponseCode::ClinicalReject.as_str(), "88");
        assert_eq!(ResponseCode::PlanLimitationsExceeded.as_str(), "76");
        assert_eq!(ResponseCode::HostProcessingError.as_str(), "99");
    }

    #[test]
    fn test_code_75_collision_is_preserved() {
        // Two distinct rejection reasons intentionally share a wire code.
        assert_eq!(ResponseCode::PharmacyNotInNetwork.as_str(), "75");
        assert_eq!(ResponseCode::PriorAuthorizationRequired.as_str(), "75");
        assert_ne!(
            ResponseCode::PharmacyNotInNetwork,
            ResponseCode::PriorAuthorizationRequired
        );
        assert_ne!(
            ResponseCode::PharmacyNotInNetwork.standard_message(),
            ResponseCode::PriorAuthorizationRequired.standard_message()
        );
    }

    #[test]
    fn test_serializes_as_code_string() {
        let json = serde_json::to_string(&ResponseCode::PatientNotCovered).unwrap();
        assert_eq!(json, "\"85\"");
    }
}
