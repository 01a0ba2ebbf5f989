//! Benefit domain errors

use thiserror::Error;

/// Errors that can occur in the benefit reference-data domain
#[derive(Debug, Error)]
pub enum BenefitError {
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    #[error("Invalid tier value: {0}")]
    InvalidTier(u8),

    #[error("Invalid enrollment window for member {member_number}")]
    InvalidEnrollmentWindow { member_number: String },
}
