//! Drug Utilization Review outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinical rejection reasons produced by DUR screening
///
/// The set is fixed; the description text is the response message transmitted
/// with code 88.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurReason {
    DrugDrugInteraction,
    TherapeuticDuplication,
    AgeRestriction,
    GenderRestriction,
}

impl DurReason {
    pub const ALL: [DurReason; 4] = [
        DurReason::DrugDrugInteraction,
        DurReason::TherapeuticDuplication,
        DurReason::AgeRestriction,
        DurReason::GenderRestriction,
    ];

    /// Message text transmitted with the rejection
    pub fn description(&self) -> &'static str {
        match self {
            DurReason::DrugDrugInteraction => "Drug-Drug Interaction Detected",
            DurReason::TherapeuticDuplication => "Therapeutic Duplication",
            DurReason::AgeRestriction => "Age Restriction",
            DurReason::GenderRestriction => "Gender Restriction",
        }
    }
}

impl fmt::Display for DurReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
