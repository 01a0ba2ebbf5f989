//! Benefit plan entity

use serde::{Deserialize, Serialize};

/// Plan funding/product type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    Commercial,
    MedicarePartD,
    Medicaid,
    Exchange,
}

/// A pharmacy benefit plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenefitPlan {
    /// Business key referenced by enrollments and network contracts
    pub plan_code: String,
    pub plan_name: String,
    pub plan_type: PlanType,
    /// Formulary this plan prices against
    pub formulary_code: String,
}
