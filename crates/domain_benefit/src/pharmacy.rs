//! Pharmacy and network assignment entities

use chrono::NaiveDate;
use core_kernel::DateRange;
use serde::{Deserialize, Serialize};

/// Dispensing channel of a pharmacy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PharmacyType {
    Retail,
    MailOrder,
    Specialty,
    LongTermCare,
}

/// A dispensing pharmacy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pharmacy {
    /// NCPDP identifier used on claims
    pub ncpdp_id: String,
    pub pharmacy_name: String,
    pub npi: Option<String>,
    pub pharmacy_type: PharmacyType,
    pub is_active: bool,
}

/// A pharmacy's participation in a plan's network over a date window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkAssignment {
    pub ncpdp_id: String,
    pub plan_code: String,
    pub effective_date: NaiveDate,
    pub termination_date: Option<NaiveDate>,
    pub is_preferred: bool,
}

impl NetworkAssignment {
    /// Returns true when the assignment is in force on the given date
    pub fn is_in_force_on(&self, date: NaiveDate) -> bool {
        DateRange {
            start: self.effective_date,
            end: self.termination_date,
        }
        .contains(date)
    }
}
