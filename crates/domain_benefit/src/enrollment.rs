//! Enrollment entity and coverage-date validity

use chrono::NaiveDate;
use core_kernel::DateRange;
use serde::{Deserialize, Serialize};

/// A member's enrollment in a benefit plan
///
/// An enrollment covers a claim when it is active and the date of service
/// falls inside the effective window; the termination date is inclusive, so
/// a fill on the termination date itself is still covered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub member_number: String,
    pub plan_code: String,
    pub group_number: Option<String>,
    pub effective_date: NaiveDate,
    pub termination_date: Option<NaiveDate>,
    pub relationship: Option<String>,
    pub is_active: bool,
}

impl Enrollment {
    /// Returns true when this enrollment covers the given date of service
    pub fn is_valid_on(&self, date_of_service: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        self.coverage_window().contains(date_of_service)
    }

    /// The effective-to-termination window as a date range
    pub fn coverage_window(&self) -> DateRange {
        DateRange {
            start: self.effective_date,
            end: self.termination_date,
        }
    }
}
