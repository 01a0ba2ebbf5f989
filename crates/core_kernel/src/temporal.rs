//! Date-range handling for coverage windows
//!
//! Enrollments and network contracts are effective over calendar-date windows:
//! an effective date and an optional termination date, both inclusive. A claim
//! is covered when its date of service falls inside the window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// An inclusive calendar-date window, open-ended when `end` is None
///
/// Both bounds are inclusive: an enrollment terminating on the date of
/// service still covers that fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Start of the window (inclusive)
    pub start: NaiveDate,
    /// End of the window (inclusive), None means open-ended
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a new date range
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, TemporalError> {
        if let Some(end) = end {
            if start > end {
                return Err(TemporalError::InvalidRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// Creates an open-ended range starting at `start`
    pub fn starting(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    /// Returns true when `date` falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.start {
            return false;
        }
        match self.end {
            Some(end) => date <= end,
            None => true,
        }
    }

    /// Returns true when the range has ended as of `date`
    pub fn has_ended_by(&self, date: NaiveDate) -> bool {
        matches!(self.end, Some(end) if end < date)
    }
}
