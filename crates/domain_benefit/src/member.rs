//! Member entity

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Member gender as carried on the eligibility file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
    /// Unknown / not reported
    U,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::U
    }
}

/// A pharmacy benefit member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Business key used on claims and enrollment records
    pub member_number: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
}

impl Member {
    /// Member age in whole years on a given date
    pub fn age_on(&self, date: NaiveDate) -> i32 {
        let mut age = date.years_since(self.date_of_birth).unwrap_or(0) as i32;
        if self.date_of_birth > date {
            age = 0;
        }
        age
    }
}
