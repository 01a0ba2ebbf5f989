//! Postgres eligibility adapter

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{DomainPort, PortError};
use domain_adjudication::EligibilityPort;
use domain_benefit::Enrollment;

use crate::repositories::{EnrollmentRepository, MemberRepository};
use crate::DatabasePool;

/// Resolves eligibility against the member and enrollment tables
#[derive(Debug, Clone)]
pub struct PostgresEligibilityAdapter {
    members: MemberRepository,
    enrollments: EnrollmentRepository,
}

impl PostgresEligibilityAdapter {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            members: MemberRepository::new(pool.clone()),
            enrollments: EnrollmentRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresEligibilityAdapter {}

#[async_trait]
impl EligibilityPort for PostgresEligibilityAdapter {
    async fn active_enrollment(
        &self,
        member_number: &str,
        date_of_service: NaiveDate,
    ) -> Result<Option<Enrollment>, PortError> {
        // Unknown member and no-active-enrollment both resolve to None;
        // the pipeline maps either to a not-covered rejection.
        let member = self
            .members
            .find_by_member_number(member_number)
            .await
            .map_err(|e| PortError::connection(e.to_string()))?;
        if member.is_none() {
            return Ok(None);
        }

        self.enrollments
            .find_active_on(member_number, date_of_service)
            .await
            .map_err(|e| PortError::connection(e.to_string()))
    }
}
