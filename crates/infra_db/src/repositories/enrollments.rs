//! Enrollment repository

use chrono::NaiveDate;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use domain_benefit::Enrollment;

use crate::error::DatabaseError;

/// Database access for the enrollment file
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct EnrollmentRow {
    member_number: String,
    plan_code: String,
    group_number: Option<String>,
    effective_date: NaiveDate,
    termination_date: Option<NaiveDate>,
    relationship: Option<String>,
    is_active: bool,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        Enrollment {
            member_number: row.member_number,
            plan_code: row.plan_code,
            group_number: row.group_number,
            effective_date: row.effective_date,
            termination_date: row.termination_date,
            relationship: row.relationship,
            is_active: row.is_active,
        }
    }
}

const SELECT_COLUMNS: &str = "member_number, plan_code, group_number, effective_date, \
                              termination_date, relationship, is_active";

impl EnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All enrollments on file for a member
    pub async fn find_by_member_number(
        &self,
        member_number: &str,
    ) -> Result<Vec<Enrollment>, DatabaseError> {
        let rows = sqlx::query_as::<_, EnrollmentRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM enrollments WHERE member_number = $1"
        ))
        .bind(member_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Enrollment::from).collect())
    }

    /// The enrollment in force for a member on a given date, if any
    pub async fn find_active_on(
        &self,
        member_number: &str,
        date_of_service: NaiveDate,
    ) -> Result<Option<Enrollment>, DatabaseError> {
        let row = sqlx::query_as::<_, EnrollmentRow>(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM enrollments
            WHERE member_number = $1
              AND is_active
              AND effective_date <= $2
              AND (termination_date IS NULL OR termination_date >= $2)
            ORDER BY effective_date DESC
            LIMIT 1
            "#
        ))
        .bind(member_number)
        .bind(date_of_service)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Enrollment::from))
    }

    /// Batch-inserts enrollment records
    pub async fn insert_batch(&self, enrollments: &[Enrollment]) -> Result<u64, DatabaseError> {
        if enrollments.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO enrollments (enrollment_id, member_number, plan_code, group_number, \
             effective_date, termination_date, relationship, is_active) ",
        );
        builder.push_values(enrollments, |mut b, enrollment| {
            b.push_bind(Uuid::new_v4())
                .push_bind(&enrollment.member_number)
                .push_bind(&enrollment.plan_code)
                .push_bind(&enrollment.group_number)
                .push_bind(enrollment.effective_date)
                .push_bind(enrollment.termination_date)
                .push_bind(&enrollment.relationship)
                .push_bind(enrollment.is_active);
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
