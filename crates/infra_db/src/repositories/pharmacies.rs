//! Pharmacy and network repository

use chrono::NaiveDate;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use domain_benefit::{NetworkAssignment, Pharmacy, PharmacyType};

use crate::error::DatabaseError;

/// Database access for pharmacies and their network assignments
#[derive(Debug, Clone)]
pub struct PharmacyRepository {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct PharmacyRow {
    ncpdp_id: String,
    pharmacy_name: String,
    npi: Option<String>,
    pharmacy_type: String,
    is_active: bool,
}

impl PharmacyRow {
    fn into_pharmacy(self) -> Result<Pharmacy, DatabaseError> {
        let pharmacy_type = match self.pharmacy_type.as_str() {
            "RETAIL" => PharmacyType::Retail,
            "MAIL_ORDER" => PharmacyType::MailOrder,
            "SPECIALTY" => PharmacyType::Specialty,
            "LONG_TERM_CARE" => PharmacyType::LongTermCare,
            other => {
                return Err(DatabaseError::invalid_row(format!(
                    "unknown pharmacy type {other:?} for {}",
                    self.ncpdp_id
                )))
            }
        };
        Ok(Pharmacy {
            ncpdp_id: self.ncpdp_id,
            pharmacy_name: self.pharmacy_name,
            npi: self.npi,
            pharmacy_type,
            is_active: self.is_active,
        })
    }
}

fn pharmacy_type_code(pharmacy_type: PharmacyType) -> &'static str {
    match pharmacy_type {
        PharmacyType::Retail => "RETAIL",
        PharmacyType::MailOrder => "MAIL_ORDER",
        PharmacyType::Specialty => "SPECIALTY",
        PharmacyType::LongTermCare => "LONG_TERM_CARE",
    }
}

impl PharmacyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Looks up a pharmacy by NCPDP id
    pub async fn find_by_ncpdp_id(
        &self,
        ncpdp_id: &str,
    ) -> Result<Option<Pharmacy>, DatabaseError> {
        let row = sqlx::query_as::<_, PharmacyRow>(
            r#"
            SELECT ncpdp_id, pharmacy_name, npi, pharmacy_type, is_active
            FROM pharmacies
            WHERE ncpdp_id = $1
            "#,
        )
        .bind(ncpdp_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PharmacyRow::into_pharmacy).transpose()
    }

    /// True when the pharmacy has a network assignment in force for the plan
    pub async fn is_in_network(
        &self,
        ncpdp_id: &str,
        plan_code: &str,
        as_of: NaiveDate,
    ) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM pharmacy_networks
                WHERE ncpdp_id = $1
                  AND plan_code = $2
                  AND effective_date <= $3
                  AND (termination_date IS NULL OR termination_date >= $3)
            )
            "#,
        )
        .bind(ncpdp_id)
        .bind(plan_code)
        .bind(as_of)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Batch-inserts pharmacies, skipping duplicates on NCPDP id
    pub async fn insert_batch(&self, pharmacies: &[Pharmacy]) -> Result<u64, DatabaseError> {
        if pharmacies.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO pharmacies (pharmacy_id, ncpdp_id, pharmacy_name, npi, pharmacy_type, is_active) ",
        );
        builder.push_values(pharmacies, |mut b, pharmacy| {
            b.push_bind(Uuid::new_v4())
                .push_bind(&pharmacy.ncpdp_id)
                .push_bind(&pharmacy.pharmacy_name)
                .push_bind(&pharmacy.npi)
                .push_bind(pharmacy_type_code(pharmacy.pharmacy_type))
                .push_bind(pharmacy.is_active);
        });
        builder.push(" ON CONFLICT (ncpdp_id) DO NOTHING");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Batch-inserts network assignments
    pub async fn insert_network_batch(
        &self,
        assignments: &[NetworkAssignment],
    ) -> Result<u64, DatabaseError> {
        if assignments.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO pharmacy_networks (network_id, ncpdp_id, plan_code, effective_date, \
             termination_date, is_preferred) ",
        );
        builder.push_values(assignments, |mut b, assignment| {
            b.push_bind(Uuid::new_v4())
                .push_bind(&assignment.ncpdp_id)
                .push_bind(&assignment.plan_code)
                .push_bind(assignment.effective_date)
                .push_bind(assignment.termination_date)
                .push_bind(assignment.is_preferred);
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
