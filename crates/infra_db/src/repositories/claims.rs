//! Adjudicated-claim repository
//!
//! The pipeline owns the claim record until it returns; this repository only
//! ever inserts terminal records. Corrections are new claims, so there is no
//! update path.

use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use domain_adjudication::Claim;

use crate::error::DatabaseError;

/// Database access for adjudicated claims
#[derive(Debug, Clone)]
pub struct ClaimRepository {
    pool: PgPool,
}

impl ClaimRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts one adjudicated claim
    pub async fn insert(&self, claim: &Claim) -> Result<(), DatabaseError> {
        self.insert_batch(std::slice::from_ref(claim)).await?;
        Ok(())
    }

    /// Batch-inserts adjudicated claims
    pub async fn insert_batch(&self, claims: &[Claim]) -> Result<u64, DatabaseError> {
        if claims.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO claims (claim_id, claim_number, transaction_type, member_id, \
             pharmacy_id, ndc, quantity_dispensed, days_supply, refill_number, \
             date_of_service, ingredient_cost, dispensing_fee, status, response_code, \
             response_message, patient_pay, plan_pay, deductible_applied, \
             out_of_pocket_applied, processing_time_ms, processed_at) ",
        );
        builder.push_values(claims, |mut b, claim| {
            b.push_bind(Uuid::from(claim.id))
                .push_bind(&claim.claim_number)
                .push_bind(&claim.transaction_type)
                .push_bind(&claim.member_id)
                .push_bind(&claim.pharmacy_id)
                .push_bind(&claim.ndc)
                .push_bind(claim.quantity_dispensed)
                .push_bind(claim.days_supply)
                .push_bind(claim.refill_number)
                .push_bind(claim.date_of_service)
                .push_bind(claim.ingredient_cost_submitted.amount())
                .push_bind(claim.dispensing_fee_submitted.amount())
                .push_bind(claim.status.as_str())
                .push_bind(claim.response_code.as_str())
                .push_bind(&claim.response_message)
                .push_bind(claim.patient_pay.map(|m| m.amount()))
                .push_bind(claim.plan_pay.map(|m| m.amount()))
                .push_bind(claim.deductible_applied.map(|m| m.amount()))
                .push_bind(claim.out_of_pocket_applied.map(|m| m.amount()))
                .push_bind(claim.processing_time_ms as i64)
                .push_bind(claim.processed_at);
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Total number of persisted claims
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM claims")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of persisted claims with the given status
    pub async fn count_by_status(&self, status: &str) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM claims WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Average pipeline processing time across persisted claims, in ms
    pub async fn average_processing_time_ms(&self) -> Result<f64, DatabaseError> {
        let (avg,): (Option<f64>,) =
            sqlx::query_as("SELECT AVG(processing_time_ms)::double precision FROM claims")
                .fetch_one(&self.pool)
                .await?;
        Ok(avg.unwrap_or(0.0))
    }
}
