//! Formulary repository

use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use core_kernel::Ndc;
use domain_benefit::{FormularyEntry, FormularyStatus, Tier};

use crate::error::DatabaseError;

/// A formulary entry together with the formulary it belongs to
#[derive(Debug, Clone)]
pub struct FormularyRecord {
    pub formulary_code: String,
    pub entry: FormularyEntry,
}

/// Database access for formulary coverage rules
#[derive(Debug, Clone)]
pub struct FormularyRepository {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct FormularyRow {
    ndc: String,
    tier: i16,
    status: String,
    quantity_limit: Option<Decimal>,
}

impl FormularyRow {
    fn into_entry(self) -> Result<FormularyEntry, DatabaseError> {
        let ndc = Ndc::new(self.ndc.trim())
            .map_err(|e| DatabaseError::invalid_row(e.to_string()))?;
        let tier = Tier::from_u8(self.tier as u8)
            .ok_or_else(|| DatabaseError::invalid_row(format!("tier {} out of range", self.tier)))?;
        let status = match self.status.as_str() {
            "PREFERRED" => FormularyStatus::Preferred,
            "NON_PREFERRED" => FormularyStatus::NonPreferred,
            "SPECIALTY" => FormularyStatus::Specialty,
            other => {
                return Err(DatabaseError::invalid_row(format!(
                    "unknown formulary status {other:?}"
                )))
            }
        };
        Ok(FormularyEntry {
            ndc,
            tier,
            status,
            quantity_limit: self.quantity_limit,
        })
    }
}

fn status_code(status: FormularyStatus) -> &'static str {
    match status {
        FormularyStatus::Preferred => "PREFERRED",
        FormularyStatus::NonPreferred => "NON_PREFERRED",
        FormularyStatus::Specialty => "SPECIALTY",
    }
}

impl FormularyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Coverage entry for an NDC under a plan, resolved through the plan's
    /// formulary
    pub async fn find_for_plan(
        &self,
        ndc: &str,
        plan_code: &str,
    ) -> Result<Option<FormularyEntry>, DatabaseError> {
        let row = sqlx::query_as::<_, FormularyRow>(
            r#"
            SELECT f.ndc, f.tier, f.status, f.quantity_limit
            FROM formulary_drugs f
            JOIN benefit_plans p ON p.formulary_code = f.formulary_code
            WHERE f.ndc = $1 AND p.plan_code = $2
            "#,
        )
        .bind(ndc)
        .bind(plan_code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(FormularyRow::into_entry).transpose()
    }

    /// Batch-inserts formulary entries, skipping duplicates
    pub async fn insert_batch(&self, records: &[FormularyRecord]) -> Result<u64, DatabaseError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO formulary_drugs (formulary_drug_id, formulary_code, ndc, tier, status, quantity_limit) ",
        );
        builder.push_values(records, |mut b, record| {
            b.push_bind(Uuid::new_v4())
                .push_bind(&record.formulary_code)
                .push_bind(record.entry.ndc.as_str())
                .push_bind(record.entry.tier.as_u8() as i16)
                .push_bind(status_code(record.entry.status))
                .push_bind(record.entry.quantity_limit);
        });
        builder.push(" ON CONFLICT (formulary_code, ndc) DO NOTHING");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
