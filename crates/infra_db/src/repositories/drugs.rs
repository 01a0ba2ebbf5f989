//! Drug file repository

use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use core_kernel::Ndc;
use domain_benefit::Drug;

use crate::error::DatabaseError;

/// Database access for the drug file
#[derive(Debug, Clone)]
pub struct DrugRepository {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct DrugRow {
    ndc: String,
    label_name: String,
    strength: Option<String>,
    is_generic: bool,
}

impl DrugRow {
    fn into_drug(self) -> Result<Drug, DatabaseError> {
        let ndc = Ndc::new(self.ndc.trim())
            .map_err(|e| DatabaseError::invalid_row(e.to_string()))?;
        Ok(Drug {
            ndc,
            label_name: self.label_name,
            strength: self.strength,
            is_generic: self.is_generic,
        })
    }
}

impl DrugRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Looks up a drug by NDC
    pub async fn find_by_ndc(&self, ndc: &str) -> Result<Option<Drug>, DatabaseError> {
        let row = sqlx::query_as::<_, DrugRow>(
            r#"
            SELECT ndc, label_name, strength, is_generic
            FROM drugs
            WHERE ndc = $1
            "#,
        )
        .bind(ndc)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DrugRow::into_drug).transpose()
    }

    /// Batch-inserts drugs, skipping duplicates on NDC
    pub async fn insert_batch(&self, drugs: &[Drug]) -> Result<u64, DatabaseError> {
        if drugs.is_empty() {
            return Ok(0);
        }

        let mut builder =
            QueryBuilder::new("INSERT INTO drugs (drug_id, ndc, label_name, strength, is_generic) ");
        builder.push_values(drugs, |mut b, drug| {
            b.push_bind(Uuid::new_v4())
                .push_bind(drug.ndc.as_str())
                .push_bind(&drug.label_name)
                .push_bind(&drug.strength)
                .push_bind(drug.is_generic);
        });
        builder.push(" ON CONFLICT (ndc) DO NOTHING");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
