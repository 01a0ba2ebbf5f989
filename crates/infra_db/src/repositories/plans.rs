//! Benefit plan repository

use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use domain_benefit::{BenefitPlan, PlanType};

use crate::error::DatabaseError;

/// Database access for benefit plans
#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    plan_code: String,
    plan_name: String,
    plan_type: String,
    formulary_code: String,
}

impl PlanRow {
    fn into_plan(self) -> Result<BenefitPlan, DatabaseError> {
        let plan_type = match self.plan_type.as_str() {
            "COMMERCIAL" => PlanType::Commercial,
            "MEDICARE_PART_D" => PlanType::MedicarePartD,
            "MEDICAID" => PlanType::Medicaid,
            "EXCHANGE" => PlanType::Exchange,
            other => {
                return Err(DatabaseError::invalid_row(format!(
                    "unknown plan type {other:?} for plan {}",
                    self.plan_code
                )))
            }
        };
        Ok(BenefitPlan {
            plan_code: self.plan_code,
            plan_name: self.plan_name,
            plan_type,
            formulary_code: self.formulary_code,
        })
    }
}

fn plan_type_code(plan_type: PlanType) -> &'static str {
    match plan_type {
        PlanType::Commercial => "COMMERCIAL",
        PlanType::MedicarePartD => "MEDICARE_PART_D",
        PlanType::Medicaid => "MEDICAID",
        PlanType::Exchange => "EXCHANGE",
    }
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Looks up a plan by plan code
    pub async fn find_by_plan_code(
        &self,
        plan_code: &str,
    ) -> Result<Option<BenefitPlan>, DatabaseError> {
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT plan_code, plan_name, plan_type, formulary_code
            FROM benefit_plans
            WHERE plan_code = $1
            "#,
        )
        .bind(plan_code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PlanRow::into_plan).transpose()
    }

    /// Batch-inserts plans, skipping duplicates on plan code
    pub async fn insert_batch(&self, plans: &[BenefitPlan]) -> Result<u64, DatabaseError> {
        if plans.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO benefit_plans (plan_id, plan_code, plan_name, plan_type, formulary_code) ",
        );
        builder.push_values(plans, |mut b, plan| {
            b.push_bind(Uuid::new_v4())
                .push_bind(&plan.plan_code)
                .push_bind(&plan.plan_name)
                .push_bind(plan_type_code(plan.plan_type))
                .push_bind(&plan.formulary_code);
        });
        builder.push(" ON CONFLICT (plan_code) DO NOTHING");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
