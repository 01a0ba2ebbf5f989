//! Postgres formulary adapter

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError};
use domain_adjudication::FormularyPort;
use domain_benefit::FormularyEntry;

use crate::repositories::FormularyRepository;
use crate::DatabasePool;

/// Resolves coverage through the plan's formulary
#[derive(Debug, Clone)]
pub struct PostgresFormularyAdapter {
    formulary: FormularyRepository,
}

impl PostgresFormularyAdapter {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            formulary: FormularyRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresFormularyAdapter {}

#[async_trait]
impl FormularyPort for PostgresFormularyAdapter {
    async fn coverage(
        &self,
        ndc: &str,
        plan_code: &str,
    ) -> Result<Option<FormularyEntry>, PortError> {
        self.formulary
            .find_for_plan(ndc, plan_code)
            .await
            .map_err(|e| PortError::connection(e.to_string()))
    }
}
