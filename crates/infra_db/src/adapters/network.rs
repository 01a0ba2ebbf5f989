//! Postgres pharmacy-network adapter

use async_trait::async_trait;
use chrono::Utc;

use core_kernel::{DomainPort, PortError};
use domain_adjudication::NetworkPort;

use crate::repositories::PharmacyRepository;
use crate::DatabasePool;

/// Deterministic network-membership lookup against the pharmacy_networks
/// table; the production replacement for the probabilistic stand-in.
#[derive(Debug, Clone)]
pub struct PostgresNetworkAdapter {
    pharmacies: PharmacyRepository,
}

impl PostgresNetworkAdapter {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pharmacies: PharmacyRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresNetworkAdapter {}

#[async_trait]
impl NetworkPort for PostgresNetworkAdapter {
    async fn is_in_network(&self, ncpdp_id: &str, plan_code: &str) -> Result<bool, PortError> {
        self.pharmacies
            .is_in_network(ncpdp_id, plan_code, Utc::now().date_naive())
            .await
            .map_err(|e| PortError::connection(e.to_string()))
    }
}
