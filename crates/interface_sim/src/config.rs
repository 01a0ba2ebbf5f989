//! Simulation configuration

use serde::Deserialize;

fn default_target_claims() -> usize {
    1_000
}

fn default_batch_size() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_latency() -> bool {
    true
}

/// Driver configuration, loaded from `SIM_`-prefixed environment variables
///
/// Without a `SIM_DATABASE_URL` the driver runs entirely in memory: simulated
/// and in-memory collaborators, no persistence. With one, eligibility,
/// network, and formulary resolve against Postgres and adjudicated claims are
/// batch-persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    /// PostgreSQL connection string; absent means in-memory mode
    #[serde(default)]
    pub database_url: Option<String>,
    /// Directory of reference-data CSV extracts to ingest before the run
    #[serde(default)]
    pub data_dir: Option<String>,
    /// CSV claim feed to replay; absent means a synthetic feed is generated
    #[serde(default)]
    pub claim_feed: Option<String>,
    /// Number of synthetic claims when no feed is given
    #[serde(default = "default_target_claims")]
    pub target_claims: usize,
    /// Claims adjudicated concurrently per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Seed for the simulated collaborators; absent means entropy-seeded
    #[serde(default)]
    pub seed: Option<u64>,
    /// Whether per-step latency emulation is enabled
    #[serde(default = "default_latency")]
    pub latency: bool,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            data_dir: None,
            claim_feed: None,
            target_claims: default_target_claims(),
            batch_size: default_batch_size(),
            seed: None,
            latency: default_latency(),
            log_level: default_log_level(),
        }
    }
}

impl SimConfig {
    /// Loads configuration from `SIM_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("SIM").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
