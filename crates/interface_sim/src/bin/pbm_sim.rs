//! PBM Claim Adjudication Simulator
//!
//! Feeds claims through the real-time adjudication pipeline and reports
//! throughput and outcome statistics.
//!
//! # Usage
//!
//! ```bash
//! # In-memory run: simulated collaborators, no persistence
//! cargo run --bin pbm-sim
//!
//! # Against Postgres, replaying a claim feed
//! SIM_DATABASE_URL=postgres://localhost/pbm \
//! SIM_DATA_DIR=./data SIM_CLAIM_FEED=./data/claims.csv cargo run --bin pbm-sim
//! ```
//!
//! # Environment Variables
//!
//! * `SIM_DATABASE_URL` - PostgreSQL connection string (omit for in-memory mode)
//! * `SIM_DATA_DIR` - directory of reference-data CSV extracts to ingest
//! * `SIM_CLAIM_FEED` - CSV claim feed to replay (omit to generate one)
//! * `SIM_TARGET_CLAIMS` - synthetic feed size (default: 1000)
//! * `SIM_BATCH_SIZE` - claims adjudicated concurrently per batch (default: 100)
//! * `SIM_SEED` - seed for the simulated collaborators
//! * `SIM_LATENCY` - per-step latency emulation on/off (default: true)
//! * `SIM_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_db::repositories::ClaimRepository;
use infra_db::{create_pool_from_url, ingest, DatabasePool};
use interface_sim::simulation::{build_pipeline, generate_feed, SimulationService};
use interface_sim::SimConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = SimConfig::from_env().unwrap_or_default();
    init_tracing(&config.log_level);

    tracing::info!(
        mode = if config.database_url.is_some() { "postgres" } else { "in-memory" },
        target_claims = config.target_claims,
        "starting PBM claim adjudication simulator"
    );

    let pool = match &config.database_url {
        Some(url) => Some(
            create_pool_from_url(url)
                .await
                .context("failed to connect to database")?,
        ),
        None => None,
    };

    if let (Some(pool), Some(data_dir)) = (&pool, &config.data_dir) {
        ingest_reference_data(pool, Path::new(data_dir))
            .await
            .context("reference data ingestion failed")?;
    }

    let feed = match &config.claim_feed {
        Some(path) => ingest::read_claim_feed(Path::new(path))
            .context("failed to read claim feed")?,
        None => generate_feed(&config),
    };

    let pipeline = Arc::new(build_pipeline(&config, pool.as_ref()));
    let claims = pool.as_ref().map(|p| ClaimRepository::new(p.clone()));
    let service = SimulationService::new(pipeline, claims, config.batch_size);

    let report = tokio::select! {
        result = service.run(feed) => result.context("simulation failed")?,
        _ = shutdown_signal() => {
            tracing::warn!("interrupted; shutting down before completion");
            return Ok(());
        }
    };

    tracing::info!(
        duration = format!("{:.1}s", report.elapsed_secs),
        total = report.stats.total_claims,
        approved = report.stats.approved_claims,
        rejected = report.stats.rejected_claims,
        approval_rate = format!("{:.1}%", report.stats.approval_rate * 100.0),
        avg_processing_ms = report.stats.avg_processing_time_ms,
        tps = format!("{:.1}", report.throughput_tps),
        persisted = report.persisted.unwrap_or(0),
        "final report"
    );

    Ok(())
}

/// Initializes the tracing subscriber for structured logging
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Loads whatever reference extracts are present in the data directory
///
/// Plans load before enrollments so plan codes resolve; drugs before the
/// formulary for the same reason. Missing extracts are skipped.
async fn ingest_reference_data(pool: &DatabasePool, data_dir: &Path) -> anyhow::Result<()> {
    let extract = |file: &str| {
        let path = data_dir.join(file);
        path.exists().then_some(path)
    };

    if let Some(path) = extract("members.csv") {
        ingest::load_members(pool, &path).await?;
    }
    if let Some(path) = extract("plans.csv") {
        ingest::load_plans(pool, &path).await?;
    }
    if let Some(path) = extract("enrollments.csv") {
        ingest::load_enrollments(pool, &path).await?;
    }
    if let Some(path) = extract("pharmacies.csv") {
        ingest::load_pharmacies(pool, &path).await?;
    }
    if let Some(path) = extract("pharmacy_networks.csv") {
        ingest::load_networks(pool, &path).await?;
    }
    if let Some(path) = extract("drugs.csv") {
        ingest::load_drugs(pool, &path).await?;
    }
    if let Some(path) = extract("formulary_drugs.csv") {
        ingest::load_formulary(pool, &path).await?;
    }

    Ok(())
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM");
        }
    }
}
