//! Claim simulation service
//!
//! Replays a claim feed through the pipeline in concurrent batches, one task
//! per claim, persisting adjudicated claims when a database is configured and
//! reporting progress while the run is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Datelike;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

use core_kernel::Money;
use domain_adjudication::ports::memory::InMemoryEligibilityAdapter;
use domain_adjudication::ports::simulated::{
    SimulatedClinicalAdapter, SimulatedFormularyAdapter, SimulatedNetworkAdapter,
    SimulatedPriorAuthAdapter,
};
use domain_adjudication::{
    AdjudicationPipeline, Claim, ClaimRequest, LatencyProfile, PipelinePorts, StatsSnapshot,
};
use domain_benefit::Enrollment;
use infra_db::adapters::{
    PostgresEligibilityAdapter, PostgresFormularyAdapter, PostgresNetworkAdapter,
};
use infra_db::repositories::ClaimRepository;
use infra_db::{DatabaseError, DatabasePool};

use crate::config::SimConfig;

/// How often progress is reported during a run
const PROGRESS_INTERVAL_SECS: u64 = 10;

/// Member pool backing the synthetic feed
const SYNTHETIC_MEMBER_COUNT: usize = 100;

/// Errors from the simulation driver
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Simulation is already running")]
    AlreadyRunning,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Adjudication task panicked: {0}")]
    TaskPanic(String),
}

/// Final numbers for a completed run
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub stats: StatsSnapshot,
    pub elapsed_secs: f64,
    pub throughput_tps: f64,
    /// Claims persisted to the database, when persistence was on
    pub persisted: Option<u64>,
}

/// Wires the pipeline's collaborators for the configured mode
///
/// With a pool, eligibility/network/formulary resolve against Postgres and
/// only the checks with no database backing stay simulated. Without one,
/// eligibility runs over an in-memory enrollment file seeded for the
/// synthetic member pool and everything else is simulated.
pub fn build_ports(config: &SimConfig, pool: Option<&DatabasePool>) -> PipelinePorts {
    let clinical = Arc::new(match config.seed {
        Some(seed) => SimulatedClinicalAdapter::with_seed(
            SimulatedClinicalAdapter::DEFAULT_REJECT_PERCENT,
            seed.wrapping_add(1),
        ),
        None => SimulatedClinicalAdapter::new(),
    });
    let prior_auth = Arc::new(match config.seed {
        Some(seed) => SimulatedPriorAuthAdapter::with_seed(
            SimulatedPriorAuthAdapter::DEFAULT_ON_FILE_PERCENT,
            seed.wrapping_add(2),
        ),
        None => SimulatedPriorAuthAdapter::new(),
    });

    match pool {
        Some(pool) => PipelinePorts {
            eligibility: Arc::new(PostgresEligibilityAdapter::new(pool.clone())),
            network: Arc::new(PostgresNetworkAdapter::new(pool.clone())),
            formulary: Arc::new(PostgresFormularyAdapter::new(pool.clone())),
            clinical,
            prior_auth,
        },
        None => {
            let network = Arc::new(match config.seed {
                Some(seed) => SimulatedNetworkAdapter::with_seed(
                    SimulatedNetworkAdapter::DEFAULT_IN_NETWORK_PERCENT,
                    seed.wrapping_add(3),
                ),
                None => SimulatedNetworkAdapter::new(),
            });
            let formulary = Arc::new(match config.seed {
                Some(seed) => SimulatedFormularyAdapter::with_seed(seed.wrapping_add(4)),
                None => SimulatedFormularyAdapter::new(),
            });
            PipelinePorts {
                eligibility: Arc::new(InMemoryEligibilityAdapter::with_enrollments(
                    synthetic_enrollments(SYNTHETIC_MEMBER_COUNT),
                )),
                network,
                formulary,
                clinical,
                prior_auth,
            }
        }
    }
}

/// Open-ended enrollments for the synthetic member pool
fn synthetic_enrollments(member_count: usize) -> Vec<Enrollment> {
    (0..member_count)
        .map(|i| Enrollment {
            member_number: format!("M{:05}", 10_001 + i),
            plan_code: "GOLD-PPO".to_string(),
            group_number: Some("G100".to_string()),
            effective_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            termination_date: None,
            relationship: Some("SELF".to_string()),
            is_active: true,
        })
        .collect()
}

/// Generates a synthetic claim feed over the synthetic member pool
pub fn generate_feed(config: &SimConfig) -> Vec<ClaimRequest> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(100)),
        None => StdRng::from_entropy(),
    };

    let date_of_service = chrono::Utc::now().date_naive();
    // Pin a mid-plan-year date so generated enrollments always cover it.
    let date_of_service = date_of_service
        .with_year(2025)
        .unwrap_or(date_of_service);

    (0..config.target_claims)
        .map(|_| {
            let member = 10_001 + rng.gen_range(0..SYNTHETIC_MEMBER_COUNT);
            let days_supply = [30, 60, 90][rng.gen_range(0..3)];
            ClaimRequest {
                member_id: format!("M{member:05}"),
                pharmacy_id: format!("{:07}", rng.gen_range(1_000_000..10_000_000)),
                ndc: format!("{:011}", rng.gen_range(0u64..100_000_000_000)),
                quantity_dispensed: rust_decimal::Decimal::from(days_supply),
                days_supply,
                refill_number: rng.gen_range(0..6),
                date_of_service,
                ingredient_cost: Money::from_cents(rng.gen_range(500..100_000)),
                dispensing_fee: Money::from_cents(rng.gen_range(150..350)),
            }
        })
        .collect()
}

/// Drives a claim feed through the pipeline
pub struct SimulationService {
    pipeline: Arc<AdjudicationPipeline>,
    claims: Option<ClaimRepository>,
    batch_size: usize,
    running: AtomicBool,
}

impl SimulationService {
    pub fn new(
        pipeline: Arc<AdjudicationPipeline>,
        claims: Option<ClaimRepository>,
        batch_size: usize,
    ) -> Self {
        Self {
            pipeline,
            claims,
            batch_size: batch_size.max(1),
            running: AtomicBool::new(false),
        }
    }

    /// Runs the whole feed and returns the final report
    pub async fn run(&self, feed: Vec<ClaimRequest>) -> Result<SimulationReport, SimulationError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SimulationError::AlreadyRunning);
        }

        let result = self.run_inner(feed).await;
        self.running.store(false, Ordering::SeqCst);
        result
    }

    /// True while a run is in flight
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run_inner(
        &self,
        feed: Vec<ClaimRequest>,
    ) -> Result<SimulationReport, SimulationError> {
        let total = feed.len();
        let started = Instant::now();
        let mut last_report = started;
        let mut processed = 0usize;
        let mut persisted = self.claims.as_ref().map(|_| 0u64);

        info!(total, batch_size = self.batch_size, "starting claim simulation");

        for batch in feed.chunks(self.batch_size) {
            let adjudicated = self.process_batch(batch).await?;
            processed += adjudicated.len();

            if let Some(repo) = &self.claims {
                let rows = repo.insert_batch(&adjudicated).await?;
                if let Some(count) = persisted.as_mut() {
                    *count += rows;
                }
            }

            if last_report.elapsed().as_secs() >= PROGRESS_INTERVAL_SECS {
                let stats = self.pipeline.stats();
                info!(
                    processed,
                    total,
                    tps = format!("{:.1}", processed as f64 / started.elapsed().as_secs_f64()),
                    approved = stats.approved_claims,
                    rejected = stats.rejected_claims,
                    avg_ms = stats.avg_processing_time_ms,
                    "simulation progress"
                );
                last_report = Instant::now();
            }
        }

        let elapsed_secs = started.elapsed().as_secs_f64();
        let stats = self.pipeline.stats();
        let report = SimulationReport {
            stats,
            elapsed_secs,
            throughput_tps: if elapsed_secs > 0.0 {
                processed as f64 / elapsed_secs
            } else {
                0.0
            },
            persisted,
        };

        info!(
            total = report.stats.total_claims,
            approved = report.stats.approved_claims,
            rejected = report.stats.rejected_claims,
            approval_rate = format!("{:.1}%", report.stats.approval_rate * 100.0),
            tps = format!("{:.1}", report.throughput_tps),
            "simulation complete"
        );

        Ok(report)
    }

    /// Adjudicates one batch concurrently, one task per claim
    async fn process_batch(&self, batch: &[ClaimRequest]) -> Result<Vec<Claim>, SimulationError> {
        let mut tasks = JoinSet::new();
        for request in batch.iter().cloned() {
            let pipeline = Arc::clone(&self.pipeline);
            tasks.spawn(async move { pipeline.adjudicate(request).await });
        }

        let mut adjudicated = Vec::with_capacity(batch.len());
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(response) => adjudicated.push(response.claim),
                Err(err) => {
                    warn!(error = %err, "adjudication task failed");
                    return Err(SimulationError::TaskPanic(err.to_string()));
                }
            }
        }
        Ok(adjudicated)
    }
}

/// Builds the pipeline for the configured mode
pub fn build_pipeline(config: &SimConfig, pool: Option<&DatabasePool>) -> AdjudicationPipeline {
    let latency = if config.latency {
        LatencyProfile::simulated_default()
    } else {
        LatencyProfile::none()
    };
    AdjudicationPipeline::new(build_ports(config, pool), latency)
}
