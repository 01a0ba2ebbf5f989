//! Injectable per-step latency
//!
//! Collaborator round-trips are emulated with a bounded random delay per
//! pipeline step, realized as a cancellable `tokio::time::sleep` between
//! state transitions. Thousands of in-flight claims park on the timer wheel
//! instead of pinning OS threads, and a caller dropping the adjudication
//! future aborts at a step boundary, never inside the pricing computation.

use rand::Rng;
use std::time::Duration;

/// One step of the adjudication pipeline, for latency lookup and tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStep {
    FormatValidation,
    Eligibility,
    Network,
    Formulary,
    ClinicalReview,
    PriorAuthorization,
    QuantityLimits,
    Pricing,
    Accumulators,
}

impl PipelineStep {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStep::FormatValidation => "format_validation",
            PipelineStep::Eligibility => "eligibility",
            PipelineStep::Network => "network",
            PipelineStep::Formulary => "formulary",
            PipelineStep::ClinicalReview => "clinical_review",
            PipelineStep::PriorAuthorization => "prior_authorization",
            PipelineStep::QuantityLimits => "quantity_limits",
            PipelineStep::Pricing => "pricing",
            PipelineStep::Accumulators => "accumulators",
        }
    }
}

/// Per-step latency windows in milliseconds
#[derive(Debug, Clone, Copy)]
pub struct LatencyProfile {
    enabled: bool,
}

impl LatencyProfile {
    /// The default emulation windows
    pub fn simulated_default() -> Self {
        Self { enabled: true }
    }

    /// No artificial delay; used by tests and load harnesses
    pub fn none() -> Self {
        Self { enabled: false }
    }

    /// Millisecond window for a step, (min, max) inclusive
    fn window(step: PipelineStep) -> (u64, u64) {
        match step {
            PipelineStep::FormatValidation => (50, 100),
            PipelineStep::Eligibility => (100, 200),
            PipelineStep::Network => (50, 100),
            PipelineStep::Formulary => (50, 150),
            PipelineStep::ClinicalReview => (200, 500),
            PipelineStep::PriorAuthorization => (100, 200),
            PipelineStep::QuantityLimits => (50, 100),
            PipelineStep::Pricing => (100, 200),
            PipelineStep::Accumulators => (100, 300),
        }
    }

    /// Waits out the step's latency window
    pub async fn wait(&self, step: PipelineStep) {
        if !self.enabled {
            return;
        }
        let millis = {
            let (min, max) = Self::window(step);
            let mut rng = rand::thread_rng();
            rng.gen_range(min..=max)
        };
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}
