//! The adjudication pipeline orchestrator
//!
//! Runs the fixed sequence of checks over one fill request, short-circuiting
//! on the first failure, and stamps the terminal claim record. Safe to call
//! concurrently: the only cross-call state is the claim-number counter and
//! the statistics aggregator, both atomic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tracing::{debug, error, warn};

use crate::claim::Claim;
use crate::error::AdjudicationError;
use crate::latency::{LatencyProfile, PipelineStep};
use crate::ports::PipelinePorts;
use crate::pricing::{self, PricingResult};
use crate::request::ClaimRequest;
use crate::response::{ClaimResponse, ResponseCode};
use crate::stats::{StatisticsAggregator, StatsSnapshot};

/// Hard ceiling on days supply, regardless of tier
pub const MAX_DAYS_SUPPLY: i32 = 90;

/// Outcome of one pipeline step
enum StepFailure {
    /// Business rejection: becomes a structured response code
    Reject(ResponseCode, String),
    /// Unexpected collaborator failure: becomes code 99
    Internal(AdjudicationError),
}

impl StepFailure {
    fn reject(code: ResponseCode) -> Self {
        StepFailure::Reject(code, code.standard_message().to_string())
    }
}

impl From<AdjudicationError> for StepFailure {
    fn from(err: AdjudicationError) -> Self {
        StepFailure::Internal(err)
    }
}

/// Real-time claim adjudication pipeline
pub struct AdjudicationPipeline {
    ports: PipelinePorts,
    latency: LatencyProfile,
    claim_seq: AtomicU64,
    stats: StatisticsAggregator,
}

impl AdjudicationPipeline {
    pub fn new(ports: PipelinePorts, latency: LatencyProfile) -> Self {
        Self {
            ports,
            latency,
            claim_seq: AtomicU64::new(1),
            stats: StatisticsAggregator::new(),
        }
    }

    /// Adjudicates one fill request
    ///
    /// Always returns a well-formed response: business rejections carry their
    /// response code, and any unexpected internal failure is absorbed into
    /// code 99 rather than propagated to the caller.
    pub async fn adjudicate(&self, request: ClaimRequest) -> ClaimResponse {
        let started = Instant::now();
        let claim_number = self.next_claim_number();

        match self.run_checks(&request).await {
            Ok(pricing) => {
                let claim = Claim::approved(claim_number, &request, &pricing, started.elapsed());
                self.stats.record(true, started.elapsed());
                debug!(claim_number = %claim.claim_number, "claim approved");
                ClaimResponse {
                    claim,
                    approved: true,
                    pricing: Some(pricing),
                }
            }
            Err(StepFailure::Reject(code, message)) => {
                let claim =
                    Claim::rejected(claim_number, &request, code, message, started.elapsed());
                self.stats.record(false, started.elapsed());
                debug!(
                    claim_number = %claim.claim_number,
                    code = %code,
                    message = %claim.response_message,
                    "claim rejected"
                );
                ClaimResponse {
                    claim,
                    approved: false,
                    pricing: None,
                }
            }
            Err(StepFailure::Internal(err)) => {
                error!(claim_number = %claim_number, error = %err, "host processing error");
                let message = format!("Host Processing Error: {err}");
                let claim = Claim::rejected(
                    claim_number,
                    &request,
                    ResponseCode::HostProcessingError,
                    message,
                    started.elapsed(),
                );
                self.stats.record(false, started.elapsed());
                ClaimResponse {
                    claim,
                    approved: false,
                    pricing: None,
                }
            }
        }
    }

    /// Runs the ordered checks, stopping at the first failure
    async fn run_checks(&self, request: &ClaimRequest) -> Result<PricingResult, StepFailure> {
        // Step 1: request format
        self.latency.wait(PipelineStep::FormatValidation).await;
        if !request.validate() {
            return Err(StepFailure::reject(ResponseCode::InvalidRequestFormat));
        }

        // Step 2: member eligibility. Lookup errors fail closed to
        // not-covered, never retried.
        self.latency.wait(PipelineStep::Eligibility).await;
        let enrollment = match self
            .ports
            .eligibility
            .active_enrollment(&request.member_id, request.date_of_service)
            .await
        {
            Ok(enrollment) => enrollment,
            Err(err) => {
                warn!(member_id = %request.member_id, error = %err, "eligibility lookup failed; treating as not covered");
                None
            }
        };
        let enrollment = match enrollment {
            Some(enrollment) => enrollment,
            None => return Err(StepFailure::reject(ResponseCode::PatientNotCovered)),
        };

        // Step 3: pharmacy network. Lookup errors fail closed to
        // out-of-network.
        self.latency.wait(PipelineStep::Network).await;
        let in_network = match self
            .ports
            .network
            .is_in_network(&request.pharmacy_id, &enrollment.plan_code)
            .await
        {
            Ok(in_network) => in_network,
            Err(err) => {
                warn!(pharmacy_id = %request.pharmacy_id, error = %err, "network lookup failed; treating as out of network");
                false
            }
        };
        if !in_network {
            return Err(StepFailure::reject(ResponseCode::PharmacyNotInNetwork));
        }

        // Step 4: formulary coverage. Lookup errors fail closed to
        // not-covered.
        self.latency.wait(PipelineStep::Formulary).await;
        let entry = match self
            .ports
            .formulary
            .coverage(&request.ndc, &enrollment.plan_code)
            .await
        {
            Ok(entry) => entry,
            Err(err) => {
                warn!(ndc = %request.ndc, error = %err, "formulary lookup failed; treating as not covered");
                None
            }
        };
        let entry = match entry {
            Some(entry) => entry,
            None => return Err(StepFailure::reject(ResponseCode::ProductNotCovered)),
        };

        // Step 5: clinical review. Runs before authorization so a clinical
        // failure blocks even tier-1 drugs.
        self.latency.wait(PipelineStep::ClinicalReview).await;
        if let Some(reason) = self
            .ports
            .clinical
            .screen(request)
            .await
            .map_err(|e| AdjudicationError::lookup("clinical review", e))?
        {
            return Err(StepFailure::Reject(
                ResponseCode::ClinicalReject,
                reason.description().to_string(),
            ));
        }

        // Step 6: prior authorization, only when the formulary demands one
        self.latency.wait(PipelineStep::PriorAuthorization).await;
        if entry.requires_prior_auth() {
            let authorized = self
                .ports
                .prior_auth
                .has_authorization(&request.member_id, &request.ndc)
                .await
                .map_err(|e| AdjudicationError::lookup("prior authorization", e))?;
            if !authorized {
                return Err(StepFailure::reject(
                    ResponseCode::PriorAuthorizationRequired,
                ));
            }
        }

        // Step 7: quantity and days-supply limits
        self.latency.wait(PipelineStep::QuantityLimits).await;
        if let Some(limit) = entry.quantity_limit {
            if request.quantity_dispensed > limit {
                return Err(StepFailure::reject(ResponseCode::PlanLimitationsExceeded));
            }
        }
        if request.days_supply > MAX_DAYS_SUPPLY {
            return Err(StepFailure::reject(ResponseCode::PlanLimitationsExceeded));
        }

        // Step 8: pricing
        self.latency.wait(PipelineStep::Pricing).await;
        let pricing = pricing::price(request.ingredient_cost, request.dispensing_fee, entry.tier);

        // Step 9: accumulator posting (deductible/OOP); fixed amounts in
        // this simulation, but the step keeps its latency window.
        self.latency.wait(PipelineStep::Accumulators).await;

        Ok(pricing)
    }

    /// Current statistics snapshot
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Operator-initiated statistics reset
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    fn next_claim_number(&self) -> String {
        format!("CLM{:015}", self.claim_seq.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::memory::{
        InMemoryEligibilityAdapter, InMemoryFormularyAdapter, ScriptedClinicalAdapter,
    };
    use crate::ports::simulated::{SimulatedNetworkAdapter, SimulatedPriorAuthAdapter};
    use std::sync::Arc;

    fn deterministic_ports() -> PipelinePorts {
        PipelinePorts {
            eligibility: Arc::new(InMemoryEligibilityAdapter::new()),
            network: Arc::new(SimulatedNetworkAdapter::with_rate(100)),
            formulary: Arc::new(InMemoryFormularyAdapter::new()),
            clinical: Arc::new(ScriptedClinicalAdapter::clean()),
            prior_auth: Arc::new(SimulatedPriorAuthAdapter::with_rate(100)),
        }
    }

    #[test]
    fn test_claim_numbers_are_fixed_width_and_increasing() {
        let pipeline = AdjudicationPipeline::new(deterministic_ports(), LatencyProfile::none());

        let first = pipeline.next_claim_number();
        let second = pipeline.next_claim_number();

        assert_eq!(first, "CLM000000000000001");
        assert_eq!(second, "CLM000000000000002");
        assert_eq!(first.len(), second.len());
        assert!(second > first);
    }
}
