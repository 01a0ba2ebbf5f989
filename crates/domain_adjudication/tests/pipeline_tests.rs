//! End-to-end tests for the adjudication pipeline

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{DomainPort, Money, Ndc, PortError};
use domain_benefit::{Enrollment, FormularyEntry, FormularyStatus, Tier};

use domain_adjudication::ports::memory::{
    InMemoryEligibilityAdapter, InMemoryFormularyAdapter, ScriptedClinicalAdapter,
};
use domain_adjudication::ports::simulated::{
    SimulatedNetworkAdapter, SimulatedPriorAuthAdapter,
};
use domain_adjudication::{
    AdjudicationPipeline, ClaimRequest, ClaimStatus, ClinicalPort, DurReason, EligibilityPort,
    FormularyPort, LatencyProfile, NetworkPort, PipelinePorts, ResponseCode,
};

const DOS: (i32, u32, u32) = (2025, 6, 15);

fn dos() -> NaiveDate {
    NaiveDate::from_ymd_opt(DOS.0, DOS.1, DOS.2).unwrap()
}

fn scenario_request() -> ClaimRequest {
    ClaimRequest {
        member_id: "M10001".to_string(),
        pharmacy_id: "1234567".to_string(),
        ndc: "12345678901".to_string(),
        quantity_dispensed: dec!(30),
        days_supply: 30,
        refill_number: 0,
        date_of_service: dos(),
        ingredient_cost: Money::new(dec!(100.00)),
        dispensing_fee: Money::new(dec!(2.50)),
    }
}

fn active_enrollment() -> Enrollment {
    Enrollment {
        member_number: "M10001".to_string(),
        plan_code: "GOLD-PPO".to_string(),
        group_number: Some("G100".to_string()),
        effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        termination_date: None,
        relationship: Some("SELF".to_string()),
        is_active: true,
    }
}

fn formulary_entry(tier: Tier) -> FormularyEntry {
    FormularyEntry {
        ndc: Ndc::new("12345678901").unwrap(),
        tier,
        status: FormularyStatus::Preferred,
        quantity_limit: tier.is_specialty().then(|| dec!(30)),
    }
}

/// Deterministic happy-path ports: covered member, in-network pharmacy,
/// tier-configurable formulary, clean DUR, PA always on file.
fn happy_ports(tier: Tier) -> PipelinePorts {
    PipelinePorts {
        eligibility: Arc::new(InMemoryEligibilityAdapter::with_enrollments(vec![
            active_enrollment(),
        ])),
        network: Arc::new(SimulatedNetworkAdapter::with_rate(100)),
        formulary: Arc::new(InMemoryFormularyAdapter::with_entries(vec![
            formulary_entry(tier),
        ])),
        clinical: Arc::new(ScriptedClinicalAdapter::clean()),
        prior_auth: Arc::new(SimulatedPriorAuthAdapter::with_rate(100)),
    }
}

fn pipeline(ports: PipelinePorts) -> AdjudicationPipeline {
    AdjudicationPipeline::new(ports, LatencyProfile::none())
}

// ============================================================================
// Collaborator doubles used by ordering / failure-policy tests
// ============================================================================

/// Eligibility adapter that counts lookups; used to prove short-circuiting.
struct CountingEligibilityAdapter {
    calls: Arc<AtomicUsize>,
    inner: InMemoryEligibilityAdapter,
}

impl CountingEligibilityAdapter {
    fn new(calls: Arc<AtomicUsize>) -> Self {
        Self {
            calls,
            inner: InMemoryEligibilityAdapter::with_enrollments(vec![active_enrollment()]),
        }
    }
}

impl DomainPort for CountingEligibilityAdapter {}

#[async_trait]
impl EligibilityPort for CountingEligibilityAdapter {
    async fn active_enrollment(
        &self,
        member_number: &str,
        date_of_service: NaiveDate,
    ) -> Result<Option<Enrollment>, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .active_enrollment(member_number, date_of_service)
            .await
    }
}

struct FailingEligibilityAdapter;

impl DomainPort for FailingEligibilityAdapter {}

#[async_trait]
impl EligibilityPort for FailingEligibilityAdapter {
    async fn active_enrollment(
        &self,
        _member_number: &str,
        _date_of_service: NaiveDate,
    ) -> Result<Option<Enrollment>, PortError> {
        Err(PortError::connection("eligibility store unreachable"))
    }
}

struct FailingNetworkAdapter;

impl DomainPort for FailingNetworkAdapter {}

#[async_trait]
impl NetworkPort for FailingNetworkAdapter {
    async fn is_in_network(&self, _ncpdp_id: &str, _plan_code: &str) -> Result<bool, PortError> {
        Err(PortError::connection("network store unreachable"))
    }
}

struct FailingFormularyAdapter;

impl DomainPort for FailingFormularyAdapter {}

#[async_trait]
impl FormularyPort for FailingFormularyAdapter {
    async fn coverage(
        &self,
        _ndc: &str,
        _plan_code: &str,
    ) -> Result<Option<FormularyEntry>, PortError> {
        Err(PortError::connection("formulary store unreachable"))
    }
}

struct FailingClinicalAdapter;

impl DomainPort for FailingClinicalAdapter {}

#[async_trait]
impl ClinicalPort for FailingClinicalAdapter {
    async fn screen(&self, _request: &ClaimRequest) -> Result<Option<DurReason>, PortError> {
        Err(PortError::internal("DUR engine crashed"))
    }
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn scenario_a_tier1_clean_claim_approves() {
        let pipeline = pipeline(happy_ports(Tier::Generic));

        let response = pipeline.adjudicate(scenario_request()).await;

        assert!(response.approved);
        assert_eq!(response.claim.status, ClaimStatus::Approved);
        assert_eq!(response.claim.response_code, ResponseCode::Approved);
        assert_eq!(response.claim.response_code.as_str(), "0");
        assert_eq!(response.claim.response_message, "Approved");

        let pricing = response.pricing.expect("approved claims carry pricing");
        assert_eq!(pricing.patient_pay, Money::new(dec!(10.00)));
        assert_eq!(pricing.plan_pay, Money::new(dec!(92.50)));
        assert_eq!(pricing.total_cost, Money::new(dec!(102.50)));
        assert_eq!(response.claim.patient_pay, Some(pricing.patient_pay));
        assert_eq!(response.claim.plan_pay, Some(pricing.plan_pay));
    }

    #[tokio::test]
    async fn scenario_b_tier4_without_pa_rejects_75() {
        let mut ports = happy_ports(Tier::Specialty);
        ports.prior_auth = Arc::new(SimulatedPriorAuthAdapter::with_rate(0));
        let pipeline = pipeline(ports);

        let response = pipeline.adjudicate(scenario_request()).await;

        assert!(!response.approved);
        assert_eq!(
            response.claim.response_code,
            ResponseCode::PriorAuthorizationRequired
        );
        assert_eq!(response.claim.response_code.as_str(), "75");
        assert_eq!(response.claim.response_message, "Prior Authorization Required");
        assert!(response.pricing.is_none());
    }

    #[tokio::test]
    async fn scenario_c_days_supply_over_90_rejects_76_any_tier() {
        for tier in [Tier::Generic, Tier::Specialty] {
            let pipeline = pipeline(happy_ports(tier));
            let mut request = scenario_request();
            request.days_supply = 120;
            request.quantity_dispensed = dec!(30);

            let response = pipeline.adjudicate(request).await;

            assert!(!response.approved);
            assert_eq!(
                response.claim.response_code,
                ResponseCode::PlanLimitationsExceeded
            );
            assert_eq!(response.claim.response_code.as_str(), "76");
            assert_eq!(response.claim.response_message, "Plan Limitations Exceeded");
        }
    }

    #[tokio::test]
    async fn scenario_d_short_ndc_rejects_m0_before_any_lookup() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut ports = happy_ports(Tier::Generic);
        ports.eligibility = Arc::new(CountingEligibilityAdapter::new(Arc::clone(&calls)));
        let pipeline = pipeline(ports);

        let mut request = scenario_request();
        request.ndc = "123".to_string();

        let response = pipeline.adjudicate(request).await;

        assert!(!response.approved);
        assert_eq!(
            response.claim.response_code,
            ResponseCode::InvalidRequestFormat
        );
        assert_eq!(response.claim.response_code.as_str(), "M0");
        // Format rejection short-circuits: eligibility was never consulted.
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

// ============================================================================
// Per-step rejection coverage
// ============================================================================

mod rejections {
    use super::*;

    #[tokio::test]
    async fn format_rejections_for_each_missing_field() {
        let base = scenario_request();
        let broken: Vec<ClaimRequest> = vec![
            ClaimRequest {
                member_id: String::new(),
                ..base.clone()
            },
            ClaimRequest {
                pharmacy_id: String::new(),
                ..base.clone()
            },
            ClaimRequest {
                ndc: String::new(),
                ..base.clone()
            },
            ClaimRequest {
                quantity_dispensed: Decimal::ZERO,
                ..base.clone()
            },
            ClaimRequest {
                days_supply: 0,
                ..base.clone()
            },
        ];

        for request in broken {
            let pipeline = pipeline(happy_ports(Tier::Generic));
            let response = pipeline.adjudicate(request).await;
            assert_eq!(
                response.claim.response_code,
                ResponseCode::InvalidRequestFormat
            );
            assert_eq!(response.claim.response_message, "Invalid Request Format");
        }
    }

    #[tokio::test]
    async fn unknown_member_rejects_85() {
        let mut ports = happy_ports(Tier::Generic);
        ports.eligibility = Arc::new(InMemoryEligibilityAdapter::new());
        let pipeline = pipeline(ports);

        let response = pipeline.adjudicate(scenario_request()).await;

        assert_eq!(response.claim.response_code, ResponseCode::PatientNotCovered);
        assert_eq!(response.claim.response_code.as_str(), "85");
        assert_eq!(response.claim.response_message, "Patient Not Covered");
    }

    #[tokio::test]
    async fn terminated_enrollment_rejects_85() {
        let mut enrollment = active_enrollment();
        enrollment.termination_date = NaiveDate::from_ymd_opt(2025, 3, 31);

        let mut ports = happy_ports(Tier::Generic);
        ports.eligibility = Arc::new(InMemoryEligibilityAdapter::with_enrollments(vec![
            enrollment,
        ]));
        let pipeline = pipeline(ports);

        let response = pipeline.adjudicate(scenario_request()).await;
        assert_eq!(response.claim.response_code, ResponseCode::PatientNotCovered);
    }

    #[tokio::test]
    async fn out_of_network_pharmacy_rejects_75() {
        let mut ports = happy_ports(Tier::Generic);
        ports.network = Arc::new(SimulatedNetworkAdapter::with_rate(0));
        let pipeline = pipeline(ports);

        let response = pipeline.adjudicate(scenario_request()).await;

        assert_eq!(
            response.claim.response_code,
            ResponseCode::PharmacyNotInNetwork
        );
        assert_eq!(response.claim.response_code.as_str(), "75");
        assert_eq!(response.claim.response_message, "Pharmacy Not In Network");
    }

    #[tokio::test]
    async fn uncovered_drug_rejects_70() {
        let mut ports = happy_ports(Tier::Generic);
        ports.formulary = Arc::new(InMemoryFormularyAdapter::new());
        let pipeline = pipeline(ports);

        let response = pipeline.adjudicate(scenario_request()).await;

        assert_eq!(response.claim.response_code, ResponseCode::ProductNotCovered);
        assert_eq!(response.claim.response_message, "Product Not Covered");
    }

    #[tokio::test]
    async fn dur_rejection_carries_reason_text_as_message() {
        let mut ports = happy_ports(Tier::Generic);
        ports.clinical = Arc::new(ScriptedClinicalAdapter::rejecting(
            DurReason::TherapeuticDuplication,
        ));
        let pipeline = pipeline(ports);

        let response = pipeline.adjudicate(scenario_request()).await;

        assert_eq!(response.claim.response_code, ResponseCode::ClinicalReject);
        assert_eq!(response.claim.response_code.as_str(), "88");
        assert_eq!(response.claim.response_message, "Therapeutic Duplication");
    }

    #[tokio::test]
    async fn dur_blocks_tier1_drugs_too() {
        // Clinical review runs after formulary but before authorization:
        // a tier-1 drug with a clean PA path still rejects on DUR.
        let mut ports = happy_ports(Tier::Generic);
        ports.clinical = Arc::new(ScriptedClinicalAdapter::rejecting(
            DurReason::DrugDrugInteraction,
        ));
        let pipeline = pipeline(ports);

        let response = pipeline.adjudicate(scenario_request()).await;
        assert_eq!(response.claim.response_code, ResponseCode::ClinicalReject);
    }

    #[tokio::test]
    async fn quantity_over_formulary_limit_rejects_76() {
        let pipeline = pipeline(happy_ports(Tier::Specialty));
        let mut request = scenario_request();
        request.quantity_dispensed = dec!(31);

        let response = pipeline.adjudicate(request).await;

        assert_eq!(
            response.claim.response_code,
            ResponseCode::PlanLimitationsExceeded
        );
    }

    #[tokio::test]
    async fn quantity_at_formulary_limit_approves() {
        let pipeline = pipeline(happy_ports(Tier::Specialty));
        let mut request = scenario_request();
        request.quantity_dispensed = dec!(30);

        let response = pipeline.adjudicate(request).await;
        assert!(response.approved);
    }

    #[tokio::test]
    async fn days_supply_at_90_approves() {
        let pipeline = pipeline(happy_ports(Tier::Generic));
        let mut request = scenario_request();
        request.days_supply = 90;

        let response = pipeline.adjudicate(request).await;
        assert!(response.approved);
    }
}

// ============================================================================
// Failure policy: fail-closed lookups and code-99 absorption
// ============================================================================

mod failure_policy {
    use super::*;

    #[tokio::test]
    async fn eligibility_lookup_error_fails_closed_to_85() {
        let mut ports = happy_ports(Tier::Generic);
        ports.eligibility = Arc::new(FailingEligibilityAdapter);
        let pipeline = pipeline(ports);

        let response = pipeline.adjudicate(scenario_request()).await;
        assert_eq!(response.claim.response_code, ResponseCode::PatientNotCovered);
    }

    #[tokio::test]
    async fn network_lookup_error_fails_closed_to_75() {
        let mut ports = happy_ports(Tier::Generic);
        ports.network = Arc::new(FailingNetworkAdapter);
        let pipeline = pipeline(ports);

        let response = pipeline.adjudicate(scenario_request()).await;
        assert_eq!(
            response.claim.response_code,
            ResponseCode::PharmacyNotInNetwork
        );
    }

    #[tokio::test]
    async fn formulary_lookup_error_fails_closed_to_70() {
        let mut ports = happy_ports(Tier::Generic);
        ports.formulary = Arc::new(FailingFormularyAdapter);
        let pipeline = pipeline(ports);

        let response = pipeline.adjudicate(scenario_request()).await;
        assert_eq!(response.claim.response_code, ResponseCode::ProductNotCovered);
    }

    #[tokio::test]
    async fn clinical_engine_failure_becomes_code_99() {
        let mut ports = happy_ports(Tier::Generic);
        ports.clinical = Arc::new(FailingClinicalAdapter);
        let pipeline = pipeline(ports);

        let response = pipeline.adjudicate(scenario_request()).await;

        assert!(!response.approved);
        assert_eq!(
            response.claim.response_code,
            ResponseCode::HostProcessingError
        );
        assert_eq!(response.claim.response_code.as_str(), "99");
        assert!(response
            .claim
            .response_message
            .starts_with("Host Processing Error:"));
        assert!(response.claim.response_message.contains("DUR engine crashed"));
    }

    #[tokio::test]
    async fn code_99_still_counts_in_statistics() {
        let mut ports = happy_ports(Tier::Generic);
        ports.clinical = Arc::new(FailingClinicalAdapter);
        let pipeline = pipeline(ports);

        pipeline.adjudicate(scenario_request()).await;

        let stats = pipeline.stats();
        assert_eq!(stats.total_claims, 1);
        assert_eq!(stats.rejected_claims, 1);
    }
}

// ============================================================================
// Concurrency and statistics
// ============================================================================

mod concurrency {
    use super::*;
    use std::collections::HashSet;
    use tokio::task::JoinSet;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn thousand_concurrent_claims_get_distinct_numbers() {
        let pipeline = Arc::new(pipeline(happy_ports(Tier::Generic)));
        const N: usize = 1000;

        let mut tasks = JoinSet::new();
        for _ in 0..N {
            let pipeline = Arc::clone(&pipeline);
            tasks.spawn(async move { pipeline.adjudicate(scenario_request()).await });
        }

        let mut claim_numbers = HashSet::new();
        let mut approved = 0usize;
        while let Some(result) = tasks.join_next().await {
            let response = result.expect("adjudication task panicked");
            assert!(response.approved);
            approved += 1;
            claim_numbers.insert(response.claim.claim_number.clone());
        }

        assert_eq!(approved, N);
        assert_eq!(claim_numbers.len(), N);

        let stats = pipeline.stats();
        assert_eq!(stats.total_claims, N as u64);
        assert_eq!(stats.approved_claims, N as u64);
        assert_eq!(stats.rejected_claims, 0);
        assert_eq!(stats.approval_rate, 1.0);
    }

    #[tokio::test]
    async fn stats_track_mixed_outcomes_and_reset() {
        let pipeline = pipeline(happy_ports(Tier::Generic));

        pipeline.adjudicate(scenario_request()).await;

        let mut bad = scenario_request();
        bad.ndc = "999".to_string();
        pipeline.adjudicate(bad).await;

        let stats = pipeline.stats();
        assert_eq!(stats.total_claims, 2);
        assert_eq!(stats.approved_claims, 1);
        assert_eq!(stats.rejected_claims, 1);
        assert!((stats.approval_rate - 0.5).abs() < 1e-9);

        pipeline.reset_stats();
        let stats = pipeline.stats();
        assert_eq!(stats.total_claims, 0);
        assert_eq!(stats.approval_rate, 0.0);
    }
}
