//! Collaborator ports for the adjudication pipeline
//!
//! Each check the pipeline performs against an external system is expressed
//! as a port trait: eligibility, network membership, formulary coverage,
//! clinical screening, and prior authorization. The simulated adapters here
//! are probabilistic stand-ins behind the same contracts a production adapter
//! implements, so the pipeline's ordering and short-circuit behavior can be
//! tested with the randomness pinned.

use async_trait::async_trait;
use chrono::NaiveDate;
use core_kernel::{DomainPort, PortError};
use domain_benefit::{Enrollment, FormularyEntry};
use std::sync::Arc;

use crate::dur::DurReason;
use crate::request::ClaimRequest;

/// Resolves a member's active enrollment for a date of service
#[async_trait]
pub trait EligibilityPort: DomainPort {
    /// Returns the enrollment covering the member on the date of service,
    /// or None when the member is unknown or no enrollment is in force.
    async fn active_enrollment(
        &self,
        member_number: &str,
        date_of_service: NaiveDate,
    ) -> Result<Option<Enrollment>, PortError>;
}

/// Resolves whether a pharmacy participates in a plan's network
#[async_trait]
pub trait NetworkPort: DomainPort {
    async fn is_in_network(&self, ncpdp_id: &str, plan_code: &str) -> Result<bool, PortError>;
}

/// Resolves a drug's formulary coverage under a plan
#[async_trait]
pub trait FormularyPort: DomainPort {
    /// Returns the formulary entry for the NDC, or None when not covered.
    async fn coverage(
        &self,
        ndc: &str,
        plan_code: &str,
    ) -> Result<Option<FormularyEntry>, PortError>;
}

/// Performs DUR-style clinical screening on a fill request
#[async_trait]
pub trait ClinicalPort: DomainPort {
    /// Returns a rejection reason, or None when the fill screens clean.
    async fn screen(&self, request: &ClaimRequest) -> Result<Option<DurReason>, PortError>;
}

/// Checks for a prior authorization on file
#[async_trait]
pub trait PriorAuthPort: DomainPort {
    async fn has_authorization(&self, member_number: &str, ndc: &str)
        -> Result<bool, PortError>;
}

/// The full set of collaborators the pipeline is wired with
#[derive(Clone)]
pub struct PipelinePorts {
    pub eligibility: Arc<dyn EligibilityPort>,
    pub network: Arc<dyn NetworkPort>,
    pub formulary: Arc<dyn FormularyPort>,
    pub clinical: Arc<dyn ClinicalPort>,
    pub prior_auth: Arc<dyn PriorAuthPort>,
}

/// Simulated adapters: seeded coin-flips standing in for real systems
///
/// Default rates: 95% of pharmacies in network, 5% DUR rejects, 80% of
/// required authorizations on file, random tier 1-5 formulary placement.
/// All randomness flows through a seedable RNG so a fixed seed reproduces a
/// run exactly; rates of 0 or 100 make an adapter fully deterministic for
/// tests.
pub mod simulated {
    use super::*;
    use core_kernel::Ndc;
    use domain_benefit::{FormularyStatus, Tier};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    fn percent_roll(rng: &Mutex<StdRng>, percent: u8) -> bool {
        let mut rng = rng.lock().expect("simulated adapter rng poisoned");
        rng.gen_range(0..100) < percent as u32
    }

    /// Network stand-in: a fixed percentage of lookups come back in-network
    pub struct SimulatedNetworkAdapter {
        in_network_percent: u8,
        rng: Mutex<StdRng>,
    }

    impl SimulatedNetworkAdapter {
        pub const DEFAULT_IN_NETWORK_PERCENT: u8 = 95;

        pub fn new() -> Self {
            Self::with_rate(Self::DEFAULT_IN_NETWORK_PERCENT)
        }

        pub fn with_rate(in_network_percent: u8) -> Self {
            Self {
                in_network_percent,
                rng: Mutex::new(StdRng::from_entropy()),
            }
        }

        pub fn with_seed(in_network_percent: u8, seed: u64) -> Self {
            Self {
                in_network_percent,
                rng: Mutex::new(StdRng::seed_from_u64(seed)),
            }
        }
    }

    impl Default for SimulatedNetworkAdapter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DomainPort for SimulatedNetworkAdapter {}

    #[async_trait]
    impl NetworkPort for SimulatedNetworkAdapter {
        async fn is_in_network(
            &self,
            _ncpdp_id: &str,
            _plan_code: &str,
        ) -> Result<bool, PortError> {
            Ok(percent_roll(&self.rng, self.in_network_percent))
        }
    }

    /// Formulary stand-in: every known-format NDC is covered at a random tier
    ///
    /// Specialty tiers (4-5) carry a 30-unit quantity limit, matching the
    /// reference data shape.
    pub struct SimulatedFormularyAdapter {
        rng: Mutex<StdRng>,
    }

    impl SimulatedFormularyAdapter {
        pub const SPECIALTY_QUANTITY_LIMIT: u32 = 30;

        pub fn new() -> Self {
            Self {
                rng: Mutex::new(StdRng::from_entropy()),
            }
        }

        pub fn with_seed(seed: u64) -> Self {
            Self {
                rng: Mutex::new(StdRng::seed_from_u64(seed)),
            }
        }
    }

    impl Default for SimulatedFormularyAdapter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DomainPort for SimulatedFormularyAdapter {}

    #[async_trait]
    impl FormularyPort for SimulatedFormularyAdapter {
        async fn coverage(
            &self,
            ndc: &str,
            _plan_code: &str,
        ) -> Result<Option<FormularyEntry>, PortError> {
            let ndc = match Ndc::new(ndc) {
                Ok(ndc) => ndc,
                Err(_) => return Ok(None),
            };

            let tier_value = {
                let mut rng = self.rng.lock().expect("simulated adapter rng poisoned");
                rng.gen_range(1..=5u8)
            };
            let tier = Tier::from_u8(tier_value)
                .ok_or_else(|| PortError::internal("tier roll out of range"))?;

            Ok(Some(FormularyEntry {
                ndc,
                tier,
                status: FormularyStatus::Preferred,
                quantity_limit: tier
                    .is_specialty()
                    .then(|| Decimal::from(Self::SPECIALTY_QUANTITY_LIMIT)),
            }))
        }
    }

    /// Clinical stand-in: a fixed percentage of fills draw a DUR rejection
    pub struct SimulatedClinicalAdapter {
        reject_percent: u8,
        rng: Mutex<StdRng>,
    }

    impl SimulatedClinicalAdapter {
        pub const DEFAULT_REJECT_PERCENT: u8 = 5;

        pub fn new() -> Self {
            Self::with_rate(Self::DEFAULT_REJECT_PERCENT)
        }

        pub fn with_rate(reject_percent: u8) -> Self {
            Self {
                reject_percent,
                rng: Mutex::new(StdRng::from_entropy()),
            }
        }

        pub fn with_seed(reject_percent: u8, seed: u64) -> Self {
            Self {
                reject_percent,
                rng: Mutex::new(StdRng::seed_from_u64(seed)),
            }
        }
    }

    impl Default for SimulatedClinicalAdapter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DomainPort for SimulatedClinicalAdapter {}

    #[async_trait]
    impl ClinicalPort for SimulatedClinicalAdapter {
        async fn screen(&self, _request: &ClaimRequest) -> Result<Option<DurReason>, PortError> {
            let mut rng = self.rng.lock().expect("simulated adapter rng poisoned");
            if rng.gen_range(0..100) < self.reject_percent as u32 {
                let reason = DurReason::ALL[rng.gen_range(0..DurReason::ALL.len())];
                return Ok(Some(reason));
            }
            Ok(None)
        }
    }

    /// Prior-auth stand-in: a fixed percentage of members have one on file
    pub struct SimulatedPriorAuthAdapter {
        on_file_percent: u8,
        rng: Mutex<StdRng>,
    }

    impl SimulatedPriorAuthAdapter {
        pub const DEFAULT_ON_FILE_PERCENT: u8 = 80;

        pub fn new() -> Self {
            Self::with_rate(Self::DEFAULT_ON_FILE_PERCENT)
        }

        pub fn with_rate(on_file_percent: u8) -> Self {
            Self {
                on_file_percent,
                rng: Mutex::new(StdRng::from_entropy()),
            }
        }

        pub fn with_seed(on_file_percent: u8, seed: u64) -> Self {
            Self {
                on_file_percent,
                rng: Mutex::new(StdRng::seed_from_u64(seed)),
            }
        }
    }

    impl Default for SimulatedPriorAuthAdapter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DomainPort for SimulatedPriorAuthAdapter {}

    #[async_trait]
    impl PriorAuthPort for SimulatedPriorAuthAdapter {
        async fn has_authorization(
            &self,
            _member_number: &str,
            _ndc: &str,
        ) -> Result<bool, PortError> {
            Ok(percent_roll(&self.rng, self.on_file_percent))
        }
    }
}

/// In-memory adapters backed by maps, for tests and database-free runs
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// Eligibility adapter over an in-memory enrollment file
    #[derive(Default)]
    pub struct InMemoryEligibilityAdapter {
        enrollments: RwLock<HashMap<String, Vec<Enrollment>>>,
    }

    impl InMemoryEligibilityAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_enrollments(enrollments: Vec<Enrollment>) -> Self {
            let adapter = Self::new();
            for enrollment in enrollments {
                adapter.insert(enrollment);
            }
            adapter
        }

        pub fn insert(&self, enrollment: Enrollment) {
            self.enrollments
                .write()
                .expect("enrollment map poisoned")
                .entry(enrollment.member_number.clone())
                .or_default()
                .push(enrollment);
        }
    }

    impl DomainPort for InMemoryEligibilityAdapter {}

    #[async_trait]
    impl EligibilityPort for InMemoryEligibilityAdapter {
        async fn active_enrollment(
            &self,
            member_number: &str,
            date_of_service: NaiveDate,
        ) -> Result<Option<Enrollment>, PortError> {
            let enrollments = self.enrollments.read().expect("enrollment map poisoned");
            Ok(enrollments
                .get(member_number)
                .and_then(|list| list.iter().find(|e| e.is_valid_on(date_of_service)))
                .cloned())
        }
    }

    /// Formulary adapter over an in-memory coverage map keyed by NDC
    #[derive(Default)]
    pub struct InMemoryFormularyAdapter {
        entries: RwLock<HashMap<String, FormularyEntry>>,
    }

    impl InMemoryFormularyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entries(entries: Vec<FormularyEntry>) -> Self {
            let adapter = Self::new();
            for entry in entries {
                adapter.insert(entry);
            }
            adapter
        }

        pub fn insert(&self, entry: FormularyEntry) {
            self.entries
                .write()
                .expect("formulary map poisoned")
                .insert(entry.ndc.as_str().to_string(), entry);
        }
    }

    impl DomainPort for InMemoryFormularyAdapter {}

    #[async_trait]
    impl FormularyPort for InMemoryFormularyAdapter {
        async fn coverage(
            &self,
            ndc: &str,
            _plan_code: &str,
        ) -> Result<Option<FormularyEntry>, PortError> {
            let entries = self.entries.read().expect("formulary map poisoned");
            Ok(entries.get(ndc).cloned())
        }
    }

    /// Clinical adapter that always returns a scripted outcome
    pub struct ScriptedClinicalAdapter {
        outcome: Option<DurReason>,
    }

    impl ScriptedClinicalAdapter {
        /// Screens every fill clean
        pub fn clean() -> Self {
            Self { outcome: None }
        }

        /// Rejects every fill with the given reason
        pub fn rejecting(reason: DurReason) -> Self {
            Self {
                outcome: Some(reason),
            }
        }
    }

    impl DomainPort for ScriptedClinicalAdapter {}

    #[async_trait]
    impl ClinicalPort for ScriptedClinicalAdapter {
        async fn screen(&self, _request: &ClaimRequest) -> Result<Option<DurReason>, PortError> {
            Ok(self.outcome)
        }
    }
}
