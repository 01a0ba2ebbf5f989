//! Claim Adjudication Domain
//!
//! This crate implements the real-time point-of-sale adjudication pipeline:
//! an ordered sequence of clinical, administrative, and financial checks that
//! turns a fill request into an approve/reject decision with an NCPDP-style
//! response code and, on approval, a patient/plan cost split.
//!
//! # Pipeline order
//!
//! ```text
//! Received -> FormatValidated -> EligibilityChecked -> NetworkChecked
//!          -> FormularyChecked -> ClinicallyReviewed -> AuthorizationChecked
//!          -> QuantityChecked -> Priced -> Approved
//! ```
//!
//! Any step failure short-circuits to `Rejected(code, message)`; no later
//! step runs. Collaborator lookups go through the port traits in [`ports`],
//! so the simulated stand-ins can be swapped for production adapters without
//! touching the control flow or the response-code contract.

pub mod request;
pub mod response;
pub mod claim;
pub mod dur;
pub mod ports;
pub mod pricing;
pub mod latency;
pub mod pipeline;
pub mod stats;
pub mod error;

pub use request::ClaimRequest;
pub use response::{ClaimResponse, ResponseCode};
pub use claim::{Claim, ClaimStatus};
pub use dur::DurReason;
pub use ports::{
    ClinicalPort, EligibilityPort, FormularyPort, NetworkPort, PriorAuthPort, PipelinePorts,
};
pub use pricing::{copay_for_tier, price, PricingResult};
pub use latency::{LatencyProfile, PipelineStep};
pub use pipeline::{AdjudicationPipeline, MAX_DAYS_SUPPLY};
pub use stats::{StatisticsAggregator, StatsSnapshot};
pub use error::AdjudicationError;
