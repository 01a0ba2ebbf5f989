//! Benefit Reference Data Domain
//!
//! This crate holds the read-only reference entities the adjudication
//! pipeline consults: members and their enrollments, benefit plans, pharmacy
//! network assignments, the drug file, and formulary coverage rules.
//!
//! The pipeline never writes these entities back; they are produced by
//! lookup ports and treated as immutable views for the duration of a claim.

pub mod member;
pub mod enrollment;
pub mod plan;
pub mod pharmacy;
pub mod drug;
pub mod formulary;
pub mod error;

pub use member::{Gender, Member};
pub use enrollment::Enrollment;
pub use plan::{BenefitPlan, PlanType};
pub use pharmacy::{NetworkAssignment, Pharmacy, PharmacyType};
pub use drug::Drug;
pub use formulary::{FormularyEntry, FormularyStatus, Tier};
pub use error::BenefitError;
