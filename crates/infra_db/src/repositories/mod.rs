//! Repositories for reference data and adjudicated claims

pub mod members;
pub mod enrollments;
pub mod plans;
pub mod pharmacies;
pub mod drugs;
pub mod formulary;
pub mod claims;

pub use members::MemberRepository;
pub use enrollments::EnrollmentRepository;
pub use plans::PlanRepository;
pub use pharmacies::PharmacyRepository;
pub use drugs::DrugRepository;
pub use formulary::FormularyRepository;
pub use claims::ClaimRepository;
