//! Postgres-backed implementations of the adjudication ports
//!
//! Each adapter composes the repositories into the narrow contract the
//! pipeline consumes. The clinical and prior-authorization checks have no
//! database backing in the simulator; their simulated adapters live with the
//! port definitions in `domain_adjudication`.

pub mod eligibility;
pub mod network;
pub mod formulary;

pub use eligibility::PostgresEligibilityAdapter;
pub use network::PostgresNetworkAdapter;
pub use formulary::PostgresFormularyAdapter;
