//! Infrastructure Database Layer
//!
//! PostgreSQL access for the PBM simulator: connection pooling, repositories
//! for the reference entities and adjudicated claims, adapters that implement
//! the adjudication ports against those repositories, and CSV ingestion for
//! loading reference-data extracts.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig};
//! use infra_db::repositories::ClaimRepository;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/pbm")).await?;
//! let claims = ClaimRepository::new(pool.clone());
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;
pub mod ingest;

pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
