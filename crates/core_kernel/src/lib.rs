//! Core Kernel - Foundational types and utilities for the PBM adjudication system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money with precise decimal arithmetic (USD, cent precision)
//! - NDC and strongly-typed identifiers
//! - Date-range handling for enrollment and network effective periods
//! - Port abstractions shared by all collaborator lookups

pub mod money;
pub mod identifiers;
pub mod temporal;
pub mod ports;
pub mod error;

pub use money::{Money, MoneyError, Rate};
pub use identifiers::{AuthorizationId, ClaimId, Ndc};
pub use temporal::{DateRange, TemporalError};
pub use ports::{DomainPort, PortError};
pub use error::CoreError;
