//! Strongly-typed identifiers for domain entities
//!
//! Using newtype wrappers around UUIDs provides type safety and prevents
//! accidental mixing of different identifier types. Business keys that arrive
//! on the wire (NDC) get their own validated newtypes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// Adjudication domain identifiers
define_id!(ClaimId, "RXC");
define_id!(AuthorizationId, "PA");

/// National Drug Code
///
/// An 11-character business key identifying a dispensed drug product.
/// Construction validates the length; content beyond length is left to the
/// drug file, since real NDC data includes leading zeros and repackager codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ndc(String);

impl Ndc {
    /// Expected NDC length after normalization (5-4-2 segments, no dashes)
    pub const LEN: usize = 11;

    /// Creates an NDC, validating the 11-character format
    pub fn new(code: impl Into<String>) -> Result<Self, InvalidNdc> {
        let code = code.into();
        if code.len() != Self::LEN {
            return Err(InvalidNdc(code));
        }
        Ok(Self(code))
    }

    /// Returns true when a raw code has the 11-character format
    pub fn is_valid_format(code: &str) -> bool {
        code.len() == Self::LEN
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ndc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ndc {
    type Err = InvalidNdc;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Error for a malformed NDC code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid NDC: {0:?} (expected 11 characters)")]
pub struct InvalidNdc(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_id_display() {
        let id = ClaimId::new();
        assert!(id.to_string().starts_with("RXC-"));
    }

    #[test]
    fn test_id_parsing_round_trip() {
        let original = ClaimId::new_v7();
        let parsed: ClaimId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_uuid_conversion() {
        let uuid = Uuid::new_v4();
        let id = AuthorizationId::from(uuid);
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }

    #[test]
    fn test_ndc_length_validation() {
        assert!(Ndc::new("12345678901").is_ok());
        assert!(Ndc::new("123").is_err());
        assert!(Ndc::new("123456789012").is_err());
        assert!(Ndc::is_valid_format("00002323730"));
        assert!(!Ndc::is_valid_format(""));
    }
}
