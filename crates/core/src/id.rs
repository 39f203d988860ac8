//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a product (as it appears in the source tables).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(String);

/// Identifier of a single planning/pricing run (correlation in logs and responses).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create an identifier from a raw cell value.
            ///
            /// Surrounding whitespace is trimmed; blank values are rejected.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: blank value", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_newtype!(ProductId, "ProductId");
impl_string_newtype!(StoreId, "StoreId");

impl RunId {
    /// Create a new run identifier.
    ///
    /// Uses UUIDv7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_are_trimmed() {
        let p = ProductId::new("  P0001 ").unwrap();
        assert_eq!(p.as_str(), "P0001");
        assert_eq!(p, "P0001".parse::<ProductId>().unwrap());
    }

    #[test]
    fn blank_ids_are_rejected() {
        let err = StoreId::new("   ").unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.contains("StoreId")));
    }

    #[test]
    fn ids_serialize_transparently() {
        let s = StoreId::new("S001").unwrap();
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"S001\"");
    }

    #[test]
    fn run_ids_serialize_as_hyphenated_uuid() {
        let id = RunId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json.as_str(), Some(id.to_string().as_str()));
        assert_eq!(id.to_string().len(), 36);
        assert_ne!(id, RunId::new());
    }
}
