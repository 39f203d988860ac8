//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic validation failures. Loading and
/// transport concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. negative stock, non-positive threshold).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. blank, parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let err = DomainError::validation("threshold must be > 0");
        assert_eq!(err.to_string(), "validation failed: threshold must be > 0");
        assert_eq!(
            DomainError::invalid_id("StoreId: blank value").to_string(),
            "invalid identifier: StoreId: blank value"
        );
    }
}
