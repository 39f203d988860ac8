//! Loader error model.

use thiserror::Error;

use retailpulse_core::DomainError;

/// One or more source files are absent from the data directory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("one or more required CSV files not found: {}", files.join(", "))]
pub struct MissingDataError {
    pub files: Vec<String>,
}

/// Failure while turning source files into typed tables.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    MissingData(#[from] MissingDataError),

    #[error("{table}: required column '{column}' not found (headers: {headers})")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
        headers: String,
    },

    #[error("{table} row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        table: &'static str,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("{table} row {row}: {source}")]
    InvalidRecord {
        table: &'static str,
        row: usize,
        #[source]
        source: DomainError,
    },

    #[error("{table}: csv parse failed: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub fn is_missing_data(&self) -> bool {
        matches!(self, LoadError::MissingData(_))
    }
}
