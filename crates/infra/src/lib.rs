//! Infrastructure layer: CSV loading, data store, memo caches, config.

pub mod cache;
pub mod config;
pub mod loader;
pub mod store;

pub use cache::{CacheStats, ContentHash, MemoCache, fingerprint};
pub use config::{AppConfig, ConfigError};
pub use loader::{CsvLoader, DataSet, DemandTable, LoadError, MissingDataError};
pub use store::{DataStore, SourceFingerprint};
