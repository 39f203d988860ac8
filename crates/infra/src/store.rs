//! Loaded data with reload-on-change.
//!
//! The [`DataStore`] keeps the last successfully loaded [`DataSet`] together
//! with a fingerprint of the files it came from. Every snapshot re-stats the
//! files; a changed fingerprint (or an explicit [`DataStore::invalidate`])
//! triggers a fresh load.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::info;

use crate::loader::{CsvLoader, DataSet, LoadError};

/// Per-file `(length, modified time)`; `None` for a file that is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint(Vec<Option<(u64, Option<SystemTime>)>>);

impl SourceFingerprint {
    pub fn capture(paths: &[PathBuf]) -> Self {
        Self(
            paths
                .iter()
                .map(|p| fs::metadata(p).ok().map(|m| (m.len(), m.modified().ok())))
                .collect(),
        )
    }
}

#[derive(Debug)]
pub struct DataStore {
    loader: CsvLoader,
    current: Option<(SourceFingerprint, Arc<DataSet>)>,
    generation: u64,
}

impl DataStore {
    pub fn new(loader: CsvLoader) -> Self {
        Self {
            loader,
            current: None,
            generation: 0,
        }
    }

    /// Number of successful loads so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current data, reloading when the source files changed since the last load.
    ///
    /// A failed reload drops the previous data set so callers never see data
    /// that no longer matches the files on disk.
    pub fn snapshot(&mut self) -> Result<Arc<DataSet>, LoadError> {
        let fingerprint = SourceFingerprint::capture(&self.loader.paths());

        if let Some((loaded_from, data)) = &self.current {
            if *loaded_from == fingerprint {
                return Ok(data.clone());
            }
            info!(dir = %self.loader.dir().display(), "source files changed; reloading");
        }

        self.current = None;
        let data = Arc::new(self.loader.load_all()?);
        self.generation += 1;
        self.current = Some((fingerprint, data.clone()));
        Ok(data)
    }

    /// Drop the loaded data; the next snapshot reloads from disk.
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}
