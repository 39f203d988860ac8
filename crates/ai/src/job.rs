use crate::result::{AiError, AiResult};

/// A self-contained inference unit.
///
/// Jobs own the in-memory rows they run on.
/// This crate stays storage-agnostic: inputs are provided by callers.
pub trait AiJob: Send + Sync + 'static {
    /// Stable identifier of the job kind (also written to result metadata).
    fn kind(&self) -> &'static str;

    /// Execute inference and return an AI insight.
    ///
    /// Must not mutate its input.
    fn run(&self) -> Result<AiResult, AiError>;
}
