use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result of an AI/ML inference.
///
/// An insight that higher layers (infra/API) can display without touching
/// the source tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResult {
    /// Primary score for the inference (model-specific meaning; R² for regressions).
    pub score: f64,

    /// Confidence in \[0, 1\].
    pub confidence: f64,

    /// Optional human-readable explanation.
    pub explanation: Option<String>,

    /// Free-form metadata (job kind, coefficients, per-row output).
    pub metadata: JsonValue,
}

impl AiResult {
    pub fn new(score: f64, confidence: f64) -> Self {
        Self {
            score,
            confidence: confidence.clamp(0.0, 1.0),
            explanation: None,
            metadata: JsonValue::Null,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = metadata;
        self
    }

    /// The `kind` tag written by the producing job, if any.
    pub fn kind(&self) -> Option<&str> {
        self.metadata.get("kind").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AiError {
    #[error("invalid job input: {0}")]
    InvalidInput(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),
}
