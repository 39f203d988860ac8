//! `retailpulse-ai`
//!
//! **Responsibility:** model fitting and inference over loaded tables.
//!
//! This crate is intentionally **not** part of the inventory domain:
//! - It must not depend on the redistribution planner.
//! - It performs no IO; inputs are handed in by callers (infra/API).
//! - It emits **AI insights/results**, never mutations of source data.

pub mod job;
pub mod pricing;
pub mod regression;
pub mod result;

pub use job::AiJob;
pub use pricing::{PriceOptimization, PriceOptimizationJob, PriceSuggestion, PricingCoefficients, PricingRecord};
pub use regression::LinearRegression;
pub use result::{AiError, AiResult};
