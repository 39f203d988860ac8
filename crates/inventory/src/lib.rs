//! Inventory redistribution domain.
//!
//! This crate contains the business rules for classifying store/product stock
//! and suggesting transfers between stores, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod planner;
pub mod record;

pub use planner::{
    PlanSummary, RedistributionPlan, RedistributionPlanner, SurplusPolicy, TransferStatus,
    TransferSuggestion, transfer_quantity,
};
pub use record::{HIGH_STOCK_FACTOR, InventoryRecord, StockLevel};
