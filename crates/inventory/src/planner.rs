use core::str::FromStr;

use serde::{Deserialize, Serialize};

use retailpulse_core::{DomainError, ProductId, StoreId, ValueObject};

use crate::record::InventoryRecord;

/// How surplus on an overstocked row is accounted for across a single run.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurplusPolicy {
    /// Every deficit is matched against the full surplus of each source row.
    /// The same source may be proposed for several deficits in one run.
    #[default]
    Shared,
    /// A running surplus per source row is decremented by each proposed
    /// transfer; exhausted sources are skipped.
    Ledger,
}

impl SurplusPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurplusPolicy::Shared => "shared",
            SurplusPolicy::Ledger => "ledger",
        }
    }
}

impl FromStr for SurplusPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shared" => Ok(SurplusPolicy::Shared),
            "ledger" => Ok(SurplusPolicy::Ledger),
            other => Err(DomainError::validation(format!(
                "unknown surplus policy '{other}' (expected: shared, ledger)"
            ))),
        }
    }
}

/// Outcome of matching one low-stock row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    /// A transfer of `quantity > 0` units is suggested.
    Proposed,
    /// A source exists but surplus/deficit overlap is below one unit.
    BlockedLowBuffer,
    /// No overstocked row of the same product exists at another store.
    NoMatch,
}

/// Suggested stock movement for one low-stock row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSuggestion {
    pub product: ProductId,
    pub source_store: Option<StoreId>,
    pub destination_store: StoreId,
    pub quantity: u64,
    pub status: TransferStatus,
}

impl ValueObject for TransferSuggestion {}

impl TransferSuggestion {
    fn no_match(low: &InventoryRecord) -> Self {
        Self {
            product: low.product().clone(),
            source_store: None,
            destination_store: low.store().clone(),
            quantity: 0,
            status: TransferStatus::NoMatch,
        }
    }

    fn from_source(low: &InventoryRecord, source: &InventoryRecord, quantity: u64) -> Self {
        let status = if quantity > 0 {
            TransferStatus::Proposed
        } else {
            TransferStatus::BlockedLowBuffer
        };
        Self {
            product: low.product().clone(),
            source_store: Some(source.store().clone()),
            destination_store: low.store().clone(),
            quantity,
            status,
        }
    }
}

/// Per-status counts for a plan.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub proposed: usize,
    pub blocked_low_buffer: usize,
    pub no_match: usize,
    pub total_units: u64,
}

impl PlanSummary {
    fn record(&mut self, suggestion: &TransferSuggestion) {
        match suggestion.status {
            TransferStatus::Proposed => {
                self.proposed += 1;
                self.total_units += suggestion.quantity;
            }
            TransferStatus::BlockedLowBuffer => self.blocked_low_buffer += 1,
            TransferStatus::NoMatch => self.no_match += 1,
        }
    }
}

/// Result of one planning pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedistributionPlan {
    pub policy: SurplusPolicy,
    pub suggestions: Vec<TransferSuggestion>,
    pub summary: PlanSummary,
}

/// Matches understocked store/product rows with overstocked rows of the same
/// product at other stores.
///
/// Pure and deterministic: no IO, no internal cache. Callers that want
/// memoization keep their own cache keyed on the input table.
#[derive(Debug, Copy, Clone, Default)]
pub struct RedistributionPlanner {
    policy: SurplusPolicy,
}

impl RedistributionPlanner {
    pub fn new(policy: SurplusPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SurplusPolicy {
        self.policy
    }

    /// Produce one suggestion per low-stock record, in table order.
    pub fn plan(&self, records: &[InventoryRecord]) -> RedistributionPlan {
        let high_stock: Vec<&InventoryRecord> = records.iter().filter(|r| r.is_high_stock()).collect();
        // Only consulted under `SurplusPolicy::Ledger`.
        let mut remaining: Vec<f64> = high_stock.iter().map(|h| h.surplus()).collect();

        let mut summary = PlanSummary::default();
        let mut suggestions = Vec::new();

        for low in records.iter().filter(|r| r.is_low_stock()) {
            let candidates: Vec<usize> = high_stock
                .iter()
                .enumerate()
                .filter(|(_, h)| h.product() == low.product() && h.store() != low.store())
                .map(|(idx, _)| idx)
                .collect();

            let suggestion = match candidates.first() {
                None => TransferSuggestion::no_match(low),
                Some(&first) => match self.policy {
                    SurplusPolicy::Shared => {
                        let source = high_stock[first];
                        TransferSuggestion::from_source(low, source, transfer_quantity(source.surplus(), low.deficit()))
                    }
                    SurplusPolicy::Ledger => {
                        let available = candidates.iter().copied().find(|&idx| remaining[idx] >= 1.0);
                        match available {
                            Some(idx) => {
                                let qty = transfer_quantity(remaining[idx], low.deficit());
                                remaining[idx] -= qty as f64;
                                TransferSuggestion::from_source(low, high_stock[idx], qty)
                            }
                            None => TransferSuggestion::from_source(low, high_stock[first], 0),
                        }
                    }
                },
            };

            summary.record(&suggestion);
            suggestions.push(suggestion);
        }

        RedistributionPlan {
            policy: self.policy,
            suggestions,
            summary,
        }
    }
}

/// `floor(min(surplus, deficit))`, clamped at zero.
///
/// Truncation never over-promises: a transfer brings the destination up by at
/// most its deficit and draws the source down by at most its surplus.
pub fn transfer_quantity(surplus: f64, deficit: f64) -> u64 {
    let qty = surplus.min(deficit).floor();
    if qty.is_finite() && qty > 0.0 { qty as u64 } else { 0 }
}
