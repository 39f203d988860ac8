use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use retailpulse_ai::{PriceSuggestion, PricingCoefficients};
use retailpulse_core::RunId;
use retailpulse_infra::DemandTable;
use retailpulse_inventory::{PlanSummary, RedistributionPlan, SurplusPolicy, TransferStatus, TransferSuggestion};

use crate::app::services::PricingInsight;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct DemandSampleQuery {
    pub rows: Option<usize>,
}

// -------------------------
// Navigation
// -------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub id: &'static str,
    pub title: &'static str,
    pub path: &'static str,
}

pub const SECTIONS: [SectionView; 3] = [
    SectionView {
        id: "demand",
        title: "Sales Forecasting",
        path: "/demand/sample",
    },
    SectionView {
        id: "inventory",
        title: "Inventory Monitoring & Redistribution",
        path: "/inventory/redistribution",
    },
    SectionView {
        id: "pricing",
        title: "Pricing Optimization",
        path: "/pricing/optimization",
    },
];

// -------------------------
// Demand
// -------------------------

#[derive(Debug, Serialize)]
pub struct DemandSampleResponse<'a> {
    pub headers: &'a [String],
    pub rows: &'a [Vec<String>],
    pub total_rows: usize,
}

pub fn demand_sample(table: &DemandTable, rows: usize) -> DemandSampleResponse<'_> {
    DemandSampleResponse {
        headers: &table.headers,
        rows: table.sample(rows),
        total_rows: table.len(),
    }
}

// -------------------------
// Inventory redistribution
// -------------------------

/// Visual state of a suggestion in the dashboard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Success,
    Warning,
    Error,
}

impl From<TransferStatus> for AlertLevel {
    fn from(status: TransferStatus) -> Self {
        match status {
            TransferStatus::Proposed => AlertLevel::Success,
            TransferStatus::BlockedLowBuffer => AlertLevel::Warning,
            TransferStatus::NoMatch => AlertLevel::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn for_suggestion(s: &TransferSuggestion) -> Self {
        let message = match (s.status, &s.source_store) {
            (TransferStatus::Proposed, Some(source)) => format!(
                "Transfer {} units of '{}' from Store {} to Store {}",
                s.quantity, s.product, source, s.destination_store
            ),
            (TransferStatus::NoMatch, _) | (TransferStatus::Proposed, None) => {
                format!("No high-stock match found for '{}'", s.product)
            }
            (TransferStatus::BlockedLowBuffer, _) => {
                format!("'{}' can't be transferred due to low buffer.", s.product)
            }
        };
        Self {
            level: s.status.into(),
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestionView<'a> {
    #[serde(flatten)]
    pub suggestion: &'a TransferSuggestion,
    pub alert: Alert,
}

#[derive(Debug, Serialize)]
pub struct RedistributionResponse<'a> {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    pub policy: SurplusPolicy,
    pub summary: PlanSummary,
    pub suggestions: Vec<SuggestionView<'a>>,
}

pub fn redistribution(plan: &RedistributionPlan) -> RedistributionResponse<'_> {
    RedistributionResponse {
        run_id: RunId::new(),
        generated_at: Utc::now(),
        policy: plan.policy,
        summary: plan.summary,
        suggestions: plan
            .suggestions
            .iter()
            .map(|s| SuggestionView {
                suggestion: s,
                alert: Alert::for_suggestion(s),
            })
            .collect(),
    }
}

// -------------------------
// Pricing
// -------------------------

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Serialize)]
pub struct PricingRowView<'a> {
    pub product: &'a str,
    pub store: &'a str,
    pub price: f64,
    pub optimized_price: f64,
    pub price_change_pct: Option<f64>,
}

impl<'a> From<&'a PriceSuggestion> for PricingRowView<'a> {
    fn from(s: &'a PriceSuggestion) -> Self {
        Self {
            product: s.product.as_str(),
            store: s.store.as_str(),
            price: round2(s.price),
            optimized_price: round2(s.optimized_price),
            price_change_pct: s.price_change_pct.map(round2),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PricingResponse<'a> {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    pub r_squared: f64,
    pub confidence: f64,
    pub explanation: Option<&'a str>,
    pub coefficients: PricingCoefficients,
    pub rows: Vec<PricingRowView<'a>>,
}

pub fn pricing(insight: &PricingInsight) -> PricingResponse<'_> {
    let out = &insight.optimization;
    PricingResponse {
        run_id: RunId::new(),
        generated_at: Utc::now(),
        r_squared: out.r_squared,
        confidence: insight.result.confidence,
        explanation: insight.result.explanation.as_deref(),
        coefficients: out.coefficients,
        rows: out.suggestions.iter().map(PricingRowView::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retailpulse_core::{ProductId, StoreId};

    fn suggestion(status: TransferStatus, source: Option<&str>, quantity: u64) -> TransferSuggestion {
        TransferSuggestion {
            product: ProductId::new("P1").unwrap(),
            source_store: source.map(|s| StoreId::new(s).unwrap()),
            destination_store: StoreId::new("S1").unwrap(),
            quantity,
            status,
        }
    }

    #[test]
    fn proposed_maps_to_success_message() {
        let alert = Alert::for_suggestion(&suggestion(TransferStatus::Proposed, Some("S2"), 5));
        assert_eq!(alert.level, AlertLevel::Success);
        assert_eq!(alert.message, "Transfer 5 units of 'P1' from Store S2 to Store S1");
    }

    #[test]
    fn blocked_maps_to_warning() {
        let alert = Alert::for_suggestion(&suggestion(TransferStatus::BlockedLowBuffer, Some("S2"), 0));
        assert_eq!(alert.level, AlertLevel::Warning);
        assert_eq!(alert.message, "'P1' can't be transferred due to low buffer.");
    }

    #[test]
    fn no_match_maps_to_error() {
        let alert = Alert::for_suggestion(&suggestion(TransferStatus::NoMatch, None, 0));
        assert_eq!(alert.level, AlertLevel::Error);
        assert_eq!(alert.message, "No high-stock match found for 'P1'");
    }

    #[test]
    fn suggestion_view_flattens_fields() {
        let s = suggestion(TransferStatus::Proposed, Some("S2"), 5);
        let json = serde_json::to_value(SuggestionView {
            suggestion: &s,
            alert: Alert::for_suggestion(&s),
        })
        .unwrap();
        assert_eq!(json["status"], "PROPOSED");
        assert_eq!(json["source_store"], "S2");
        assert_eq!(json["quantity"], 5);
        assert_eq!(json["alert"]["level"], "success");
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(-0.004), -0.0);
        assert_eq!(round2(7.0), 7.0);
    }

    #[test]
    fn demand_sample_is_bounded() {
        let table = DemandTable {
            headers: vec!["a".into()],
            rows: (0..8).map(|i| vec![i.to_string()]).collect(),
        };
        let view = demand_sample(&table, 5);
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.total_rows, 8);
    }
}
