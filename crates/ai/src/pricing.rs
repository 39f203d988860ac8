use serde::{Deserialize, Serialize};
use serde_json::json;

use retailpulse_core::{DomainError, DomainResult, ProductId, StoreId, ValueObject};

use crate::job::AiJob;
use crate::regression::LinearRegression;
use crate::result::{AiError, AiResult};

/// One row of the pricing table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingRecord {
    product: ProductId,
    store: StoreId,
    price: f64,
    sales: f64,
    storage: f64,
}

impl ValueObject for PricingRecord {}

impl PricingRecord {
    pub fn new(product: ProductId, store: StoreId, price: f64, sales: f64, storage: f64) -> DomainResult<Self> {
        for (name, value) in [("price", price), ("sales", sales), ("storage", storage)] {
            if !value.is_finite() {
                return Err(DomainError::validation(format!("{name} must be a finite number (got {value})")));
            }
        }
        Ok(Self {
            product,
            store,
            price,
            sales,
            storage,
        })
    }

    pub fn parse(product: &str, store: &str, price: f64, sales: f64, storage: f64) -> DomainResult<Self> {
        Self::new(ProductId::new(product)?, StoreId::new(store)?, price, sales, storage)
    }

    pub fn product(&self) -> &ProductId {
        &self.product
    }

    pub fn store(&self) -> &StoreId {
        &self.store
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn sales(&self) -> f64 {
        self.sales
    }

    pub fn storage(&self) -> f64 {
        self.storage
    }

    fn features(&self) -> Vec<f64> {
        vec![self.sales, self.storage]
    }
}

/// Model-suggested price for one pricing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSuggestion {
    pub product: ProductId,
    pub store: StoreId,
    pub price: f64,
    pub optimized_price: f64,
    /// `None` when the current price is zero.
    pub price_change_pct: Option<f64>,
}

/// Fitted `price ≈ intercept + sales * b1 + storage * b2`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingCoefficients {
    pub intercept: f64,
    pub sales: f64,
    pub storage: f64,
}

/// Typed output of a pricing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOptimization {
    pub coefficients: PricingCoefficients,
    pub r_squared: f64,
    pub suggestions: Vec<PriceSuggestion>,
}

impl PriceOptimization {
    /// Read the typed output back from an [`AiResult`] produced by [`PriceOptimizationJob`].
    pub fn from_result(result: &AiResult) -> Result<Self, AiError> {
        if result.kind() != Some(PriceOptimizationJob::KIND) {
            return Err(AiError::InvalidInput(format!(
                "expected a {} result, got {:?}",
                PriceOptimizationJob::KIND,
                result.kind()
            )));
        }
        serde_json::from_value(result.metadata.clone())
            .map_err(|e| AiError::InferenceFailed(format!("malformed pricing result: {e}")))
    }
}

/// Fits price against sales volume and storage cost, then re-predicts every row.
#[derive(Debug, Clone)]
pub struct PriceOptimizationJob {
    input: Vec<PricingRecord>,
}

impl PriceOptimizationJob {
    pub const KIND: &'static str = "pricing.optimization";

    pub fn new(input: Vec<PricingRecord>) -> Self {
        Self { input }
    }

    pub fn optimize(&self) -> Result<PriceOptimization, AiError> {
        let features: Vec<Vec<f64>> = self.input.iter().map(PricingRecord::features).collect();
        let targets: Vec<f64> = self.input.iter().map(PricingRecord::price).collect();

        let model = LinearRegression::fit(&features, &targets)?;
        let r_squared = model.r_squared(&features, &targets);

        let suggestions = self
            .input
            .iter()
            .zip(&features)
            .map(|(record, x)| {
                let optimized_price = model.predict(x);
                PriceSuggestion {
                    product: record.product.clone(),
                    store: record.store.clone(),
                    price: record.price,
                    optimized_price,
                    price_change_pct: price_change_pct(record.price, optimized_price),
                }
            })
            .collect();

        Ok(PriceOptimization {
            coefficients: PricingCoefficients {
                intercept: model.intercept,
                sales: model.coefficients[0],
                storage: model.coefficients[1],
            },
            r_squared,
            suggestions,
        })
    }
}

impl AiJob for PriceOptimizationJob {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn run(&self) -> Result<AiResult, AiError> {
        let out = self.optimize()?;

        Ok(AiResult::new(out.r_squared, out.r_squared)
            .with_explanation(format!(
                "fitted price = {:.4} + {:.4}*sales + {:.4}*storage over {} row(s), R²={:.4}",
                out.coefficients.intercept,
                out.coefficients.sales,
                out.coefficients.storage,
                out.suggestions.len(),
                out.r_squared
            ))
            .with_metadata(json!({
                "kind": Self::KIND,
                "coefficients": out.coefficients,
                "r_squared": out.r_squared,
                "suggestions": out.suggestions,
            })))
    }
}

/// `(optimized - price) / price * 100`, undefined for a zero price.
pub fn price_change_pct(price: f64, optimized: f64) -> Option<f64> {
    if price == 0.0 {
        return None;
    }
    Some((optimized - price) / price * 100.0)
}
