use serde::{Deserialize, Serialize};

use retailpulse_core::{DomainError, DomainResult, ProductId, StoreId, ValueObject};

/// Multiplier applied to the reorder threshold above which a row counts as overstocked.
pub const HIGH_STOCK_FACTOR: f64 = 1.5;

/// One row of the inventory table: a product held at a store.
///
/// Construction validates the row so downstream code can rely on
/// `threshold > 0` and a finite, non-negative `stock`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRecord {
    product: ProductId,
    store: StoreId,
    stock: f64,
    threshold: f64,
}

impl ValueObject for InventoryRecord {}

/// Stock classification of a record, derived on every planning pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    Low,
    High,
    Normal,
}

impl InventoryRecord {
    pub fn new(product: ProductId, store: StoreId, stock: f64, threshold: f64) -> DomainResult<Self> {
        if !stock.is_finite() || stock < 0.0 {
            return Err(DomainError::validation(format!(
                "stock must be a finite non-negative number (got {stock})"
            )));
        }
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(DomainError::validation(format!(
                "threshold must be a finite positive number (got {threshold})"
            )));
        }
        Ok(Self {
            product,
            store,
            stock,
            threshold,
        })
    }

    /// Convenience constructor from raw identifiers.
    pub fn parse(product: &str, store: &str, stock: f64, threshold: f64) -> DomainResult<Self> {
        Self::new(ProductId::new(product)?, StoreId::new(store)?, stock, threshold)
    }

    pub fn product(&self) -> &ProductId {
        &self.product
    }

    pub fn store(&self) -> &StoreId {
        &self.store
    }

    pub fn stock(&self) -> f64 {
        self.stock
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock < self.threshold
    }

    pub fn is_high_stock(&self) -> bool {
        self.stock > self.threshold * HIGH_STOCK_FACTOR
    }

    pub fn level(&self) -> StockLevel {
        if self.is_low_stock() {
            StockLevel::Low
        } else if self.is_high_stock() {
            StockLevel::High
        } else {
            StockLevel::Normal
        }
    }

    /// Units this row can give up without dropping below its threshold.
    pub fn surplus(&self) -> f64 {
        self.stock - self.threshold
    }

    /// Units this row needs to reach its threshold.
    pub fn deficit(&self) -> f64 {
        self.threshold - self.stock
    }
}
