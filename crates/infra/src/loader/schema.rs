//! Header normalization and column mapping.
//!
//! Source headers vary in case, spacing and wording ("Stock Levels",
//! "stock_levels", "stock"). Each table declares its canonical columns and the
//! aliases they may appear under; the mapping is resolved once per file and
//! rows are then read by column index.

use std::collections::HashMap;

use csv::StringRecord;

use crate::loader::error::LoadError;

/// A canonical column and the normalized header spellings that map to it.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

/// Required columns of a typed table.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub table: &'static str,
    pub columns: &'static [ColumnSpec],
}

pub const INVENTORY_SCHEMA: TableSchema = TableSchema {
    table: "inventory",
    columns: &[
        ColumnSpec {
            canonical: "product",
            aliases: &["product id", "product"],
        },
        ColumnSpec {
            canonical: "store",
            aliases: &["store id", "store"],
        },
        ColumnSpec {
            canonical: "stock",
            aliases: &["stock levels", "stock level", "stock"],
        },
        ColumnSpec {
            canonical: "threshold",
            aliases: &["reorder point", "threshold"],
        },
    ],
};

pub const PRICING_SCHEMA: TableSchema = TableSchema {
    table: "pricing",
    columns: &[
        ColumnSpec {
            canonical: "product",
            aliases: &["product id", "product"],
        },
        ColumnSpec {
            canonical: "store",
            aliases: &["store id", "store"],
        },
        ColumnSpec {
            canonical: "price",
            aliases: &["price"],
        },
        ColumnSpec {
            canonical: "sales",
            aliases: &["sales volume", "sales"],
        },
        ColumnSpec {
            canonical: "storage",
            aliases: &["storage cost", "storage"],
        },
    ],
};

/// Lower-case, trim, treat `_` as a space and collapse runs of whitespace.
pub fn normalize_header(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolved canonical column -> index mapping for one file.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    table: &'static str,
    indices: HashMap<&'static str, usize>,
}

impl TableSchema {
    /// Map every required column onto a header index, failing on the first
    /// column with no matching header.
    ///
    /// When several headers match the same column, the earliest alias in the
    /// list wins (so "product id" beats a bare "product").
    pub fn resolve(&self, headers: &StringRecord) -> Result<ColumnMap, LoadError> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

        let mut indices = HashMap::with_capacity(self.columns.len());
        for spec in self.columns {
            let idx = spec
                .aliases
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias))
                .ok_or_else(|| LoadError::MissingColumn {
                    table: self.table,
                    column: spec.canonical,
                    headers: headers.iter().collect::<Vec<_>>().join(", "),
                })?;
            indices.insert(spec.canonical, idx);
        }

        Ok(ColumnMap {
            table: self.table,
            indices,
        })
    }
}

impl ColumnMap {
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Raw (trimmed) cell for a canonical column; short rows read as empty.
    pub fn cell<'r>(&self, record: &'r StringRecord, column: &'static str) -> &'r str {
        self.indices
            .get(column)
            .and_then(|&idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }

    /// Numeric cell, reporting the offending value on failure.
    pub fn number(&self, record: &StringRecord, column: &'static str, row: usize) -> Result<f64, LoadError> {
        let raw = self.cell(record, column);
        raw.parse::<f64>().map_err(|_| LoadError::InvalidValue {
            table: self.table,
            row,
            column,
            value: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cols: &[&str]) -> StringRecord {
        StringRecord::from(cols.to_vec())
    }

    #[test]
    fn normalizes_case_spacing_and_underscores() {
        assert_eq!(normalize_header("  Stock   Levels "), "stock levels");
        assert_eq!(normalize_header("Reorder_Point"), "reorder point");
        assert_eq!(normalize_header("PRODUCT ID"), "product id");
    }

    #[test]
    fn resolves_original_headers() {
        let h = headers(&["Date", "Product ID", "Store ID", "Stock Levels", "Reorder Point"]);
        let map = INVENTORY_SCHEMA.resolve(&h).unwrap();
        let row = StringRecord::from(vec!["2024-01-01", "P1", "S1", "12", "10"]);
        assert_eq!(map.cell(&row, "product"), "P1");
        assert_eq!(map.number(&row, "stock", 1).unwrap(), 12.0);
        assert_eq!(map.number(&row, "threshold", 1).unwrap(), 10.0);
    }

    #[test]
    fn resolves_canonical_headers() {
        let h = headers(&["product", "store", "stock", "threshold"]);
        assert!(INVENTORY_SCHEMA.resolve(&h).is_ok());
    }

    #[test]
    fn prefers_first_alias_when_both_present() {
        let h = headers(&["Product", "Product ID", "Store ID", "Stock", "Threshold"]);
        let map = INVENTORY_SCHEMA.resolve(&h).unwrap();
        let row = StringRecord::from(vec!["name", "P9", "S1", "1", "2"]);
        assert_eq!(map.cell(&row, "product"), "P9");
    }

    #[test]
    fn missing_column_names_table_and_column() {
        let h = headers(&["Product ID", "Store ID", "Stock Levels"]);
        let err = INVENTORY_SCHEMA.resolve(&h).unwrap_err();
        match err {
            LoadError::MissingColumn { table, column, headers } => {
                assert_eq!(table, "inventory");
                assert_eq!(column, "threshold");
                assert!(headers.contains("Stock Levels"));
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn invalid_number_reports_value() {
        let h = headers(&["Product ID", "Store ID", "Price", "Sales Volume", "Storage Cost"]);
        let map = PRICING_SCHEMA.resolve(&h).unwrap();
        let row = StringRecord::from(vec!["P1", "S1", "abc", "1", "2"]);
        let err = map.number(&row, "price", 3).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 3, column: "price", ref value, .. } if value == "abc"));
    }
}
