//! CSV loading for the three dashboard tables.
//!
//! Each file is read once per load; headers are mapped through a
//! [`schema::TableSchema`] and every row is turned into a validated domain
//! record. Any failure aborts the load with a descriptive [`LoadError`].

pub mod error;
pub mod schema;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use retailpulse_ai::PricingRecord;
use retailpulse_inventory::InventoryRecord;

pub use error::{LoadError, MissingDataError};
pub use schema::{ColumnMap, ColumnSpec, INVENTORY_SCHEMA, PRICING_SCHEMA, TableSchema, normalize_header};

pub const DEMAND_FILE: &str = "demand_forecasting.csv";
pub const INVENTORY_FILE: &str = "inventory_monitoring.csv";
pub const PRICING_FILE: &str = "pricing_optimization.csv";

/// Header-preserving demand table (displayed as-is).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemandTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DemandTable {
    /// The first `n` rows.
    pub fn sample(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// All three tables of one load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    pub demand: DemandTable,
    pub inventory: Vec<InventoryRecord>,
    pub pricing: Vec<PricingRecord>,
}

/// Loads the dashboard tables from a data directory.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    dir: PathBuf,
}

impl CsvLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of the demand, inventory and pricing files, in that order.
    pub fn paths(&self) -> [PathBuf; 3] {
        [
            self.dir.join(DEMAND_FILE),
            self.dir.join(INVENTORY_FILE),
            self.dir.join(PRICING_FILE),
        ]
    }

    /// Load every table. Fails with [`MissingDataError`] listing all absent
    /// files before attempting to parse any of them.
    pub fn load_all(&self) -> Result<DataSet, LoadError> {
        let [demand_path, inventory_path, pricing_path] = self.paths();

        let missing: Vec<String> = [&demand_path, &inventory_path, &pricing_path]
            .iter()
            .filter(|p| !p.is_file())
            .map(|p| p.display().to_string())
            .collect();
        if !missing.is_empty() {
            warn!(dir = %self.dir.display(), missing = ?missing, "required data files not found");
            return Err(MissingDataError { files: missing }.into());
        }

        let data = DataSet {
            demand: read_demand(open(&demand_path)?)?,
            inventory: read_inventory(open(&inventory_path)?)?,
            pricing: read_pricing(open(&pricing_path)?)?,
        };

        info!(
            dir = %self.dir.display(),
            demand_rows = data.demand.len(),
            inventory_rows = data.inventory.len(),
            pricing_rows = data.pricing.len(),
            "loaded data set"
        );
        Ok(data)
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Iterate non-blank data rows with their 1-based row numbers.
fn data_rows<'a, R: Read>(
    table: &'static str,
    reader: &'a mut csv::Reader<R>,
) -> impl Iterator<Item = Result<(usize, StringRecord), LoadError>> + 'a {
    reader
        .records()
        .enumerate()
        .map(move |(idx, result)| {
            result
                .map(|record| (idx + 1, record))
                .map_err(|source| LoadError::Csv { table, source })
        })
        .filter(|item| match item {
            Ok((_, record)) => !record.iter().all(|v| v.trim().is_empty()),
            Err(_) => true,
        })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

fn headers<R: Read>(table: &'static str, reader: &mut csv::Reader<R>) -> Result<StringRecord, LoadError> {
    reader
        .headers()
        .cloned()
        .map_err(|source| LoadError::Csv { table, source })
}

pub fn read_demand<R: Read>(reader: R) -> Result<DemandTable, LoadError> {
    let mut reader = csv_reader(reader);
    let headers = headers("demand", &mut reader)?;

    let mut rows = Vec::new();
    for item in data_rows("demand", &mut reader) {
        let (_, record) = item?;
        rows.push(record.iter().map(|v| v.trim().to_string()).collect());
    }

    Ok(DemandTable {
        headers: headers.iter().map(|h| h.trim().to_string()).collect(),
        rows,
    })
}

pub fn read_inventory<R: Read>(reader: R) -> Result<Vec<InventoryRecord>, LoadError> {
    let mut reader = csv_reader(reader);
    let map = INVENTORY_SCHEMA.resolve(&headers(INVENTORY_SCHEMA.table, &mut reader)?)?;

    let mut records = Vec::new();
    for item in data_rows(INVENTORY_SCHEMA.table, &mut reader) {
        let (row, record) = item?;
        let parsed = InventoryRecord::parse(
            map.cell(&record, "product"),
            map.cell(&record, "store"),
            map.number(&record, "stock", row)?,
            map.number(&record, "threshold", row)?,
        )
        .map_err(|source| LoadError::InvalidRecord {
            table: map.table(),
            row,
            source,
        })?;
        records.push(parsed);
    }

    debug!(rows = records.len(), "parsed inventory table");
    Ok(records)
}

pub fn read_pricing<R: Read>(reader: R) -> Result<Vec<PricingRecord>, LoadError> {
    let mut reader = csv_reader(reader);
    let map = PRICING_SCHEMA.resolve(&headers(PRICING_SCHEMA.table, &mut reader)?)?;

    let mut records = Vec::new();
    for item in data_rows(PRICING_SCHEMA.table, &mut reader) {
        let (row, record) = item?;
        let parsed = PricingRecord::parse(
            map.cell(&record, "product"),
            map.cell(&record, "store"),
            map.number(&record, "price", row)?,
            map.number(&record, "sales", row)?,
            map.number(&record, "storage", row)?,
        )
        .map_err(|source| LoadError::InvalidRecord {
            table: map.table(),
            row,
            source,
        })?;
        records.push(parsed);
    }

    debug!(rows = records.len(), "parsed pricing table");
    Ok(records)
}
