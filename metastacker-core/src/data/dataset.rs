//! Dataset validation gate.
//!
//! Turns a `RawTable` into an ordered sequence of `Row`s. Validation is
//! all-or-nothing: one bad `close` cell rejects the whole table. There is no
//! row skipping, since dropping rows would change `rows_processed` and the
//! signal rate.

use thiserror::Error;

use crate::data::table::RawTable;
use crate::domain::Row;
use crate::events::EventLog;

/// The only column the pipeline requires.
pub const CLOSE_COLUMN: &str = "close";

/// Errors from reading or validating input data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("Input file not found: {path}")]
    NotFound { path: String },

    #[error("Input file could not be read: {0}")]
    Unreadable(String),

    #[error("Invalid CSV file format: {0}")]
    Malformed(String),

    #[error("Input CSV file is empty")]
    Empty,

    #[error("Required column '{column}' not found in input data")]
    MissingColumn { column: String },

    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Non-numeric value '{value}' in column '{column}' at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Non-finite value '{value}' in column '{column}' at row {row}")]
    NonFinite {
        column: String,
        row: usize,
        value: String,
    },
}

/// Column positions resolved once from the header.
#[derive(Debug, Clone, Copy)]
struct Columns {
    timestamp: Option<usize>,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    volume_btc: Option<usize>,
    volume_usd: Option<usize>,
}

impl Columns {
    fn resolve(table: &RawTable) -> Result<Self, DataError> {
        let close = table
            .column_index(CLOSE_COLUMN)
            .ok_or_else(|| DataError::MissingColumn {
                column: CLOSE_COLUMN.to_string(),
            })?;
        Ok(Self {
            timestamp: table.column_index("timestamp"),
            open: table.column_index("open"),
            high: table.column_index("high"),
            low: table.column_index("low"),
            close,
            volume_btc: table.column_index("volume_btc"),
            volume_usd: table.column_index("volume_usd"),
        })
    }
}

/// Validated, non-empty, input-ordered rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Validate a raw table and log the loaded row count.
    ///
    /// Checks run in a fixed order so each failure is distinguishable:
    /// empty table, then missing `close` column, then per-cell parsing.
    pub fn load(raw: RawTable, log: &mut EventLog) -> Result<Self, DataError> {
        let dataset = Self::from_table(raw)?;
        log.info(format!("Data loaded: {} rows", dataset.len()));
        log.debug(format!("Dataset fingerprint: {}", dataset.fingerprint()));

        let inconsistent = dataset
            .rows
            .iter()
            .filter(|r| r.has_inconsistent_range())
            .count();
        if inconsistent > 0 {
            log.warn(format!(
                "{inconsistent} rows have high/low values that do not bracket open/close"
            ));
        }
        Ok(dataset)
    }

    /// Validate without logging.
    pub fn from_table(raw: RawTable) -> Result<Self, DataError> {
        if raw.is_empty() {
            return Err(DataError::Empty);
        }
        let columns = Columns::resolve(&raw)?;

        let rows = raw
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| parse_row(record, &columns, i + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a loaded dataset; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The close series in input order.
    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    /// BLAKE3 hash over the close series, for run provenance.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for row in &self.rows {
            hasher.update(&row.close.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

fn parse_row(record: &[String], columns: &Columns, row: usize) -> Result<Row, DataError> {
    Ok(Row {
        timestamp: columns
            .timestamp
            .and_then(|i| record.get(i))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        open: optional_number(record, columns.open),
        high: optional_number(record, columns.high),
        low: optional_number(record, columns.low),
        close: required_number(record, columns.close, CLOSE_COLUMN, row)?,
        volume_btc: optional_number(record, columns.volume_btc),
        volume_usd: optional_number(record, columns.volume_usd),
    })
}

fn required_number(
    record: &[String],
    index: usize,
    column: &str,
    row: usize,
) -> Result<f64, DataError> {
    let cell = record
        .get(index)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DataError::MissingValue {
            column: column.to_string(),
            row,
        })?;

    let value: f64 = cell.parse().map_err(|_| DataError::NonNumeric {
        column: column.to_string(),
        row,
        value: cell.to_string(),
    })?;

    if !value.is_finite() {
        return Err(DataError::NonFinite {
            column: column.to_string(),
            row,
            value: cell.to_string(),
        });
    }
    Ok(value)
}

fn optional_number(record: &[String], index: Option<usize>) -> Option<f64> {
    index
        .and_then(|i| record.get(i))
        .and_then(|s| s.trim().parse::<f64>().ok())
}
