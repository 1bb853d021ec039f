//! Transaction log ingestion

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column holding the transaction timestamp
pub const CREATED_AT_COLUMN: &str = "created_at";
/// Column holding the customer name
pub const CUSTOMER_COLUMN: &str = "name";
/// Column holding the product name
pub const PRODUCT_COLUMN: &str = "product_name";
/// Column holding the units sold
pub const QUANTITY_COLUMN: &str = "quantity";

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A single sale from the transaction log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// When the sale was recorded, normalised to UTC
    pub timestamp: NaiveDateTime,
    /// Customer name
    pub customer: String,
    /// Product name
    pub product: String,
    /// Units sold
    pub quantity: u64,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(timestamp: NaiveDateTime, customer: &str, product: &str, quantity: u64) -> Self {
        Self {
            timestamp,
            customer: customer.to_string(),
            product: product.to_string(),
            quantity,
        }
    }
}

/// Half-open interval `[start, end)` of timestamps; a missing bound is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateWindow {
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl DateWindow {
    /// Create a window, rejecting `start > end`
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ForecastError::ValidationError(format!(
                    "Window start {} is after window end {}",
                    s, e
                )));
            }
        }

        Ok(Self { start, end })
    }

    /// Window `[start, end)` with both bounds set
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        Self::new(Some(start), Some(end))
    }

    /// Window built from calendar dates, each bound at midnight
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        Self::new(
            start.and_then(|d| d.and_hms_opt(0, 0, 0)),
            end.and_then(|d| d.and_hms_opt(0, 0, 0)),
        )
    }

    /// Window accepting every timestamp
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Inclusive lower bound
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start
    }

    /// Exclusive upper bound
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    /// Check whether `ts` lies inside the window
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        self.start.map_or(true, |s| *ts >= s) && self.end.map_or(true, |e| *ts < e)
    }
}

/// Loader for transaction logs in CSV form
#[derive(Debug)]
pub struct TransactionLoader;

impl TransactionLoader {
    /// Load the transactions of a CSV file that fall inside `window`
    pub fn from_csv<P: AsRef<Path>>(path: P, window: &DateWindow) -> Result<Vec<Transaction>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::info!("loading transactions from {}", path.display());

        Self::from_reader(file, window)
    }

    /// Load the transactions of any CSV source that fall inside `window`
    pub fn from_reader<R: Read>(reader: R, window: &DateWindow) -> Result<Vec<Transaction>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let created_at = Self::column_index(&headers, CREATED_AT_COLUMN)?;
        let customer = Self::column_index(&headers, CUSTOMER_COLUMN)?;
        let product = Self::column_index(&headers, PRODUCT_COLUMN)?;
        let quantity = Self::column_index(&headers, QUANTITY_COLUMN)?;

        let mut transactions = Vec::new();
        let mut outside = 0usize;

        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());

            let raw_ts = record.get(created_at).unwrap_or_default();
            let timestamp = parse_timestamp(raw_ts).ok_or_else(|| {
                ForecastError::DataFormat(format!(
                    "Invalid {} '{}' at line {}",
                    CREATED_AT_COLUMN, raw_ts, line
                ))
            })?;

            let raw_qty = record.get(quantity).unwrap_or_default();
            let qty = parse_quantity(raw_qty).ok_or_else(|| {
                ForecastError::DataFormat(format!(
                    "Invalid {} '{}' at line {}, expected a non-negative integer",
                    QUANTITY_COLUMN, raw_qty, line
                ))
            })?;

            if !window.contains(&timestamp) {
                outside += 1;
                continue;
            }

            transactions.push(Transaction {
                timestamp,
                customer: record.get(customer).unwrap_or_default().to_string(),
                product: record.get(product).unwrap_or_default().to_string(),
                quantity: qty,
            });
        }

        log::debug!(
            "kept {} transactions, {} outside window",
            transactions.len(),
            outside
        );

        Ok(transactions)
    }

    fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            ForecastError::DataFormat(format!("Required column '{}' not found", name))
        })
    }
}

/// Load transactions with `window_start <= timestamp < window_end`
pub fn load_transactions<R: Read>(
    source: R,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Result<Vec<Transaction>> {
    let window = DateWindow::between(window_start, window_end)?;
    TransactionLoader::from_reader(source, &window)
}

/// Keep the transactions inside `window`
pub fn filter_window(transactions: &[Transaction], window: &DateWindow) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| window.contains(&t.timestamp))
        .cloned()
        .collect()
}

/// Distinct product names in first-seen order
pub fn unique_products(transactions: &[Transaction]) -> Vec<String> {
    let mut seen = HashSet::new();
    transactions
        .iter()
        .filter(|t| seen.insert(t.product.as_str()))
        .map(|t| t.product.clone())
        .collect()
}

/// Parse a timestamp in any of the shapes found in sales exports.
///
/// Offset-bearing timestamps are converted to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// Exports sometimes write integer columns as "5.0".
fn parse_quantity(raw: &str) -> Option<u64> {
    if let Ok(q) = raw.parse::<u64>() {
        return Some(q);
    }

    match raw.parse::<f64>() {
        Ok(q) if q >= 0.0 && q.fract() == 0.0 && q <= u64::MAX as f64 => Some(q as u64),
        _ => None,
    }
}
