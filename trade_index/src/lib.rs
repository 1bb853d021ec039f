//! # Trade Index
//!
//! Next-month order recommendations scaled by a trade index.
//! This crate provides the month-name calendar, CSV-backed trade-index and
//! product-category tables, and the recommendation calculation.

use thiserror::Error;

pub mod months;
pub mod recommend;
pub mod table;

pub use months::{get_next_month, MONTH_NAMES};
pub use recommend::{recommend_quantity, Recommendation, Recommender, TradeIndexLookup};
pub use table::{CategoryMapping, TradeIndexTable};

/// Errors that can occur in trade-index lookups and recommendations
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("Invalid month name: '{0}', expected a full month name like 'March'")]
    InvalidMonth(String),

    #[error("Data format error: {0}")]
    DataFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for trade-index operations
pub type Result<T> = std::result::Result<T, IndexError>;
