//! # Demand Forecast
//!
//! Turns a time-stamped sales transaction log into fixed-width lag-feature vectors
//! and feeds them to a trained demand predictor.
//!
//! ## Pipeline
//!
//! - **Ingestion**: load `created_at,name,product_name,quantity` rows and keep those
//!   inside a half-open date window
//! - **Aggregation**: latest active month and monthly totals per (customer, product)
//! - **Lag-feature assembly**: six trailing monthly totals plus the calendar fields of
//!   the month being predicted
//!
//! ## Quick Start
//!
//! ```no_run
//! use demand_forecast::data::{DateWindow, TransactionLoader};
//! use demand_forecast::features::{build_feature_vector, PredictionTarget};
//! use demand_forecast::models::linear_regression::LinearRegression;
//! use demand_forecast::{GroupKey, MonthlySales, Predictor};
//!
//! # fn main() -> demand_forecast::Result<()> {
//! let transactions = TransactionLoader::from_csv("sales.csv", &DateWindow::unbounded())?;
//! let sales = MonthlySales::from_transactions(&transactions)?;
//!
//! let key = GroupKey::new("Acme", "Widget");
//! let target = PredictionTarget::new(4, 2025)?;
//! let features = build_feature_vector(&key, sales.latest_month(&key), sales.totals(), &target);
//!
//! let model = LinearRegression::from_json_file("linear_reg_model.json")?;
//! println!("predicted demand: {} units", model.predict_units(&features)?);
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod data;
pub mod error;
pub mod features;
pub mod models;
pub mod month;

// Re-export commonly used types
pub use crate::aggregation::{CustomerProductGroup, GroupKey, MonthlySales};
pub use crate::data::{DateWindow, Transaction, TransactionLoader};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{FeatureVector, PredictionTarget};
pub use crate::models::Predictor;
pub use crate::month::MonthKey;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
