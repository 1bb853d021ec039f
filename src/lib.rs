//! # Kola Inventory Manager
//!
//! `kola_inventory` ties the workspace crates together for the command-line tools:
//!
//! - [`demand_forecast`]: transaction ingestion, monthly aggregation, lag features
//!   and the demand predictor
//! - [`trade_index`]: trade-index lookups and next-month order recommendations
//!
//! ## Example
//!
//! ```
//! use kola_inventory::{forecast_demand, MonthlySales, PredictionTarget, Transaction};
//! use kola_inventory::demand_forecast::models::linear_regression::LinearRegression;
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let sales = MonthlySales::from_transactions(&[Transaction::new(ts, "Acme", "Widget", 50)]).unwrap();
//! let model = LinearRegression::new(0.0, &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
//! let target = PredictionTarget::new(4, 2025).unwrap();
//!
//! let report = forecast_demand(&sales, "Acme", "Widget", &target, &model).unwrap();
//! assert!(report.has_history);
//! assert_eq!(report.predicted_units, 50);
//! ```

pub mod cache;
pub mod config;

pub use demand_forecast;
pub use trade_index;

pub use demand_forecast::{
    FeatureVector, ForecastError, GroupKey, MonthKey, MonthlySales, PredictionTarget, Predictor,
    Transaction,
};

use demand_forecast::features::{build_feature_vector, LAG_COUNT};
use serde::Serialize;

/// A demand prediction for one (customer, product) and target month
#[derive(Debug, Clone, Serialize)]
pub struct DemandReport {
    pub customer: String,
    pub product: String,
    /// `false` when the group had no transactions and zero lags were used
    pub has_history: bool,
    pub latest_month: Option<MonthKey>,
    pub target: PredictionTarget,
    pub features: Vec<(&'static str, f64)>,
    pub model: String,
    pub predicted_units: i64,
}

/// Predict demand for a group from its sales history.
///
/// A group without history is reported with `has_history == false` and a
/// zero-lag feature vector; any other error is returned.
pub fn forecast_demand<P: Predictor + ?Sized>(
    sales: &MonthlySales,
    customer: &str,
    product: &str,
    target: &PredictionTarget,
    predictor: &P,
) -> demand_forecast::Result<DemandReport> {
    let key = GroupKey::new(customer, product);
    let latest_month = match sales.group(customer, product) {
        Ok(group) => Some(group.latest_month()),
        Err(e) if e.is_no_history() => {
            log::warn!("{}", e);
            None
        }
        Err(e) => return Err(e),
    };

    let features = build_feature_vector(&key, latest_month, sales.totals(), target);
    report(customer, product, latest_month.is_some(), latest_month, target, features, predictor)
}

/// Predict demand from manually entered lag quantities, most recent first
pub fn forecast_from_quantities<P: Predictor + ?Sized>(
    customer: &str,
    product: &str,
    quantities: [u64; LAG_COUNT],
    target: &PredictionTarget,
    predictor: &P,
) -> demand_forecast::Result<DemandReport> {
    let features = FeatureVector::from_quantities(quantities, target);
    report(customer, product, true, None, target, features, predictor)
}

fn report<P: Predictor + ?Sized>(
    customer: &str,
    product: &str,
    has_history: bool,
    latest_month: Option<MonthKey>,
    target: &PredictionTarget,
    features: FeatureVector,
    predictor: &P,
) -> demand_forecast::Result<DemandReport> {
    Ok(DemandReport {
        customer: customer.to_string(),
        product: product.to_string(),
        has_history,
        latest_month,
        target: *target,
        features: features.named(),
        model: predictor.name().to_string(),
        predicted_units: predictor.predict_units(&features)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use demand_forecast::models::linear_regression::LinearRegression;

    fn sale(y: i32, m: u32, qty: u64) -> Transaction {
        let ts = NaiveDate::from_ymd_opt(y, m, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Transaction::new(ts, "Acme", "Widget", qty)
    }

    fn sum_of_lags() -> LinearRegression {
        LinearRegression::new(0.0, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]).unwrap()
    }

    #[test]
    fn test_forecast_with_history() {
        let sales = MonthlySales::from_transactions(&[sale(2025, 3, 50), sale(2025, 2, 30)]).unwrap();
        let target = PredictionTarget::new(4, 2025).unwrap();

        let report = forecast_demand(&sales, "Acme", "Widget", &target, &sum_of_lags()).unwrap();

        assert!(report.has_history);
        assert_eq!(report.latest_month, Some(MonthKey::new(2025, 3).unwrap()));
        assert_eq!(report.predicted_units, 80);
        assert_eq!(report.features[6], ("month", 4.0));
    }

    #[test]
    fn test_forecast_without_history() {
        let sales = MonthlySales::from_transactions(&[sale(2025, 3, 50)]).unwrap();
        let target = PredictionTarget::new(4, 2025).unwrap();

        let report = forecast_demand(&sales, "Acme", "Gizmo", &target, &sum_of_lags()).unwrap();

        assert!(!report.has_history);
        assert_eq!(report.latest_month, None);
        assert_eq!(report.predicted_units, 0);
    }

    #[test]
    fn test_forecast_from_manual_quantities() {
        let target = PredictionTarget::new(6, 2025).unwrap();
        let report = forecast_from_quantities(
            "",
            "Widget",
            [100, 120, 90, 80, 70, 60],
            &target,
            &sum_of_lags(),
        )
        .unwrap();

        assert_eq!(report.predicted_units, 520);
        assert_eq!(report.latest_month, None);
    }
}
