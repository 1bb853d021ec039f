//! Lag-feature assembly
//!
//! A feature vector holds six monthly quantities followed by the calendar fields of
//! the month being predicted:
//!
//! ```text
//! [qty_1_ago, qty_2_ago, qty_3_ago, qty_4_ago, qty_5_ago, qty_6_ago, month, year]
//! ```
//!
//! The regression model was trained with "1 month ago" holding the latest active
//! month's own total, so slot `i` holds offset `i - 1` from the latest month. Changing
//! that alignment requires retraining the model.
//!
//! The calendar fields come from a caller-chosen [`PredictionTarget`] and are never
//! derived from the latest month.

use crate::aggregation::{month_total, GroupKey, MonthTotals, MonthlySales};
use crate::error::{ForecastError, Result};
use crate::month::MonthKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of lag quantities in a feature vector
pub const LAG_COUNT: usize = 6;

/// Width of a feature vector
pub const FEATURE_COUNT: usize = LAG_COUNT + 2;

/// Column names in the order the predictor expects them
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Quantity_Month_1_Ago",
    "Quantity_Month_2_Ago",
    "Quantity_Month_3_Ago",
    "Quantity_Month_4_Ago",
    "Quantity_Month_5_Ago",
    "Quantity_Month_6_Ago",
    "month",
    "year",
];

/// The month a prediction is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionTarget {
    month: u32,
    year: i32,
}

impl PredictionTarget {
    /// Create a target, rejecting month numbers outside 1..=12
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidMonth(format!(
                "target month {} is outside 1..=12",
                month
            )));
        }

        Ok(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

impl From<MonthKey> for PredictionTarget {
    fn from(key: MonthKey) -> Self {
        Self {
            month: key.month(),
            year: key.year(),
        }
    }
}

/// Fixed-width model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build a vector from six lag quantities, most recent first
    pub fn from_quantities(quantities: [u64; LAG_COUNT], target: &PredictionTarget) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, qty) in values.iter_mut().zip(quantities) {
            *slot = qty as f64;
        }
        values[LAG_COUNT] = target.month as f64;
        values[LAG_COUNT + 1] = target.year as f64;

        Self(values)
    }

    /// Vector for a group that never transacted: every lag is 0
    pub fn no_history(target: &PredictionTarget) -> Self {
        Self::from_quantities([0; LAG_COUNT], target)
    }

    /// Wrap raw values, checking the width
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let values: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
            ForecastError::ValidationError(format!(
                "Feature vector needs {} values, got {}",
                FEATURE_COUNT,
                values.len()
            ))
        })?;

        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The six lag quantities, most recent first
    pub fn lags(&self) -> &[f64] {
        &self.0[..LAG_COUNT]
    }

    pub fn month(&self) -> f64 {
        self.0[LAG_COUNT]
    }

    pub fn year(&self) -> f64 {
        self.0[LAG_COUNT + 1]
    }

    /// Values paired with their column names
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES.iter().copied().zip(self.0).collect()
    }
}

/// Assemble the feature vector of one group.
///
/// `latest_month` is `None` for a group without history, which yields
/// [`FeatureVector::no_history`]. Months missing from `totals` count as 0.
pub fn build_feature_vector(
    group: &GroupKey,
    latest_month: Option<MonthKey>,
    totals: &MonthTotals,
    target: &PredictionTarget,
) -> FeatureVector {
    let Some(latest) = latest_month else {
        log::debug!("{} has no history, using zero lags", group);
        return FeatureVector::no_history(target);
    };

    let mut quantities = [0u64; LAG_COUNT];
    for (offset, qty) in quantities.iter_mut().enumerate() {
        *qty = month_total(totals, group, latest.shift(-(offset as i32)));
    }

    FeatureVector::from_quantities(quantities, target)
}

/// Feature vector for every group in `sales`
pub fn build_all_feature_vectors(
    sales: &MonthlySales,
    target: &PredictionTarget,
) -> BTreeMap<GroupKey, FeatureVector> {
    sales
        .latest_months()
        .iter()
        .map(|(key, &latest)| {
            (
                key.clone(),
                build_feature_vector(key, Some(latest), sales.totals(), target),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_history_vector() {
        let target = PredictionTarget::new(6, 2025).unwrap();
        let vector = build_feature_vector(
            &GroupKey::new("Nobody", "Nothing"),
            None,
            &MonthTotals::new(),
            &target,
        );

        assert_eq!(vector.as_slice(), &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 6.0, 2025.0]);
    }

    #[test]
    fn test_from_slice_checks_width() {
        assert!(FeatureVector::from_slice(&[1.0; FEATURE_COUNT]).is_ok());
        assert!(FeatureVector::from_slice(&[1.0; 7]).is_err());
    }

    #[test]
    fn test_target_month_range() {
        assert!(PredictionTarget::new(12, 2025).is_ok());
        assert!(matches!(
            PredictionTarget::new(13, 2025),
            Err(ForecastError::InvalidMonth(_))
        ));
    }

    #[test]
    fn test_named_order() {
        let target = PredictionTarget::new(1, 2026).unwrap();
        let vector = FeatureVector::from_quantities([1, 2, 3, 4, 5, 6], &target);
        let named = vector.named();

        assert_eq!(named[0], ("Quantity_Month_1_Ago", 1.0));
        assert_eq!(named[5], ("Quantity_Month_6_Ago", 6.0));
        assert_eq!(named[7], ("year", 2026.0));
    }
}
