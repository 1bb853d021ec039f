//! Linear regression predictor loaded from exported coefficients

use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::models::Predictor;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// On-disk form of a fitted linear model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelFile {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Training-time column order; checked against [`FEATURE_NAMES`] when present
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Constant added to every prediction
    #[serde(default)]
    pub output_offset: f64,
}

/// Ordinary linear regression: `intercept + coefficients · x + output_offset`
#[derive(Debug, Clone)]
pub struct LinearRegression {
    name: String,
    intercept: f64,
    coefficients: [f64; FEATURE_COUNT],
    output_offset: f64,
}

impl LinearRegression {
    /// Create a model from fitted parameters
    pub fn new(intercept: f64, coefficients: &[f64]) -> Result<Self> {
        let coefficients: [f64; FEATURE_COUNT] = coefficients.try_into().map_err(|_| {
            ForecastError::DataFormat(format!(
                "Linear model needs {} coefficients, got {}",
                FEATURE_COUNT,
                coefficients.len()
            ))
        })?;

        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ForecastError::DataFormat(
                "Linear model parameters must be finite".to_string(),
            ));
        }

        Ok(Self {
            name: "Linear Regression".to_string(),
            intercept,
            coefficients,
            output_offset: 0.0,
        })
    }

    /// Add a constant to every prediction
    pub fn with_output_offset(mut self, offset: f64) -> Self {
        self.output_offset = offset;
        self
    }

    /// Load a model from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::info!("loading linear model from {}", path.display());

        Self::from_reader(BufReader::new(file))
    }

    /// Load a model from JSON
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let model: LinearModelFile = serde_json::from_reader(reader)?;
        Self::from_model_file(model)
    }

    /// Build a model from its file form, validating the column order
    pub fn from_model_file(model: LinearModelFile) -> Result<Self> {
        if let Some(names) = &model.feature_names {
            if !names.iter().map(String::as_str).eq(FEATURE_NAMES.iter().copied()) {
                return Err(ForecastError::DataFormat(format!(
                    "Model feature order {:?} does not match expected {:?}",
                    names, FEATURE_NAMES
                )));
            }
        }

        Ok(Self::new(model.intercept, &model.coefficients)?.with_output_offset(model.output_offset))
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

impl Predictor for LinearRegression {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(c, x)| c * x)
            .sum();

        let prediction = self.intercept + dot + self.output_offset;
        if !prediction.is_finite() {
            return Err(ForecastError::ModelError(
                "Prediction is not a finite number".to_string(),
            ));
        }

        Ok(prediction)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::PredictionTarget;
    use approx::assert_relative_eq;

    #[test]
    fn test_predict_is_affine() {
        let model = LinearRegression::new(10.0, &[1.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        let target = PredictionTarget::new(4, 2025).unwrap();
        let features = FeatureVector::from_quantities([50, 30, 0, 0, 0, 0], &target);

        assert_relative_eq!(model.predict(&features).unwrap(), 75.0);
        assert_eq!(model.predict_units(&features).unwrap(), 75);
    }

    #[test]
    fn test_output_offset_applied() {
        let model = LinearRegression::new(0.0, &[0.0; FEATURE_COUNT])
            .unwrap()
            .with_output_offset(-21.0);
        let target = PredictionTarget::new(4, 2025).unwrap();

        assert_relative_eq!(
            model.predict(&FeatureVector::no_history(&target)).unwrap(),
            -21.0
        );
    }

    #[test]
    fn test_wrong_coefficient_count() {
        assert!(matches!(
            LinearRegression::new(0.0, &[1.0; 6]),
            Err(ForecastError::DataFormat(_))
        ));
    }

    #[test]
    fn test_feature_order_mismatch_rejected() {
        let json = r#"{
            "intercept": 0.0,
            "coefficients": [0, 0, 0, 0, 0, 0, 0, 0],
            "feature_names": ["month", "year", "a", "b", "c", "d", "e", "f"]
        }"#;

        assert!(LinearRegression::from_reader(json.as_bytes()).is_err());
    }
}
