//! Demand predictors

use crate::error::Result;
use crate::features::FeatureVector;
use std::fmt::Debug;

/// A trained model mapping a feature vector to a demand estimate
pub trait Predictor: Debug {
    /// Predict demand, in units, for the month encoded in `features`
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Name of the model
    fn name(&self) -> &str;

    /// Predict and round to whole units, half to even
    fn predict_units(&self, features: &FeatureVector) -> Result<i64> {
        Ok(self.predict(features)?.round_ties_even() as i64)
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        (**self).predict(features)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

pub mod linear_regression;
