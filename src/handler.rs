use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{error::PredictionError, model::ModelStore};

/// Body of a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: f64,
    pub feature_names: Vec<String>,
}

/// Body of the model description endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfoResult {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub r2_score: f64,
    pub feature_names: Vec<String>,
}

/// Validates caller input and shapes store output into response records.
///
/// Cheap to clone: clones share the same store.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    store: Arc<ModelStore>,
}

impl RequestHandler {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Predicts for an already-parsed feature list.
    ///
    /// # Errors
    /// * `FeatureCountMismatch` if the length is wrong.
    /// * `NonFiniteFeature` if any value is NaN or infinite.
    /// * `NonFinitePrediction` if the arithmetic overflows.
    pub fn handle_predict(&self, features: &[f64]) -> Result<PredictionResult, PredictionError> {
        let prediction = self.store.predict(features)?;

        if let Some(index) = features.iter().position(|x| !x.is_finite()) {
            return Err(PredictionError::NonFiniteFeature { index });
        }
        if !prediction.is_finite() {
            return Err(PredictionError::NonFinitePrediction);
        }

        debug!("predicted {prediction} for {features:?}");
        Ok(PredictionResult {
            prediction,
            feature_names: self.store.feature_names().to_vec(),
        })
    }

    pub fn handle_model_info(&self) -> ModelInfoResult {
        ModelInfoResult {
            coefficients: self.store.coefficients().to_vec(),
            intercept: self.store.intercept(),
            r2_score: self.store.r2_score(),
            feature_names: self.store.feature_names().to_vec(),
        }
    }
}
