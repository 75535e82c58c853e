use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};

use super::weights::{self, Weights};
use crate::error::{LoadError, SaveError};

/// The JSON metadata sidecar written next to the weights file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub r2_score: f64,
    pub n_features: usize,
    pub feature_names: Vec<String>,
}

impl ModelInfo {
    /// Parses a sidecar document. Unknown keys are ignored.
    ///
    /// # Errors
    /// Returns the parser message if the JSON is malformed or a required
    /// field is missing or mistyped.
    pub fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }
}

/// A fully validated linear model: weights and metadata that agree with each other.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifact {
    coefficients: Vec<f64>,
    intercept: f64,
    r2_score: f64,
    feature_names: Vec<String>,
}

impl ModelArtifact {
    /// Builds an artifact from its parts, checking the shape invariants.
    ///
    /// # Errors
    /// Returns `ArtifactInconsistent` if the model has no features, if the
    /// coefficient and name counts differ, or if names repeat.
    pub fn new(
        coefficients: Vec<f64>,
        intercept: f64,
        r2_score: f64,
        feature_names: Vec<String>,
    ) -> Result<Self, LoadError> {
        if coefficients.is_empty() {
            return Err(LoadError::ArtifactInconsistent(
                "model has no coefficients".into(),
            ));
        }
        if coefficients.len() != feature_names.len() {
            return Err(LoadError::ArtifactInconsistent(format!(
                "{} coefficients but {} feature names",
                coefficients.len(),
                feature_names.len()
            )));
        }

        {
            let mut seen = HashSet::with_capacity(feature_names.len());
            if let Some(dup) = feature_names.iter().find(|name| !seen.insert(name.as_str())) {
                return Err(LoadError::ArtifactInconsistent(format!(
                    "duplicate feature name {dup:?}"
                )));
            }
        }

        Ok(Self {
            coefficients,
            intercept,
            r2_score,
            feature_names,
        })
    }

    /// Cross-checks the decoded weights file against the sidecar.
    ///
    /// # Errors
    /// Returns `ArtifactInconsistent` when `n_features` disagrees with either
    /// coefficient list or the name list, or when the two files carry
    /// different numbers.
    pub fn from_parts(weights: Weights, info: ModelInfo) -> Result<Self, LoadError> {
        let expected = info.n_features;
        for (what, got) in [
            ("weights file coefficients", weights.coefficients.len()),
            ("sidecar coefficients", info.coefficients.len()),
            ("sidecar feature_names", info.feature_names.len()),
        ] {
            if got != expected {
                return Err(LoadError::ArtifactInconsistent(format!(
                    "n_features is {expected} but {what} has {got} entries"
                )));
            }
        }

        let same_bits = weights
            .coefficients
            .iter()
            .zip(&info.coefficients)
            .all(|(w, i)| w.to_bits() == i.to_bits());
        if !same_bits {
            return Err(LoadError::ArtifactInconsistent(
                "weights file and sidecar disagree on coefficients".into(),
            ));
        }
        if weights.intercept.to_bits() != info.intercept.to_bits() {
            return Err(LoadError::ArtifactInconsistent(format!(
                "weights file intercept {} differs from sidecar intercept {}",
                weights.intercept, info.intercept
            )));
        }

        Self::new(
            weights.coefficients,
            weights.intercept,
            info.r2_score,
            info.feature_names,
        )
    }

    /// Builds an artifact from a sidecar alone, taking the weights from its
    /// `coefficients` and `intercept`. Used to package a model that only has
    /// a `model_info.json`.
    ///
    /// # Errors
    /// Same as [`ModelArtifact::from_parts`].
    pub fn from_info(info: ModelInfo) -> Result<Self, LoadError> {
        let weights = Weights {
            coefficients: info.coefficients.clone(),
            intercept: info.intercept,
        };
        Self::from_parts(weights, info)
    }

    /// Writes the weights file and the sidecar.
    ///
    /// # Errors
    /// Returns `Io` if either file cannot be written.
    pub fn save(&self, model_path: &Path, info_path: &Path) -> Result<(), SaveError> {
        self.save_weights(model_path)?;

        let info = serde_json::to_vec_pretty(&self.info()).map_err(|e| SaveError::Encode {
            path: info_path.to_path_buf(),
            reason: e.to_string(),
        })?;
        write_file(info_path, &info)
    }

    /// Writes only the safetensors weights file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be written.
    pub fn save_weights(&self, model_path: &Path) -> Result<(), SaveError> {
        let bytes = weights::write(&Weights {
            coefficients: self.coefficients.clone(),
            intercept: self.intercept,
        })
        .map_err(|reason| SaveError::Encode {
            path: model_path.to_path_buf(),
            reason,
        })?;
        write_file(model_path, &bytes)
    }

    /// The sidecar record describing this artifact.
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            coefficients: self.coefficients.clone(),
            intercept: self.intercept,
            r2_score: self.r2_score,
            n_features: self.feature_count(),
            feature_names: self.feature_names.clone(),
        }
    }

    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    #[inline]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    #[inline]
    pub fn r2_score(&self) -> f64 {
        self.r2_score
    }

    #[inline]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[inline]
    pub fn feature_count(&self) -> usize {
        self.coefficients.len()
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    fs::write(path, bytes).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })
}
