use std::{fs, io, path::Path};

use log::info;

use super::{
    artifact::{ModelArtifact, ModelInfo},
    weights,
};
use crate::error::{LoadError, PredictionError};

/// Read-only owner of the served model.
///
/// Built once at start-up and shared behind an `Arc`; every method takes
/// `&self` and none of them mutate, so concurrent callers need no locking.
#[derive(Debug, Clone)]
pub struct ModelStore {
    artifact: ModelArtifact,
}

impl ModelStore {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }

    /// Loads the weights file and its JSON sidecar.
    ///
    /// # Args
    /// * `model_path` - Path to the safetensors weights file.
    /// * `info_path` - Path to the `model_info.json` sidecar.
    ///
    /// # Errors
    /// * `ArtifactNotFound` if either file is missing.
    /// * `ArtifactCorrupt` if either file cannot be decoded.
    /// * `ArtifactInconsistent` if the files disagree.
    pub fn load(model_path: &Path, info_path: &Path) -> Result<Self, LoadError> {
        // Existence of both is checked before decoding either.
        let model_bytes = read_file(model_path)?;
        let info_bytes = read_file(info_path)?;

        let weights = weights::read(&model_bytes)
            .map_err(|reason| LoadError::corrupt(model_path, reason))?;

        let info_text = std::str::from_utf8(&info_bytes)
            .map_err(|e| LoadError::corrupt(info_path, e))?;
        let info = ModelInfo::from_json(info_text)
            .map_err(|reason| LoadError::corrupt(info_path, reason))?;

        let artifact = ModelArtifact::from_parts(weights, info)?;
        info!(
            "loaded model from {} ({} features, r2 {:.4})",
            model_path.display(),
            artifact.feature_count(),
            artifact.r2_score()
        );

        Ok(Self::new(artifact))
    }

    /// Computes `intercept + Σ coefficients[i] * features[i]`.
    ///
    /// The sum starts at the intercept and runs in feature order, so equal
    /// inputs give bit-identical outputs.
    ///
    /// # Errors
    /// `FeatureCountMismatch` if `features` does not have exactly
    /// `feature_count` entries. Nothing is computed in that case.
    pub fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        let expected = self.artifact.feature_count();
        if features.len() != expected {
            return Err(PredictionError::FeatureCountMismatch {
                expected,
                actual: features.len(),
            });
        }

        let prediction = self
            .artifact
            .coefficients()
            .iter()
            .zip(features)
            .fold(self.artifact.intercept(), |acc, (c, x)| acc + c * x);

        Ok(prediction)
    }

    #[inline]
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        self.artifact.coefficients()
    }

    #[inline]
    pub fn intercept(&self) -> f64 {
        self.artifact.intercept()
    }

    #[inline]
    pub fn r2_score(&self) -> f64 {
        self.artifact.r2_score()
    }

    #[inline]
    pub fn feature_names(&self) -> &[String] {
        self.artifact.feature_names()
    }

    #[inline]
    pub fn feature_count(&self) -> usize {
        self.artifact.feature_count()
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::ArtifactNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ModelStore {
        let artifact = ModelArtifact::new(
            vec![10.5, 20.3, -5.2, 15.1],
            5.0,
            0.95,
            vec!["x1".into(), "x2".into(), "x3".into(), "x4".into()],
        )
        .unwrap();
        ModelStore::new(artifact)
    }

    #[test]
    fn predicts_weighted_sum_plus_intercept() {
        let prediction = store().predict(&[1.5, 2.3, -0.5, 1.0]).unwrap();
        assert!((prediction - 85.14).abs() < 1e-9, "{prediction}");
    }

    #[test]
    fn zero_vector_yields_intercept() {
        assert_eq!(store().predict(&[0.0; 4]).unwrap(), 5.0);
    }

    #[test]
    fn prediction_matches_reference_formula_exactly() {
        let store = store();
        let x = [-1.0, 1.5, 2.0, -0.5];

        let mut expected = store.intercept();
        for (c, v) in store.coefficients().iter().zip(&x) {
            expected += c * v;
        }

        let got = store.predict(&x).unwrap();
        assert_eq!(got.to_bits(), expected.to_bits());
        assert_eq!(got.to_bits(), store.predict(&x).unwrap().to_bits());
    }

    #[test]
    fn short_vector_is_rejected() {
        let err = store().predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            PredictionError::FeatureCountMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn long_and_empty_vectors_are_rejected() {
        let store = store();
        for len in [0, 5, 9] {
            let err = store.predict(&vec![1.0; len]).unwrap_err();
            assert_eq!(
                err,
                PredictionError::FeatureCountMismatch {
                    expected: 4,
                    actual: len
                }
            );
        }
    }

    #[test]
    fn missing_model_file_is_not_found() {
        let err = ModelStore::load(
            Path::new("does/not/exist.safetensors"),
            Path::new("does/not/exist.json"),
        )
        .unwrap_err();

        match err {
            LoadError::ArtifactNotFound { path } => {
                assert_eq!(path, Path::new("does/not/exist.safetensors"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
