use std::{path::PathBuf, sync::Arc};

use tempfile::TempDir;

use linreg_serve::{ModelArtifact, ModelStore, RequestHandler};

pub const COEFFICIENTS: [f64; 4] = [10.5, 20.3, -5.2, 15.1];
pub const INTERCEPT: f64 = 5.0;
pub const R2: f64 = 0.95;

pub fn feature_names() -> Vec<String> {
    ["x1", "x2", "x3", "x4"].map(String::from).to_vec()
}

pub fn artifact() -> ModelArtifact {
    ModelArtifact::new(COEFFICIENTS.to_vec(), INTERCEPT, R2, feature_names()).unwrap()
}

pub fn handler() -> RequestHandler {
    RequestHandler::new(Arc::new(ModelStore::new(artifact())))
}

/// A temporary directory holding a weights file and its sidecar.
pub struct Fixture {
    pub dir: TempDir,
    pub model_path: PathBuf,
    pub info_path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("model.safetensors");
        let info_path = dir.path().join("model_info.json");
        artifact().save(&model_path, &info_path).unwrap();

        Self {
            dir,
            model_path,
            info_path,
        }
    }

    pub fn write_info(&self, json: &str) {
        std::fs::write(&self.info_path, json).unwrap();
    }
}
