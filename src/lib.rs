//! Serves a pre-trained linear regression model over HTTP.
//!
//! The model is loaded once from a safetensors weights file and a JSON
//! sidecar into a [`ModelStore`], wrapped in a [`RequestHandler`] and exposed
//! through the axum router in [`server`].
pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod server;

pub use config::ServerConfig;
pub use error::{ConfigError, FeatureParseError, LoadError, PredictionError, SaveError};
pub use handler::{ModelInfoResult, PredictionResult, RequestHandler};
pub use model::{ModelArtifact, ModelInfo, ModelStore};
