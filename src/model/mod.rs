pub mod artifact;
pub mod store;
pub mod weights;

pub use artifact::{ModelArtifact, ModelInfo};
pub use store::ModelStore;
pub use weights::Weights;
