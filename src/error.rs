use std::{error::Error, fmt, io, path::PathBuf};

/// Failures while loading the model artifact. All of them are fatal at start-up.
#[derive(Debug)]
pub enum LoadError {
    /// One of the artifact files does not exist.
    ArtifactNotFound { path: PathBuf },
    /// A file exists but cannot be decoded into the expected shape.
    ArtifactCorrupt { path: PathBuf, reason: String },
    /// Both files decode but disagree with each other or with themselves.
    ArtifactInconsistent(String),
    /// Any other I/O failure reading a file.
    Io { path: PathBuf, source: io::Error },
}

impl LoadError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::ArtifactCorrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArtifactNotFound { path } => {
                write!(f, "model artifact not found: {}", path.display())
            }
            Self::ArtifactCorrupt { path, reason } => {
                write!(f, "model artifact {} is corrupt: {reason}", path.display())
            }
            Self::ArtifactInconsistent(msg) => write!(f, "model artifact is inconsistent: {msg}"),
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failures while writing the model artifact files.
#[derive(Debug)]
pub enum SaveError {
    /// The weights could not be encoded.
    Encode { path: PathBuf, reason: String },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode { path, reason } => {
                write!(f, "cannot encode {}: {reason}", path.display())
            }
            Self::Io { path, source } => write!(f, "cannot write {}: {source}", path.display()),
        }
    }
}

impl Error for SaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Per-request failures. None of them affect process state.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionError {
    FeatureCountMismatch { expected: usize, actual: usize },
    NonFiniteFeature { index: usize },
    NonFinitePrediction,
}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeatureCountMismatch { expected, actual } => {
                write!(f, "expected {expected} features, got {actual}")
            }
            Self::NonFiniteFeature { index } => {
                write!(f, "feature at index {index} is not a finite number")
            }
            Self::NonFinitePrediction => write!(f, "prediction is not a finite number"),
        }
    }
}

impl Error for PredictionError {}

/// A query-string feature that is not a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureParseError {
    pub position: usize,
    pub value: String,
}

impl fmt::Display for FeatureParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to parse feature {} ({:?}) as a number",
            self.position, self.value
        )
    }
}

impl Error for FeatureParseError {}

/// Invalid server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPort { value: String },
    /// A `.env` file exists but cannot be read or parsed.
    Dotenv { reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { value } => write!(f, "invalid SERVER_PORT: {value:?}"),
            Self::Dotenv { reason } => write!(f, "cannot load .env file: {reason}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_mismatch_message_names_both_counts() {
        let err = PredictionError::FeatureCountMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "expected 4 features, got 3");
    }

    #[test]
    fn io_error_is_exposed_as_source() {
        let err = LoadError::Io {
            path: PathBuf::from("models/model_info.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("models/model_info.json"));
    }

    #[test]
    fn save_error_reads_as_a_write_failure() {
        let err = SaveError::Io {
            path: PathBuf::from("out/model.safetensors"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("cannot write out/model.safetensors"));
    }
}
