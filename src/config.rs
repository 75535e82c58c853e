use std::{
    env,
    path::{Path, PathBuf},
};

use crate::error::ConfigError;

pub const DEFAULT_MODEL_PATH: &str = "models/model.safetensors";
pub const DEFAULT_MODEL_INFO_PATH: &str = "models/model_info.json";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Loads the nearest `.env` file (working directory or a parent) into the
/// process environment. Variables already set are left untouched.
///
/// # Returns
/// The path of the file read, or `None` if there is no `.env` file.
///
/// # Errors
/// Returns `Dotenv` if the file exists but cannot be read or parsed.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::Dotenv {
            reason: e.to_string(),
        }),
    }
}

/// Same as [`load_dotenv`] for an explicit file.
///
/// # Errors
/// Returns `Dotenv` if the file is missing, unreadable or malformed.
pub fn load_dotenv_from(path: &Path) -> Result<(), ConfigError> {
    dotenvy::from_path(path).map_err(|e| ConfigError::Dotenv {
        reason: format!("{}: {e}", path.display()),
    })
}

/// Immutable server settings, read from the environment once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    model_path: PathBuf,
    model_info_path: PathBuf,
    host: String,
    port: u16,
}

impl ServerConfig {
    /// Reads `MODEL_PATH`, `MODEL_INFO_PATH`, `SERVER_HOST` and `SERVER_PORT`.
    ///
    /// # Errors
    /// Returns `InvalidPort` if `SERVER_PORT` is set but not a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("SERVER_PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            model_path: lookup("MODEL_PATH")
                .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string())
                .into(),
            model_info_path: lookup("MODEL_INFO_PATH")
                .unwrap_or_else(|| DEFAULT_MODEL_INFO_PATH.to_string())
                .into(),
            host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    pub fn model_path(&self) -> &PathBuf {
        &self.model_path
    }

    pub fn model_info_path(&self) -> &PathBuf {
        &self.model_info_path
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, ready for `TcpListener::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.into(),
            model_info_path: DEFAULT_MODEL_INFO_PATH.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
