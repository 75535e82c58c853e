//! Runs as its own test binary: these tests mutate the process environment.
use std::{env, fs, path::PathBuf};

use linreg_serve::{config, ConfigError, ServerConfig};

#[test]
fn dotenv_file_feeds_the_server_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(
        &path,
        "# deployment settings\n\
         MODEL_PATH=/srv/models/model.safetensors\n\
         MODEL_INFO_PATH=/srv/models/model_info.json\n\
         SERVER_HOST=0.0.0.0\n\
         SERVER_PORT=9123\n",
    )
    .unwrap();

    // Already-set variables win over the file.
    env::set_var("SERVER_HOST", "10.1.2.3");
    env::remove_var("SERVER_PORT");
    env::remove_var("MODEL_PATH");
    env::remove_var("MODEL_INFO_PATH");

    config::load_dotenv_from(&path).unwrap();
    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.port(), 9123);
    assert_eq!(config.host(), "10.1.2.3");
    assert_eq!(
        config.model_path(),
        &PathBuf::from("/srv/models/model.safetensors")
    );
    assert_eq!(
        config.model_info_path(),
        &PathBuf::from("/srv/models/model_info.json")
    );
}

#[test]
fn missing_dotenv_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = config::load_dotenv_from(&dir.path().join(".env")).unwrap_err();
    assert!(matches!(err, ConfigError::Dotenv { .. }), "{err}");
}
