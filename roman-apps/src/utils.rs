use std::path::{Path, PathBuf};

use roman::RobotConfig;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const ROMAN_CONFIG_ENV_NAME: &str = "ROMAN_ROBOT_CONFIG_PATH";

/// Get robot config path from input or env ROMAN_ROBOT_CONFIG_PATH
pub fn get_robot_config_path(config_path: Option<PathBuf>) -> Option<PathBuf> {
    if config_path.is_some() {
        config_path
    } else {
        std::env::var(ROMAN_CONFIG_ENV_NAME)
            .map(|s| {
                warn!("### ENV VAR {ROMAN_CONFIG_ENV_NAME}={s} is used ###");
                PathBuf::from(s)
            })
            .ok()
    }
}

/// Loads the config file, or the default config when there is none.
pub fn resolve_robot_config(config_path: Option<&Path>) -> Result<RobotConfig, roman::Error> {
    match config_path {
        Some(path) => RobotConfig::try_new(path),
        None => Ok(RobotConfig::default()),
    }
}

/// Logs to stderr, filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
