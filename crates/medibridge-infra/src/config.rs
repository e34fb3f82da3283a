//! Configuration loader for MediBridge.
//!
//! Reads `config.toml` from the data directory (`~/.medibridge/` by default)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use medibridge_types::config::AppConfig;
use secrecy::SecretString;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MEDIBRIDGE_DATA_DIR";

/// Resolve the data directory (database and `config.toml`).
///
/// Priority:
/// 1. `MEDIBRIDGE_DATA_DIR` environment variable
/// 2. `~/.medibridge`
/// 3. `./.medibridge` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".medibridge");
    }

    PathBuf::from(".medibridge")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// A missing file yields [`AppConfig::default()`]. A file that cannot be read
/// or parsed is logged and also yields the default.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Read an API key from the environment variable named in the config.
///
/// Unset, empty, or unnamed variables mean no key.
pub fn resolve_api_key(env_var: Option<&str>) -> Option<SecretString> {
    let value = std::env::var(env_var?).ok()?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(SecretString::from(value.to_string()))
}
