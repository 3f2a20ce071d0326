//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required variable is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SALONKIT_BASE_URL`: Backend base URL (required for env loading)
//! - `SALONKIT_TIMEOUT_SECS`: Request timeout in seconds (optional)
//! - `SALONKIT_MAX_ATTEMPTS`: Total request attempts (optional)
//! - `SALONKIT_STEP_MINUTES`: Slot step granularity in minutes (optional)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./salonkit.json` or `./salonkit.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use salonkit_domain::constants::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SLOT_STEP_MINUTES,
};
use salonkit_domain::{ClientConfig, Result, SalonError};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `SalonError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `SALONKIT_BASE_URL` is required; the remaining variables fall back to
/// their domain defaults when unset.
///
/// # Errors
/// Returns `SalonError::Config` if the base URL is missing or any set
/// variable has an invalid value.
pub fn load_from_env() -> Result<ClientConfig> {
    let base_url = std::env::var("SALONKIT_BASE_URL").map_err(|_| {
        SalonError::Config("Missing required environment variable: SALONKIT_BASE_URL".to_string())
    })?;

    let timeout_secs =
        env_parsed("SALONKIT_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS, "timeout")?;
    let max_attempts = env_parsed("SALONKIT_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS, "max attempts")?;
    let step_minutes =
        env_parsed("SALONKIT_STEP_MINUTES", DEFAULT_SLOT_STEP_MINUTES, "step minutes")?;

    Ok(ClientConfig { base_url, timeout_secs, max_attempts, step_minutes })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `SalonError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SalonError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SalonError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SalonError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SalonError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SalonError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SalonError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, up to two parent levels, and the
/// executable's directory, in that order.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("salonkit.json"),
            cwd.join("salonkit.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("salonkit.json"),
                exe_dir.join("salonkit.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Parse an optional numeric environment variable with a default
fn env_parsed<T: FromStr>(key: &str, default: T, label: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| SalonError::Config(format!("Invalid {label}: {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        std::env::remove_var("SALONKIT_BASE_URL");
        std::env::remove_var("SALONKIT_TIMEOUT_SECS");
        std::env::remove_var("SALONKIT_MAX_ATTEMPTS");
        std::env::remove_var("SALONKIT_STEP_MINUTES");
    }

    #[test]
    fn loads_from_env_with_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("SALONKIT_BASE_URL", "https://api.example.com");
        std::env::set_var("SALONKIT_STEP_MINUTES", "30");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.step_minutes, 30);

        clear_env();
    }

    #[test]
    fn missing_base_url_is_a_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let result = load_from_env();
        assert!(matches!(result, Err(SalonError::Config(_))));
    }

    #[test]
    fn invalid_numeric_var_is_a_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("SALONKIT_BASE_URL", "https://api.example.com");
        std::env::set_var("SALONKIT_TIMEOUT_SECS", "not-a-number");

        let result = load_from_env();
        assert!(matches!(result, Err(SalonError::Config(_))));

        clear_env();
    }

    #[test]
    fn loads_from_toml_file() {
        let toml_content = r#"
base_url = "https://api.example.com"
timeout_secs = 10
max_attempts = 2
step_minutes = 20
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("config from toml");
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.step_minutes, 20);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn loads_from_json_file_with_serde_defaults() {
        let json_content = r#"{"base_url": "https://api.example.com"}"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("config from json");
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.step_minutes, DEFAULT_SLOT_STEP_MINUTES);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(SalonError::Config(_))));
    }

    #[test]
    fn unsupported_extension_is_a_config_error() {
        let result = parse_config("anything", &PathBuf::from("config.yaml"));
        assert!(matches!(result, Err(SalonError::Config(_))));
    }
}
