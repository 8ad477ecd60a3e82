//! Client configuration and session persistence.
//!
//! Resolution is layered:
//!
//! 1. **Built-in defaults** — [`ClientConfig::default`]
//! 2. **User config file** — `~/.adminctl/config.toml`
//! 3. **Environment variables** — `ADMINCTL_*` overrides (highest precedence)
//!
//! The same dot-directory also holds the persisted session token
//! (`~/.adminctl/token`) and the dictionary cache, so `adminctl` sessions
//! survive across invocations.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the backend base URL.
const ENV_BASE_URL: &str = "ADMINCTL_BASE_URL";
/// Environment variable overriding the request timeout (milliseconds).
const ENV_TIMEOUT_MS: &str = "ADMINCTL_TIMEOUT_MS";

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Resolved client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL; request paths are appended verbatim.
    pub base_url: String,
    /// Client-wide request deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 50_000,
        }
    }
}

impl ClientConfig {
    /// Annotated default config written by `adminctl config-file init`.
    pub fn default_toml() -> String {
        r#"# adminctl configuration
#
# Values here override built-in defaults; ADMINCTL_* environment
# variables override both.

# Backend base URL.
base_url = "http://localhost:8080"

# Request timeout in milliseconds.
timeout_ms = 50000
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration: defaults → config file → env.
pub fn load() -> ClientConfig {
    let mut config = ClientConfig::default();

    if let Some(file) = load_toml_file(config_file_path()) {
        config = file;
    }

    apply_env_overrides(&mut config);
    config
}

/// Load a TOML config file if it exists and parses; otherwise `None`.
fn load_toml_file(path: Option<PathBuf>) -> Option<ClientConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Apply `ADMINCTL_*` environment overrides.
fn apply_env_overrides(config: &mut ClientConfig) {
    if let Ok(val) = std::env::var(ENV_BASE_URL)
        && !val.is_empty()
    {
        config.base_url = val;
    }
    if let Ok(val) = std::env::var(ENV_TIMEOUT_MS)
        && let Ok(ms) = val.parse::<u64>()
    {
        config.timeout_ms = ms;
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// The app dot-directory: `~/.adminctl`.
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".adminctl"))
}

/// Path to the user config file: `~/.adminctl/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("config.toml"))
}

/// Path to the persisted session token: `~/.adminctl/token`.
fn token_file_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("token"))
}

// ---------------------------------------------------------------------------
// Config file management
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.adminctl/config.toml`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = config_file_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.adminctl/ directory")?;
    }
    fs::write(&path, ClientConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// The effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Token persistence
// ---------------------------------------------------------------------------

/// Read the persisted session token, if any.
pub fn load_token() -> Option<String> {
    let path = token_file_path()?;
    let token = fs::read_to_string(path).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}

/// Persist the session token for later invocations.
pub fn save_token(token: &str) -> Result<()> {
    let path = token_file_path().context("could not determine home directory")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.adminctl/ directory")?;
    }
    fs::write(&path, token).context("failed to write token file")
}

/// Delete the persisted session token (forced logout, `adminctl logout`).
pub fn delete_token() {
    if let Some(path) = token_file_path() {
        let _ = fs::remove_file(path);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_ms, 50_000);
    }

    #[test]
    fn default_toml_parses_back_to_defaults() {
        let parsed: ClientConfig = toml::from_str(&ClientConfig::default_toml()).unwrap();
        assert_eq!(parsed.base_url, ClientConfig::default().base_url);
        assert_eq!(parsed.timeout_ms, ClientConfig::default().timeout_ms);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let parsed: ClientConfig =
            toml::from_str(r#"base_url = "https://admin.example.org""#).unwrap();
        assert_eq!(parsed.base_url, "https://admin.example.org");
        assert_eq!(parsed.timeout_ms, 50_000);
    }
}
