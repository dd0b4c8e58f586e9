//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.promptpilot/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PilotConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub improve_path: Option<String>,
    pub health_path: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    pub token: Option<String>,
    pub required: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub typing_interval_ms: Option<u64>,
    pub skip_health_check: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_IMPROVE_PATH: &str = "/api/improve-prompt";
pub const DEFAULT_HEALTH_PATH: &str = "/api/health";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TYPING_INTERVAL_MS: u64 = 30;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub improve_path: String,
    pub health_path: String,
    pub request_timeout: Duration,
    pub auth_token: Option<String>,
    pub auth_required: bool,
    pub typing_interval: Duration,
    pub skip_health_check: bool,
}

/// Values that came from the command line (None/false = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub backend_url: Option<String>,
    pub skip_health_check: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.promptpilot/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".promptpilot").join("config.toml"))
}

/// Load config from `~/.promptpilot/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PilotConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PilotConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(PilotConfig::default());
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(PilotConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<PilotConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PilotConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", redacted(&config));
    Ok(config)
}

/// Debug view of the config with the token blanked out.
fn redacted(config: &PilotConfig) -> String {
    format!(
        "backend={:?}, auth.token={}, auth.required={:?}, ui={:?}",
        config.backend,
        if config.auth.token.is_some() { "<set>" } else { "<unset>" },
        config.auth.required,
        config.ui
    )
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Prompt Pilot Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:5000"     # Or set PROMPTPILOT_BACKEND_URL
# improve_path = "/api/improve-prompt"
# health_path = "/api/health"
# request_timeout_secs = 60

# [auth]
# token = "..."                          # Or set PROMPTPILOT_TOKEN
# required = false                       # Refuse to open the chat without a token

# [ui]
# typing_interval_ms = 30                # AI reply reveal speed
# skip_health_check = false
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &PilotConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .backend_url
        .clone()
        .or_else(|| std::env::var("PROMPTPILOT_BACKEND_URL").ok())
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Token: env → config
    let auth_token = std::env::var("PROMPTPILOT_TOKEN")
        .ok()
        .or_else(|| config.auth.token.clone())
        .filter(|t| !t.trim().is_empty());

    ResolvedConfig {
        base_url,
        improve_path: config
            .backend
            .improve_path
            .clone()
            .unwrap_or_else(|| DEFAULT_IMPROVE_PATH.to_string()),
        health_path: config
            .backend
            .health_path
            .clone()
            .unwrap_or_else(|| DEFAULT_HEALTH_PATH.to_string()),
        request_timeout: Duration::from_secs(
            config
                .backend
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        ),
        auth_token,
        auth_required: config.auth.required.unwrap_or(false),
        typing_interval: Duration::from_millis(
            config
                .ui
                .typing_interval_ms
                .unwrap_or(DEFAULT_TYPING_INTERVAL_MS),
        ),
        skip_health_check: cli.skip_health_check || config.ui.skip_health_check.unwrap_or(false),
    }
}
