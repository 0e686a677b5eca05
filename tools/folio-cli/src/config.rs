//! CLI configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_data::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_VAR: &str = "FOLIO_API_BASE_URL";

/// Environment variable overriding `storage.token_path`.
pub const TOKEN_PATH_VAR: &str = "FOLIO_TOKEN_PATH";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Backend connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Checkout behaviour.
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Environment-specific overrides.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub environments: HashMap<String, EnvironmentConfig>,
}

impl FolioConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Get environment-specific config.
    pub fn for_environment(&self, env: &str) -> Result<FolioConfig> {
        let env_config = self
            .environments
            .get(env)
            .with_context(|| format!("Unknown environment '{}'", env))?;

        let mut config = self.clone();
        if let Some(ref api) = env_config.api {
            config.api = api.clone();
        }
        if let Some(ref checkout) = env_config.checkout {
            config.checkout = checkout.clone();
        }
        Ok(config)
    }

    /// Apply overrides from environment variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(path) = lookup(TOKEN_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            self.storage.token_path = Some(PathBuf::from(path));
        }
    }

    /// Where the bearer token is kept.
    pub fn token_path(&self) -> PathBuf {
        self.storage
            .token_path
            .clone()
            .unwrap_or_else(|| config_dir().join("folio").join("token.json"))
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base url, including the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Local storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bearer token file (default: `~/.config/folio/token.json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,
}

/// Checkout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Simulated wallet approval delay in milliseconds.
    #[serde(default = "default_wallet_delay_ms")]
    pub wallet_delay_ms: u64,
}

fn default_wallet_delay_ms() -> u64 {
    1500
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            wallet_delay_ms: default_wallet_delay_ms(),
        }
    }
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub api: Option<ApiConfig>,

    #[serde(default)]
    pub checkout: Option<CheckoutConfig>,
}

/// Get the platform config directory.
fn config_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".config")
    } else {
        PathBuf::from(".")
    }
}

/// Generate a default folio.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Folio storefront configuration

[api]
base_url = "{DEFAULT_BASE_URL}"

[storage]
# token_path = "~/.config/folio/token.json"

[checkout]
wallet_delay_ms = 1500

[environments.staging.api]
base_url = "https://staging.example.com/api"

[environments.production.api]
base_url = "https://shop.example.com/api"
"#
    )
}
