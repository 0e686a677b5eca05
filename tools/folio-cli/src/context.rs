//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use folio_data::{BackendClient, FileTokenStore, TokenStore};

use crate::config::FolioConfig;
use crate::output::Output;

const CONFIG_NAMES: [&str; 2] = ["folio.toml", ".folio.toml"];

/// Execution context for CLI commands.
pub struct Context {
    /// Effective configuration.
    pub config: FolioConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from a config file, an environment section, and
    /// environment variables.
    pub fn load(config_path: Option<&str>, env: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = PathBuf::from(path);
            (FolioConfig::load(&path)?, Some(path))
        } else {
            match find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (FolioConfig::default(), None),
            }
        };

        let mut config = match env {
            Some(env) => config.for_environment(env)?,
            None => config,
        };
        config.apply_env(|key| std::env::var(key).ok());

        tracing::debug!(
            base_url = %config.api.base_url,
            config = ?config_path,
            "configuration loaded"
        );

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Token store backing the bearer token.
    pub fn token_store(&self) -> FileTokenStore {
        FileTokenStore::new(self.config.token_path())
    }

    /// Backend client using the configured base url and token store.
    pub fn backend(&self) -> Result<Arc<BackendClient>> {
        let tokens: Arc<dyn TokenStore> = Arc::new(self.token_store());
        let client = BackendClient::new(self.config.api.base_url.clone(), tokens)
            .context("Failed to create backend client")?;
        Ok(Arc::new(client))
    }
}

/// Find a config file in the directory tree.
pub fn find_config(start: &Path) -> Option<(PathBuf, FolioConfig)> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                match FolioConfig::load(&config_path) {
                    Ok(config) => return Some((config_path, config)),
                    Err(e) => tracing::warn!(
                        path = %config_path.display(),
                        error = %e,
                        "ignoring unreadable config"
                    ),
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}
