//! `charmrepo.toml` configuration loading.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the configuration file searched for upward from the working directory.
pub const CONFIG_FILE: &str = "charmrepo.toml";

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Charm store connection settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Attributes sent as Juju metadata headers.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// `[store]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoreConfig {
    /// Charm store root URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,
    /// User agent override.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Do not increase download statistics.
    #[serde(default)]
    pub test_mode: bool,
}

impl CliConfig {
    /// Search upward from `start_dir` for a `charmrepo.toml` file and parse it.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((config, candidate)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Load the configuration at an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Client parameters for the configured store.
    pub fn params(&self) -> csclient::Params {
        csclient::Params {
            url: self.store.url.clone(),
            timeout: self.store.timeout.map(Duration::from_secs),
            user_agent: self.store.user_agent.clone(),
        }
    }
}
