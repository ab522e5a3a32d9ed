//! YAML config file at `~/.siteship/config.yaml` (or `$SITESHIP_CONFIG`).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::application::ports::ConfigStore;
use crate::domain::SiteshipConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SITESHIP_CONFIG";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
#[derive(Debug, Clone)]
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$SITESHIP_CONFIG`, else `~/.siteship/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither is set and the home directory is unknown.
    pub fn from_env() -> Result<Self> {
        default_path(std::env::var_os(CONFIG_ENV).map(PathBuf::from), dirs::home_dir()).map(Self::new)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_path(env_override: Option<PathBuf>, home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = env_override {
        return Ok(path);
    }
    let home = home.ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".siteship").join("config.yaml"))
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<SiteshipConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(SiteshipConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        let config: SiteshipConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", self.path.display()))?;
        Ok(config)
    }
}
