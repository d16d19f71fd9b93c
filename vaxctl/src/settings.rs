use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Base URL used when neither the config file nor the environment sets one.
pub const DEFAULT_URL: &str = "http://localhost:5000";

/// Environment variable that overrides the `url` config key.
pub const URL_ENV: &str = "VAXCTL_URL";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaxctlSettings {
    /// Base URL of the automation service, without the `/api/v1` suffix.
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

impl Default for VaxctlSettings {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

impl VaxctlSettings {
    /// `~/.vaxctl`, home of the log file.
    pub fn settings_dir() -> Result<PathBuf> {
        home_dir()
            .map(|home| home.join(".vaxctl"))
            .context("$HOME is not set in the environment")
    }

    /// `~/.vaxctl.yaml`, read when `--config` is not given.
    pub fn default_config_file() -> Result<PathBuf> {
        home_dir()
            .map(|home| home.join(".vaxctl.yaml"))
            .context("$HOME is not set in the environment")
    }

    /// Parse a YAML config file. A file without a `url` key yields the default.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Resolve the effective settings: explicit `--config` path (must exist),
    /// else `~/.vaxctl.yaml` when present, else defaults. `VAXCTL_URL` wins
    /// over whatever the file says.
    pub fn resolve(config: Option<&Path>) -> Result<Self> {
        let mut settings = match config {
            Some(path) => Self::load_from(path)?,
            None => match Self::default_config_file() {
                Ok(path) if path.exists() => Self::load_from(&path)?,
                _ => {
                    debug!("no config file found, using defaults");
                    Self::default()
                }
            },
        };
        settings.apply_env(std::env::var(URL_ENV).ok());
        info!(url = %settings.url, "resolved settings");
        Ok(settings)
    }

    fn apply_env(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.url = url;
        }
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}
