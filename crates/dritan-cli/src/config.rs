/*
[INPUT]:  YAML configuration file, DRITAN_* environment variables, CLI flags
[OUTPUT]: Resolved CLI configuration and SDK client configs
[POS]:    Configuration layer - connection settings
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;
use dritan_sdk::{ClientConfig, CredentialPlacement, ThsConfig};
use serde::{Deserialize, Serialize};

pub const ENV_API_KEY: &str = "DRITAN_API_KEY";
pub const ENV_BASE_URL: &str = "DRITAN_BASE_URL";
pub const ENV_WS_BASE_URL: &str = "DRITAN_WS_BASE_URL";
pub const ENV_CONTROL_BASE_URL: &str = "DRITAN_CONTROL_BASE_URL";
pub const ENV_THS_BASE_URL: &str = "DRITAN_THS_BASE_URL";

/// Settings read from the config file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CliConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub ws_base_url: Option<String>,
    pub control_base_url: Option<String>,
    pub ths_base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    pub credential_placement: Option<CredentialPlacement>,
    pub log_level: Option<String>,
}

/// Connection flags shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// API key (overrides DRITAN_API_KEY and the config file)
    #[arg(long, value_name = "KEY", global = true)]
    pub api_key: Option<String>,
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,
    #[arg(long, value_name = "URL", global = true)]
    pub ws_base_url: Option<String>,
    #[arg(long, value_name = "URL", global = true)]
    pub control_base_url: Option<String>,
    #[arg(long, value_name = "URL", global = true)]
    pub ths_base_url: Option<String>,
    /// Where streams send the API key: query or header
    #[arg(long, value_name = "PLACEMENT", global = true)]
    pub credential_placement: Option<CredentialPlacement>,
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("parse config file {}", path.display()))?;
        Ok(config)
    }

    /// `~/.config/dritan/config.yaml` (platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dritan").join("config.yaml"))
    }

    /// Explicit path must exist; the default path is optional
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override file values with non-empty variables from `lookup`
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = read(ENV_API_KEY) {
            self.api_key = Some(value);
        }
        if let Some(value) = read(ENV_BASE_URL) {
            self.base_url = Some(value);
        }
        if let Some(value) = read(ENV_WS_BASE_URL) {
            self.ws_base_url = Some(value);
        }
        if let Some(value) = read(ENV_CONTROL_BASE_URL) {
            self.control_base_url = Some(value);
        }
        if let Some(value) = read(ENV_THS_BASE_URL) {
            self.ths_base_url = Some(value);
        }
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        let ConfigOverrides {
            api_key,
            base_url,
            ws_base_url,
            control_base_url,
            ths_base_url,
            credential_placement,
        } = overrides.clone();

        self.api_key = api_key.or(self.api_key.take());
        self.base_url = base_url.or(self.base_url.take());
        self.ws_base_url = ws_base_url.or(self.ws_base_url.take());
        self.control_base_url = control_base_url.or(self.control_base_url.take());
        self.ths_base_url = ths_base_url.or(self.ths_base_url.take());
        self.credential_placement = credential_placement.or(self.credential_placement);
    }

    /// SDK client configuration; the key is only required for authenticated endpoints
    pub fn client_config(&self, require_api_key: bool) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty());
        if require_api_key && api_key.is_none() {
            bail!(
                "API key missing: pass --api-key, set {ENV_API_KEY} or add api_key to the config file"
            );
        }

        let mut config = ClientConfig::new(api_key.unwrap_or_default());
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(ws_base_url) = &self.ws_base_url {
            config = config.with_ws_base_url(ws_base_url);
        }
        if let Some(control_base_url) = &self.control_base_url {
            config = config.with_control_base_url(control_base_url);
        }
        if let Some(timeout) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        config.credential_placement = self.credential_placement;
        Ok(config)
    }

    pub fn ths_config(&self) -> ThsConfig {
        let mut config = ThsConfig::default();
        if let Some(base_url) = &self.ths_base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout = Duration::from_secs(timeout);
        }
        config
    }
}
