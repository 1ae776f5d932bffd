//! Client configuration for reaching the credential store
//!
//! Located at `~/.config/conjur/config.toml`. Every setting can be overridden
//! from the environment; the API key is only ever read from the environment.

use crate::{ConfigError, Result};
use directories::ProjectDirs;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_APPLIANCE_URL: &str = "CONJUR_APPLIANCE_URL";
pub const ENV_ACCOUNT: &str = "CONJUR_ACCOUNT";
pub const ENV_AUTHN_LOGIN: &str = "CONJUR_AUTHN_LOGIN";
pub const ENV_AUTHN_API_KEY: &str = "CONJUR_AUTHN_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "CONJUR_TIMEOUT_SECS";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection and identity settings for the credential store
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the appliance, e.g. `https://conjur.example.com/api`
    pub appliance_url: Option<String>,
    /// Organization account used for authorization checks
    pub account: Option<String>,
    /// Login to authenticate as (`host/<id>` for hosts)
    pub authn_login: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// API key for `authn_login`; never read from the config file
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

impl ClientConfig {
    /// Load configuration from the default path and the process environment
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path and the process environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(
            "Loaded config from {:?}: appliance_url={:?}, account={:?}",
            path,
            config.appliance_url,
            config.account
        );

        Ok(config)
    }

    /// Overlay `CONJUR_*` variables; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_APPLIANCE_URL) {
            self.appliance_url = Some(url);
        }
        if let Some(account) = get(ENV_ACCOUNT) {
            self.account = Some(account);
        }
        if let Some(login) = get(ENV_AUTHN_LOGIN) {
            self.authn_login = Some(login);
        }
        if let Some(key) = get(ENV_AUTHN_API_KEY) {
            self.api_key = Some(SecretString::from(key));
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            match secs.trim().parse() {
                Ok(secs) => self.timeout_secs = Some(secs),
                Err(_) => tracing::warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, secs),
            }
        }
    }

    /// Appliance URL without a trailing slash
    pub fn appliance_url(&self) -> Result<&str> {
        self.appliance_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .ok_or_else(|| missing("appliance_url", ENV_APPLIANCE_URL))
    }

    pub fn account(&self) -> Result<&str> {
        self.account
            .as_deref()
            .ok_or_else(|| missing("account", ENV_ACCOUNT))
    }

    pub fn authn_login(&self) -> Result<&str> {
        self.authn_login
            .as_deref()
            .ok_or_else(|| missing("authn_login", ENV_AUTHN_LOGIN))
    }

    pub fn api_key(&self) -> Result<&SecretString> {
        self.api_key.as_ref().ok_or_else(|| {
            ConfigError::Invalid(format!("no API key set (export {})", ENV_AUTHN_API_KEY))
        })
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "conjur").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn missing(setting: &str, env: &str) -> ConfigError {
    ConfigError::Invalid(format!(
        "{} is not set (add it to config.toml or export {})",
        setting, env
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.appliance_url().is_err());
        assert!(config.api_key().is_err());
        assert_eq!(config.timeout().as_secs(), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
appliance_url = "https://conjur.example.com/api/"
account = "acme"
authn_login = "host/ci"
timeout_secs = 5
"#;

        let config: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.appliance_url().unwrap(), "https://conjur.example.com/api");
        assert_eq!(config.account().unwrap(), "acme");
        assert_eq!(config.authn_login().unwrap(), "host/ci");
        assert_eq!(config.timeout().as_secs(), 5);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: ClientConfig =
            toml::from_str(r#"appliance_url = "https://file.example.com""#).unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_APPLIANCE_URL, "https://env.example.com"),
            (ENV_AUTHN_API_KEY, "s3cr3t"),
            (ENV_ACCOUNT, ""),
            (ENV_TIMEOUT_SECS, "not-a-number"),
        ]
        .into_iter()
        .collect();

        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.appliance_url().unwrap(), "https://env.example.com");
        assert_eq!(config.api_key().unwrap().expose_secret(), "s3cr3t");
        assert!(config.account.is_none());
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = ClientConfig::default();
        config.apply_env(|k| (k == ENV_AUTHN_API_KEY).then(|| "hunter2".to_string()));
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ClientConfig::read_file(&tmp.path().join("config.toml")).unwrap();
        assert!(config.appliance_url.is_none());
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "appliance_url = [").unwrap();
        assert!(matches!(
            ClientConfig::read_file(&path),
            Err(ConfigError::TomlParseError { .. })
        ));
    }
}
