//! Configuration loading
//!
//! Resolution order:
//! 1. Explicit path (`--config`), which must exist
//! 2. `~/.config/spending-lens/config.toml` if present
//! 3. Built-in defaults
//!
//! Environment variables override whatever the file says:
//! `SPENDING_LENS_API_URL`, `SPENDING_LENS_USERNAME`, `SPENDING_LENS_PASSWORD`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::aggregator::SpendingBasis;
use crate::client::Credentials;
use crate::error::{Error, Result};
use crate::filter::EmptySelection;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "SPENDING_LENS_API_URL";
pub const ENV_USERNAME: &str = "SPENDING_LENS_USERNAME";
pub const ENV_PASSWORD: &str = "SPENDING_LENS_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            username: None,
            password: None,
        }
    }
}

impl ApiConfig {
    /// Credentials, if both halves are configured
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyConfig {
    pub spending_basis: SpendingBasis,
    pub empty_selection: EmptySelection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub api: ApiConfig,
    pub policy: PolicyConfig,
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    api: Option<RawApi>,
    policy: Option<RawPolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawApi {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPolicy {
    spending_basis: Option<String>,
    empty_selection: Option<String>,
}

/// Default config path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("spending-lens").join("config.toml"))
}

impl Config {
    /// Load config from file (if any) and apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Config::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        debug!(path = %path.display(), "Reading config");
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse config from TOML content
    pub fn parse(content: &str) -> Result<Config> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut config = Config::default();

        if let Some(api) = raw.api {
            if let Some(url) = api.base_url {
                config.api.base_url = url.trim_end_matches('/').to_string();
            }
            if let Some(secs) = api.timeout_secs {
                if secs == 0 {
                    return Err(Error::InvalidData("api.timeout_secs must be positive".to_string()));
                }
                config.api.timeout = Duration::from_secs(secs);
            }
            config.api.username = api.username;
        }

        if let Some(policy) = raw.policy {
            if let Some(basis) = policy.spending_basis {
                config.policy.spending_basis = basis.parse()?;
            }
            if let Some(selection) = policy.empty_selection {
                config.policy.empty_selection = selection.parse()?;
            }
        }

        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process env in `load`)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(username) = lookup(ENV_USERNAME).filter(|v| !v.is_empty()) {
            self.api.username = Some(username);
        }
        // Passwords only ever come from the environment
        if let Some(password) = lookup(ENV_PASSWORD).filter(|v| !v.is_empty()) {
            self.api.password = Some(password);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.policy.spending_basis, SpendingBasis::ExpensesOnly);
        assert_eq!(config.policy.empty_selection, EmptySelection::ShowAll);
        assert!(config.api.credentials().is_none());
    }

    #[test]
    fn test_parse_full_file() {
        let config = Config::parse(
            r#"
[api]
base_url = "https://finance.example.org/"
timeout_secs = 5
username = "sam"

[policy]
spending_basis = "all_magnitudes"
empty_selection = "show_none"
"#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://finance.example.org");
        assert_eq!(config.api.timeout, Duration::from_secs(5));
        assert_eq!(config.api.username.as_deref(), Some("sam"));
        assert_eq!(config.policy.spending_basis, SpendingBasis::AllMagnitudes);
        assert_eq!(config.policy.empty_selection, EmptySelection::ShowNone);
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = Config::parse("[policy]\nempty_selection = \"show_all\"\n").unwrap();
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_parse_rejects_unknown_policy() {
        let result = Config::parse("[policy]\nspending_basis = \"vibes\"\n");
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_keys_and_zero_timeout() {
        assert!(matches!(Config::parse("[api]\nport = 1\n"), Err(Error::Config(_))));
        assert!(Config::parse("[api]\ntimeout_secs = 0\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://127.0.0.1:9000/"),
            (ENV_USERNAME, "alex"),
            (ENV_PASSWORD, "hunter2"),
        ]);
        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        let credentials = config.api.credentials().unwrap();
        assert_eq!(credentials.username, "alex");
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nbase_url = \"http://files.local\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.api.base_url, "http://files.local");
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let result = Config::load(Some(Path::new("/no/such/config.toml")));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
