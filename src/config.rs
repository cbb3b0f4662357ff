//! Explorer configuration loaded from `config.yaml`

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::auth::{AuthSettings, KeyPlacement};
use crate::constants::{DEFAULT_LOG_FILE, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Named API keys available for selection, in declaration order
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyRegistry(IndexMap<String, String>);

impl ApiKeyRegistry {
    pub fn add(&mut self, name: impl Into<String>, key: impl Into<String>) {
        self.0.insert(name.into(), key.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|key| key.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|name| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Debug for ApiKeyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_file() -> String {
    String::from(DEFAULT_LOG_FILE)
}

/// Controller-owned configuration, handed to the app at construction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub api_keys: ApiKeyRegistry,
    #[serde(default)]
    pub api_key_placement: KeyPlacement,
    #[serde(default)]
    pub default_auth: AuthSettings,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log file, relative paths resolve against the config directory
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            api_keys: ApiKeyRegistry::default(),
            api_key_placement: KeyPlacement::default(),
            default_auth: AuthSettings::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_file: default_log_file(),
        }
    }
}

impl ExplorerConfig {
    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(ExplorerConfig::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ExplorerConfig::load(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_keys_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "api_keys:\n  sandbox: abc\n  production: xyz\ntimeout_secs: 5\n",
        )
        .unwrap();

        let config = ExplorerConfig::load(&path).unwrap();
        let names: Vec<&str> = config.api_keys.names().collect();
        assert_eq!(names, vec!["sandbox", "production"]);
        assert_eq!(config.api_keys.get("production"), Some("xyz"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.api_key_placement, KeyPlacement::Basic);
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "timeout_secs: [nope").unwrap();
        assert!(matches!(
            ExplorerConfig::load(&path),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn test_round_trip() {
        let mut config = ExplorerConfig::default();
        config.api_keys.add("sandbox", "abc");
        config.api_key_placement = KeyPlacement::Header("X-Api-Key".into());
        config.default_auth = AuthSettings::Bearer("tok".into());

        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: ExplorerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut registry = ApiKeyRegistry::default();
        registry.add("sandbox", "abc123");
        let debug = format!("{:?}", registry);
        assert!(debug.contains("sandbox"));
        assert!(!debug.contains("abc123"));
    }
}
