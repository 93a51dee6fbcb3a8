//! feedgraph configuration file handling
//!
//! Loads and manages ~/.config/feedgraph/config.yaml.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the record store lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON snapshot file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("db.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Per-request resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Time budget for one query, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Scan users while resolving "all tweets" so authors resolve from cache
    #[serde(default = "default_warm_user_cache")]
    pub warm_user_cache: bool,
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_warm_user_cache() -> bool {
    true
}

impl RequestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            warm_user_cache: default_warm_user_cache(),
        }
    }
}

/// Who "currentUser" is
///
/// There is no session subsystem yet; this is where one would plug in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Resolve the viewer by handle. Unset means the first user in store order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

/// Response rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

/// feedgraph configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedGraphConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl FeedGraphConfig {
    /// Create a configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the default path (~/.config/feedgraph/config.yaml)
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        Self::load(&path)
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::FeedGraphError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading feedgraph configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            store = %config.store.path.display(),
            timeout_ms = config.request.timeout_ms,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving feedgraph configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/feedgraph/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("feedgraph");
        path.push("config.yaml");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_defaults() {
        let config = FeedGraphConfig::new();
        assert_eq!(config.store.path, PathBuf::from("db.json"));
        assert_eq!(config.request.timeout_ms, 5000);
        assert!(config.request.warm_user_cache);
        assert!(config.viewer.handle.is_none());
        assert!(config.output.pretty);
    }

    #[test]
    fn test_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        let mut config = FeedGraphConfig::new();
        config.viewer.handle = Some("ada".to_string());
        config.request.timeout_ms = 100;
        config.save(path).unwrap();

        let loaded = FeedGraphConfig::load(path).unwrap();
        assert_eq!(loaded.viewer.handle.as_deref(), Some("ada"));
        assert_eq!(loaded.request.timeout(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: FeedGraphConfig =
            serde_yaml::from_str("request:\n  warm_user_cache: false\n").unwrap();
        assert!(!config.request.warm_user_cache);
        assert_eq!(config.request.timeout_ms, 5000);
        assert_eq!(config.store.path, PathBuf::from("db.json"));
    }

    #[test]
    fn test_default_path() {
        let path = FeedGraphConfig::default_path();
        assert!(path.ends_with("feedgraph/config.yaml"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = FeedGraphConfig::load("/nonexistent/config.yaml");
        assert!(matches!(result, Err(crate::FeedGraphError::Config(_))));
    }
}
