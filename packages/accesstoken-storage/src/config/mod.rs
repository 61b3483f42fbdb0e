//! Storage configuration
//!
//! Loaded from a versioned YAML file:
//!
//! ```yaml
//! version: 1
//! resource: accessTokens
//! completion_timeout_ms: 30000
//! log_filter: "info,accesstoken_storage=debug"
//! ```
//!
//! Every field except `version` is optional and falls back to
//! [`StorageConfig::default`].

mod error;

pub use error::{ConfigError, ConfigResult};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SUPPORTED_VERSIONS: &[u32] = &[1];
const DEFAULT_RESOURCE: &str = "accessTokens";
const DEFAULT_COMPLETION_TIMEOUT_MS: u64 = 30_000;
const MAX_COMPLETION_TIMEOUT_MS: u64 = 600_000;
const DEFAULT_LOG_FILTER: &str = "info";

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFileV1 {
    version: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    resource: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    completion_timeout_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    log_filter: Option<String>,
}

/// Settings for [`AccessTokenStorage`](crate::api::AccessTokenStorage)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    resource: String,
    completion_timeout_ms: u64,
    log_filter: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            resource: DEFAULT_RESOURCE.to_string(),
            completion_timeout_ms: DEFAULT_COMPLETION_TIMEOUT_MS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl StorageConfig {
    /// Load and validate a YAML config file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let defaults = Self::default();
        let config = Self {
            resource: file.resource.unwrap_or(defaults.resource),
            completion_timeout_ms: file
                .completion_timeout_ms
                .unwrap_or(defaults.completion_timeout_ms),
            log_filter: file.log_filter.unwrap_or(defaults.log_filter),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            resource: Some(self.resource.clone()),
            completion_timeout_ms: Some(self.completion_timeout_ms),
            log_filter: Some(self.log_filter.clone()),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.resource.trim().is_empty() {
            return Err(ConfigError::Empty("resource"));
        }
        if !(1..=MAX_COMPLETION_TIMEOUT_MS).contains(&self.completion_timeout_ms) {
            return Err(ConfigError::range_with_hint(
                "completion_timeout_ms",
                self.completion_timeout_ms,
                1,
                MAX_COMPLETION_TIMEOUT_MS,
                "Callers waiting on completion handles need a bounded, non-zero wait.",
            ));
        }
        EnvFilter::try_new(&self.log_filter).map_err(|e| ConfigError::LogFilter {
            filter: self.log_filter.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Resource name reported in status details
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Default bound for waiting on a completion handle
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_millis(self.completion_timeout_ms)
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = StorageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resource(), "accessTokens");
        assert_eq!(config.completion_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = StorageConfig::default()
            .with_resource("oauthaccesstokens")
            .with_completion_timeout(Duration::from_millis(250));

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("completion_timeout_ms: 250"));

        assert_eq!(StorageConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_yaml_loading() {
        let yaml_content = r#"
version: 1
completion_timeout_ms: 100
log_filter: "warn,accesstoken_storage=debug"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = StorageConfig::from_yaml(temp_file.path()).unwrap();
        assert_eq!(config.resource(), "accessTokens");
        assert_eq!(config.completion_timeout(), Duration::from_millis(100));
        assert_eq!(config.log_filter(), "warn,accesstoken_storage=debug");
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = StorageConfig::from_yaml_str("resource: accessTokens\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = StorageConfig::from_yaml_str("version: 2\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_unknown_field() {
        let result = StorageConfig::from_yaml_str("version: 1\nretries: 3\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = StorageConfig::from_yaml_str("version: 1\ncompletion_timeout_ms: 0\n");
        assert!(matches!(result, Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_empty_resource_rejected() {
        let config = StorageConfig::default().with_resource("  ");
        assert!(matches!(config.validate(), Err(ConfigError::Empty("resource"))));
    }

    #[test]
    fn test_missing_file() {
        let result = StorageConfig::from_yaml("/nonexistent/accesstoken-storage.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
