//! Configuration for a reform deployment.
//!
//! Loaded from TOML with sensible defaults; a missing config file means
//! defaults. One config describes one namespace: its media layout, its
//! declared filters, and the generation/cleanup switches.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::filters::FilterSpec;
use crate::registry::FilterRegistry;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Namespace the declared filters register under
    pub namespace: Namespace,

    /// Media layout
    pub storage: StorageConfig,

    /// Generation and cleanup switches
    pub reform: ReformConfig,

    /// Declared filters, in registration order
    #[serde(rename = "filter")]
    pub filters: Vec<FilterSpec>,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Newtype wrapper so the namespace defaults sensibly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Namespace(pub String);

impl Default for Namespace {
    fn default() -> Self {
        Self("default".to_string())
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Media layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory all blobs live under
    pub media_root: PathBuf,

    /// Originals directory, relative to the media root
    pub upload_dir: PathBuf,

    /// Reform root directory, relative to the media root
    pub reform_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_root: PathBuf::from("media"),
            upload_dir: PathBuf::from("originals"),
            reform_dir: PathBuf::from("reforms"),
        }
    }
}

/// Generation and cleanup switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReformConfig {
    /// Allow-list of filter names for generation; empty means all
    pub filters: Vec<String>,

    /// Delete original blobs when their record is destroyed
    pub delete_originals: bool,
}

impl Default for ReformConfig {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            delete_originals: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file path, platform-appropriate with a
    /// `~/.reform/config.toml` fallback.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "reform-lite", "reform")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".reform").join("config.toml")
            })
    }

    /// Resolved media root (with ~ expansion).
    pub fn media_root(&self) -> PathBuf {
        let path_str = self.storage.media_root.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Originals directory, relative to the media root.
    pub fn originals_dir(&self) -> &Path {
        &self.storage.upload_dir
    }

    /// Reform root directory, relative to the media root.
    pub fn reform_root(&self) -> &Path {
        &self.storage.reform_dir
    }

    /// Build a registry holding the declared filters, registered under the
    /// configured namespace in declaration order.
    pub fn build_registry(&self) -> Result<FilterRegistry, crate::error::ReformError> {
        let mut registry = FilterRegistry::new();
        registry.register(&self.namespace.0, self.filters.iter().map(FilterSpec::build))?;
        Ok(registry)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.0.is_empty() {
            return Err(ConfigError::ValidationError(
                "namespace must not be empty".to_string(),
            ));
        }
        for (i, spec) in self.filters.iter().enumerate() {
            if self.filters[..i].iter().any(|s| s.name() == spec.name()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate filter name '{}'",
                    spec.name()
                )));
            }
        }
        for name in &self.reform.filters {
            if !self.filters.is_empty() && !self.filters.iter().any(|s| s.name() == name) {
                return Err(ConfigError::ValidationError(format!(
                    "allow-list names unknown filter '{name}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.namespace.0, "default");
        assert_eq!(config.storage.upload_dir, PathBuf::from("originals"));
        assert_eq!(config.storage.reform_dir, PathBuf::from("reforms"));
        assert!(!config.reform.delete_originals);
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[storage]"));
        assert!(toml.contains("[reform]"));
        assert!(toml.contains("[logging]"));
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            namespace = "gallery"

            [storage]
            media_root = "/srv/media"
            reform_dir = "variants"

            [reform]
            filters = ["thumbnail"]
            delete_originals = true

            [[filter]]
            type = "resize_smart"
            name = "thumbnail"
            format = "jpeg"
            width = 128
            height = 128

            [[filter]]
            type = "reformat"
            name = "webp"
            format = "webp"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.namespace.0, "gallery");
        assert_eq!(config.reform_root(), Path::new("variants"));
        assert_eq!(config.filters.len(), 2);

        let registry = config.build_registry().unwrap();
        assert_eq!(
            registry.registered_names("gallery").unwrap(),
            vec!["thumbnail", "webp"]
        );
    }

    #[test]
    fn test_duplicate_filter_names_rejected() {
        let toml = r#"
            [[filter]]
            type = "reformat"
            name = "same"
            format = "png"

            [[filter]]
            type = "reformat"
            name = "same"
            format = "jpeg"
        "#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, toml).unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_allow_list_must_name_declared_filters() {
        let toml = r#"
            [reform]
            filters = ["ghost"]

            [[filter]]
            type = "reformat"
            name = "real"
            format = "png"
        "#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, toml).unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
