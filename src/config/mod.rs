//! Configuration management for padmap
//!
//! Handles loading, parsing, and validation of the YAML engine configuration,
//! which says where the mapping resources live and whether to hot-reload
//! them.

pub mod watcher;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::loader::{DEFAULT_LABELS_RESOURCE, MAPPING_FILES_RESOURCE};

pub use watcher::CatalogWatcher;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Where mapping resources are read from
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Resource root directory; `None` selects the embedded resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default = "default_labels_resource")]
    pub default_labels: String,
    #[serde(default = "default_mapping_files_resource")]
    pub mapping_files: String,
}

/// Hot-reload settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WatchConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            root: None,
            default_labels: default_labels_resource(),
            mapping_files: default_mapping_files_resource(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file with validation
    ///
    /// A relative `sources.root` is resolved against the directory holding
    /// the configuration file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::from_yaml_str(&contents)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;

        if let Some(root) = config.sources.root.as_mut() {
            if root.is_relative() {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                *root = base.join(&*root);
            }
        }

        Ok(config)
    }

    /// Parse and validate YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(contents).context("Failed to parse YAML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if self.sources.default_labels.trim().is_empty() {
            anyhow::bail!("sources.default_labels cannot be empty");
        }
        if self.sources.mapping_files.trim().is_empty() {
            anyhow::bail!("sources.mapping_files cannot be empty");
        }
        if let Some(root) = &self.sources.root {
            if root.as_os_str().is_empty() {
                anyhow::bail!("sources.root cannot be empty (omit it to use the embedded resources)");
            }
        }

        if self.watch.debounce_ms > MAX_DEBOUNCE_MS {
            anyhow::bail!(
                "watch.debounce_ms {} is invalid (must be 0-{})",
                self.watch.debounce_ms,
                MAX_DEBOUNCE_MS
            );
        }
        if self.watch.enabled && self.sources.root.is_none() {
            anyhow::bail!("watch.enabled requires sources.root (embedded resources cannot change)");
        }

        Ok(())
    }
}

const MAX_DEBOUNCE_MS: u64 = 10_000;

// Default value functions
fn default_labels_resource() -> String { DEFAULT_LABELS_RESOURCE.to_string() }
fn default_mapping_files_resource() -> String { MAPPING_FILES_RESOURCE.to_string() }
fn default_debounce_ms() -> u64 { 100 }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = EngineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.sources.default_labels, "/mappings/default-labels.properties");
        assert_eq!(config.sources.mapping_files, "/mappings/mapping-files.properties");
        assert_eq!(config.watch.debounce_ms, 100);
        assert!(config.sources.root.is_none());
    }

    #[test]
    fn test_full_document() {
        let config = EngineConfig::from_yaml_str(
            r#"
sources:
  root: /srv/padmap
  mapping_files: /mappings/custom-list.properties
watch:
  enabled: true
  debounce_ms: 250
"#,
        )
        .unwrap();

        assert_eq!(config.sources.root, Some(PathBuf::from("/srv/padmap")));
        assert_eq!(config.sources.default_labels, "/mappings/default-labels.properties");
        assert_eq!(config.sources.mapping_files, "/mappings/custom-list.properties");
        assert!(config.watch.enabled);
        assert_eq!(config.watch.debounce_ms, 250);
    }

    #[test]
    fn test_validation_errors() {
        assert!(EngineConfig::from_yaml_str("sources:\n  default_labels: ''\n").is_err());
        assert!(EngineConfig::from_yaml_str("watch:\n  debounce_ms: 60000\n  enabled: false\n").is_err());

        let err = EngineConfig::from_yaml_str("watch:\n  enabled: true\n").unwrap_err();
        assert!(err.to_string().contains("sources.root"));
    }

    #[tokio::test]
    async fn test_load_resolves_relative_root() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("padmap.yaml");
        std::fs::write(&config_path, "sources:\n  root: resources\n")?;

        let config = EngineConfig::load(&config_path).await?;
        assert_eq!(config.sources.root, Some(temp_dir.path().join("resources")));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_and_reload() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("padmap.yaml");

        let mut config = EngineConfig::default();
        config.sources.root = Some(temp_dir.path().join("res"));
        config.watch.enabled = true;
        config.save(&config_path).await?;

        let loaded = EngineConfig::load(&config_path).await?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = EngineConfig::load("/nonexistent/padmap.yaml").await.unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
