//! Configuration file discovery
//!
//! The engine configuration is looked up in this order:
//!
//! 1. an explicit path (the `--config` flag),
//! 2. the `PADMAP_CONFIG` environment variable,
//! 3. `padmap.yaml` in the current working directory,
//! 4. `padmap/padmap.yaml` in the user configuration directory
//!    (`~/.config` on Linux, `%APPDATA%` on Windows).
//!
//! When none of them exists the built-in resources are used.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "PADMAP_CONFIG";

/// Configuration file name in the working and user config directories
const CONFIG_FILE_NAME: &str = "padmap.yaml";

/// Application name used for the user configuration directory
const APP_DIR_NAME: &str = "padmap";

/// Where a configuration file was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    Flag,
    Environment,
    WorkingDir,
    UserConfigDir,
}

/// A located configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub origin: ConfigOrigin,
}

impl ConfigLocation {
    /// Locate the configuration file, or `None` to run on built-in defaults
    ///
    /// Explicit and environment paths are returned even if they do not
    /// exist, so that loading reports the missing file instead of silently
    /// falling back.
    pub fn detect(explicit: Option<&Path>) -> Option<Self> {
        if let Some(path) = explicit {
            return Some(Self::new(path, ConfigOrigin::Flag));
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            return Some(Self::new(path, ConfigOrigin::Environment));
        }

        let cwd_config = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(CONFIG_FILE_NAME);
        if cwd_config.exists() {
            return Some(Self::new(cwd_config, ConfigOrigin::WorkingDir));
        }

        if let Some(user_config) = user_config_path() {
            debug!("Checking user config: {}", user_config.display());
            if user_config.exists() {
                return Some(Self::new(user_config, ConfigOrigin::UserConfigDir));
            }
        }

        None
    }

    fn new(path: impl Into<PathBuf>, origin: ConfigOrigin) -> Self {
        Self {
            path: path.into(),
            origin,
        }
    }

    /// Directory holding the configuration file
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// `padmap/padmap.yaml` inside the platform config directory
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_explicit_path_wins() {
        std::env::set_var(CONFIG_ENV_VAR, "/from/env.yaml");
        let location = ConfigLocation::detect(Some(Path::new("/from/flag.yaml"))).unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(location.origin, ConfigOrigin::Flag);
        assert_eq!(location.path, PathBuf::from("/from/flag.yaml"));
        assert_eq!(location.base_dir(), PathBuf::from("/from"));
    }

    #[test]
    #[serial]
    fn test_environment_variable() {
        std::env::set_var(CONFIG_ENV_VAR, "/from/env.yaml");
        let location = ConfigLocation::detect(None).unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(location.origin, ConfigOrigin::Environment);
        assert_eq!(location.path, PathBuf::from("/from/env.yaml"));
    }

    #[test]
    #[serial]
    fn test_empty_environment_variable_is_ignored() {
        std::env::set_var(CONFIG_ENV_VAR, "");
        let location = ConfigLocation::detect(None);
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_ne!(location.map(|l| l.origin), Some(ConfigOrigin::Environment));
    }

    #[test]
    fn test_user_config_path_shape() {
        if let Some(path) = user_config_path() {
            assert!(path.ends_with("padmap/padmap.yaml"));
        }
    }
}
