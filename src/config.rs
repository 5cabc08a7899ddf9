//! Configuration for voxbridge
//!
//! This module holds the connector-lifetime settings: the indexing base
//! applied to every index-taking call, and everything needed to locate
//! and start the host application.
//!
//! # Files
//!
//! Configuration is stored as TOML. [`default_path`] points at
//! `voxbridge.toml` in the platform config directory:
//!
//! - **Linux**: `~/.config/voxbridge/voxbridge.toml`
//! - **macOS**: `~/Library/Application Support/voxbridge/voxbridge.toml`
//! - **Windows**: `%APPDATA%\voxbridge\voxbridge.toml`
//!
//! # Example
//!
//! ```ignore
//! use voxbridge::config::ConnectorConfig;
//!
//! let config = ConnectorConfig::load("voxbridge.toml")?;
//! let launcher = HostLauncher::new(config.host.clone());
//! ```

use crate::error::{Result, VoxBridgeError};
use crate::types::IndexingBase;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name under the platform config directory
pub const CONFIG_DIR: &str = "voxbridge";

/// Configuration filename
pub const CONFIG_FILE: &str = "voxbridge.toml";

/// Environment variable overriding the host install directory
pub const HOST_PATH_ENV: &str = "VOXBRIDGE_HOST_PATH";

/// Default host executable name (platform suffix added on Windows)
pub const DEFAULT_HOST_EXECUTABLE: &str = "voxvis";

/// Default time to wait for a launched host to register, in milliseconds
pub const DEFAULT_STARTUP_TIMEOUT_MS: u64 = 60_000;

/// Default interval between registry polls during startup, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Settings for locating and starting the host application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Host install directory; `None` falls back to the
    /// `VOXBRIDGE_HOST_PATH` environment variable and then to platform
    /// default install locations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,

    /// Executable name inside the install directory
    pub executable: String,

    /// Numeric id the launched instance registers under
    pub instance_id: u32,

    /// How long to wait for a launched host to appear in the registry
    pub startup_timeout_ms: u64,

    /// Interval between registry polls while waiting
    pub poll_interval_ms: u64,

    /// Extra command-line arguments passed to the host executable
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            install_dir: None,
            executable: DEFAULT_HOST_EXECUTABLE.to_string(),
            instance_id: 0,
            startup_timeout_ms: DEFAULT_STARTUP_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            extra_args: Vec::new(),
        }
    }
}

/// Top-level connector configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Indexing origin for every index-taking call, fixed at construction
    #[serde(default)]
    pub indexing_base: IndexingBase,

    /// Host launch settings
    #[serde(default)]
    pub host: HostConfig,
}

impl ConnectorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VoxBridgeError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents).map_err(|e| {
            VoxBridgeError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)
            .map_err(|e| VoxBridgeError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents).map_err(|e| {
            VoxBridgeError::Config(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

/// Path of the configuration file in the platform config directory
pub fn default_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectorConfig::default();
        assert_eq!(config.indexing_base, IndexingBase::ZeroBased);
        assert_eq!(config.host.executable, DEFAULT_HOST_EXECUTABLE);
        assert_eq!(config.host.startup_timeout_ms, DEFAULT_STARTUP_TIMEOUT_MS);
        assert!(config.host.extra_args.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = ConnectorConfig::default();
        config.indexing_base = IndexingBase::OneBased;
        config.host.instance_id = 3;
        config.host.extra_args = vec!["--no-splash".to_string()];
        config.save(&path).unwrap();

        let loaded = ConnectorConfig::load(&path).unwrap();
        assert_eq!(loaded.indexing_base, IndexingBase::OneBased);
        assert_eq!(loaded.host.instance_id, 3);
        assert_eq!(loaded.host.extra_args, vec!["--no-splash".to_string()]);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = ConnectorConfig::load("/nonexistent/voxbridge.toml").unwrap_err();
        assert!(matches!(err, VoxBridgeError::Config(_)));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "indexing_base = \"OneBased\"\n").unwrap();

        let loaded = ConnectorConfig::load(&path).unwrap();
        assert_eq!(loaded.indexing_base, IndexingBase::OneBased);
        assert_eq!(loaded.host.executable, DEFAULT_HOST_EXECUTABLE);
    }
}
