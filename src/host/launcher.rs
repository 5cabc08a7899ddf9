//! Host discovery and launch
//!
//! This module starts the host application and attaches to it through its
//! instance registry. The registry is the vendor's process-local name
//! service: every running host instance registers under a numeric id, and
//! attaching to an id yields the remote application proxy.
//!
//! Launching is the only place in the crate with a timeout: a freshly
//! spawned host takes seconds to register, so the launcher polls the
//! registry until the configured deadline passes. Established connections
//! have no timeout handling at all; a hung remote call hangs the caller.
//!
//! # Executable resolution
//!
//! The host executable is searched in order:
//!
//! 1. `HostConfig::install_dir` from the configuration
//! 2. the directory named by the `VOXBRIDGE_HOST_PATH` environment variable
//! 3. platform default install locations

use crate::config::{HostConfig, HOST_PATH_ENV};
use crate::error::{Result, VoxBridgeError};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::api::HostApplication;

/// Registry of running host instances
///
/// Implementations wrap the vendor's server registry; tests use the mock
/// registry. Ids are assigned by whoever launches an instance.
pub trait InstanceRegistry {
    /// Enumerate the ids of currently registered host instances
    fn instances(&self) -> Result<Vec<u32>>;

    /// Attach to the instance with the given id
    fn attach(&self, id: u32) -> Result<Box<dyn HostApplication>>;
}

/// Locates, starts and attaches to the host application
pub struct HostLauncher {
    config: HostConfig,
}

impl HostLauncher {
    /// Create a launcher with the given host settings
    pub fn new(config: HostConfig) -> Self {
        Self { config }
    }

    /// Resolve the host executable path.
    ///
    /// Fails with a `Launch` error naming every location tried when the
    /// executable is found nowhere.
    pub fn locate_executable(&self) -> Result<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(dir) = &self.config.install_dir {
            candidates.push(dir.join(&self.config.executable));
        }
        if let Ok(dir) = std::env::var(HOST_PATH_ENV) {
            candidates.push(PathBuf::from(dir).join(&self.config.executable));
        }
        for dir in default_install_dirs() {
            candidates.push(dir.join(&self.config.executable));
        }

        for candidate in &candidates {
            if candidate.is_file() {
                tracing::debug!("Host executable found at {}", candidate.display());
                return Ok(candidate.clone());
            }
        }

        Err(VoxBridgeError::Launch(format!(
            "host executable '{}' not found; tried: {}",
            self.config.executable,
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }

    /// Attach to an already-running instance with the configured id
    pub fn attach_running(&self, registry: &dyn InstanceRegistry) -> Result<Box<dyn HostApplication>> {
        let id = self.config.instance_id;
        if registry.instances()?.contains(&id) {
            tracing::info!("Attaching to running host instance {}", id);
            registry.attach(id)
        } else {
            Err(VoxBridgeError::Registry(format!(
                "no running host instance with id {}",
                id
            )))
        }
    }

    /// Start the host application and attach to it.
    ///
    /// If an instance with the configured id is already registered, it is
    /// reused and no process is spawned. Otherwise the executable is
    /// resolved, spawned with an instance-id argument, and the registry is
    /// polled until the id appears or the startup deadline passes. The
    /// spawned process is left running; it belongs to the user, not to
    /// this connector.
    pub fn launch(&self, registry: &dyn InstanceRegistry) -> Result<Box<dyn HostApplication>> {
        let id = self.config.instance_id;

        if registry.instances()?.contains(&id) {
            tracing::info!("Host instance {} already running, attaching", id);
            return registry.attach(id);
        }

        let executable = self.locate_executable()?;
        tracing::info!(
            "Launching host: {} --instance-id={} (timeout {}ms)",
            executable.display(),
            id,
            self.config.startup_timeout_ms
        );

        let mut command = Command::new(&executable);
        command
            .arg(format!("--instance-id={}", id))
            .args(&self.config.extra_args)
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        command.spawn().map_err(|e| {
            VoxBridgeError::Launch(format!(
                "failed to start {}: {}",
                executable.display(),
                e
            ))
        })?;

        self.await_instance(registry)
    }

    /// Poll the registry until the configured instance id appears, then
    /// attach. Fails with a `Launch` error when the deadline passes.
    pub fn await_instance(&self, registry: &dyn InstanceRegistry) -> Result<Box<dyn HostApplication>> {
        let id = self.config.instance_id;
        let deadline = Instant::now() + Duration::from_millis(self.config.startup_timeout_ms);
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            if registry.instances()?.contains(&id) {
                tracing::info!("Host instance {} registered", id);
                return registry.attach(id);
            }
            if Instant::now() >= deadline {
                tracing::error!("Host instance {} did not register in time", id);
                return Err(VoxBridgeError::Launch(format!(
                    "host instance {} did not register within {}ms",
                    id, self.config.startup_timeout_ms
                )));
            }
            std::thread::sleep(poll_interval);
        }
    }
}

/// Platform default install locations for the host application
fn default_install_dirs() -> Vec<PathBuf> {
    if cfg!(target_os = "windows") {
        vec![PathBuf::from("C:\\Program Files\\VoxVis")]
    } else if cfg!(target_os = "macos") {
        vec![PathBuf::from("/Applications/VoxVis.app/Contents/MacOS")]
    } else {
        vec![PathBuf::from("/opt/voxvis/bin"), PathBuf::from("/usr/local/voxvis/bin")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::MockRegistry;

    fn fast_config() -> HostConfig {
        HostConfig {
            instance_id: 7,
            startup_timeout_ms: 500,
            poll_interval_ms: 1,
            ..HostConfig::default()
        }
    }

    #[test]
    fn test_locate_executable_from_install_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("voxvis");
        std::fs::write(&exe, b"").unwrap();

        let launcher = HostLauncher::new(HostConfig {
            install_dir: Some(dir.path().to_path_buf()),
            ..HostConfig::default()
        });
        assert_eq!(launcher.locate_executable().unwrap(), exe);
    }

    #[test]
    fn test_locate_executable_missing_lists_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = HostLauncher::new(HostConfig {
            install_dir: Some(dir.path().to_path_buf()),
            executable: "does-not-exist".to_string(),
            ..HostConfig::default()
        });
        let err = launcher.locate_executable().unwrap_err();
        assert!(err.to_string().contains("does-not-exist"));
        assert!(matches!(err, VoxBridgeError::Launch(_)));
    }

    #[test]
    fn test_attach_running_requires_registered_instance() {
        let launcher = HostLauncher::new(fast_config());
        assert!(launcher
            .attach_running(&MockRegistry::new().with_instance(7))
            .is_ok());
        assert!(launcher.attach_running(&MockRegistry::new()).is_err());
    }

    #[test]
    fn test_await_instance_polls_until_visible() {
        let launcher = HostLauncher::new(fast_config());
        let registry = MockRegistry::new().with_delayed_instance(7, 3);
        let host = launcher.await_instance(&registry).unwrap();
        assert!(host.is_alive());
    }

    #[test]
    fn test_await_instance_deadline() {
        let launcher = HostLauncher::new(HostConfig {
            startup_timeout_ms: 5,
            ..fast_config()
        });
        let err = launcher.await_instance(&MockRegistry::new()).unwrap_err();
        assert!(matches!(err, VoxBridgeError::Launch(_)));
    }

    #[test]
    fn test_launch_reuses_running_instance() {
        // An already-registered id attaches without spawning anything.
        let launcher = HostLauncher::new(fast_config());
        let registry = MockRegistry::new().with_instance(7);
        assert!(launcher.launch(&registry).is_ok());
    }
}
