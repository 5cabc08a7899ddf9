//! Integration tests for connector lifecycle
//!
//! These tests validate the complete connection workflow:
//! - Attaching through the instance registry
//! - Liveness probing and version introspection
//! - The dead-connection contract across the whole surface

mod common;

#[cfg(feature = "mock-host")]
use voxbridge::config::HostConfig;
#[cfg(feature = "mock-host")]
use voxbridge::host::{HostLauncher, MockHost, MockRegistry};
#[cfg(feature = "mock-host")]
use voxbridge::{Connector, IndexingBase};

#[test]
#[cfg(feature = "mock-host")]
fn test_launch_and_attach_through_registry() {
    common::init_tracing();

    let config = HostConfig {
        instance_id: 3,
        startup_timeout_ms: 500,
        poll_interval_ms: 1,
        ..HostConfig::default()
    };
    let registry = MockRegistry::new().with_delayed_instance(3, 2);

    let launcher = HostLauncher::new(config);
    let host = launcher.await_instance(&registry).expect("instance should register");
    let connector = Connector::new(host, IndexingBase::ZeroBased);
    assert!(connector.is_alive());
}

#[test]
#[cfg(feature = "mock-host")]
fn test_attach_running_fails_without_instance() {
    common::init_tracing();

    let launcher = HostLauncher::new(HostConfig {
        instance_id: 9,
        startup_timeout_ms: 10,
        poll_interval_ms: 1,
        ..HostConfig::default()
    });
    assert!(launcher.attach_running(&MockRegistry::new()).is_err());
}

#[test]
#[cfg(feature = "mock-host")]
fn test_version_introspection() {
    let host = MockHost::new().with_version("MockVis x64 10.1.0");
    let connector = Connector::new(Box::new(host), IndexingBase::ZeroBased);
    assert_eq!(connector.version_as_integer().unwrap(), Some(10_010_000));
}

#[test]
#[cfg(feature = "mock-host")]
fn test_close_shuts_host_down() {
    let host = MockHost::new();
    let connector = Connector::new(Box::new(host), IndexingBase::ZeroBased);
    assert!(connector.is_alive());
    connector.close().expect("close should succeed");
}

#[test]
#[cfg(feature = "mock-host")]
fn test_liveness_is_probed_per_call() {
    let (tag, sizes, bounds) = common::example_dataset();
    let mut host = MockHost::new().with_dataset(tag, sizes, bounds);
    host.set_alive(false);
    let connector = Connector::new(Box::new(host), IndexingBase::ZeroBased);

    // every accessor consults the probe on its own call
    assert!(!connector.is_alive());
    assert!(connector.read_volume(0, 0, None).unwrap().is_none());
    assert!(connector.dataset_sizes(None).unwrap().is_none());
    assert!(connector.scene_children(true, None).unwrap().is_empty());
}
