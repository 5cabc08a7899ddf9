//! Host application boundary
//!
//! Everything the connector knows about the host application lives behind
//! the [`HostApplication`] trait: a liveness probe, dataset accessors with
//! typed flat slab IO, scene-graph traversal, and spot objects. The
//! concrete implementation wraps the vendor's remote-proxy client; tests
//! use [`mock::MockHost`].
//!
//! # Components
//!
//! - [`HostApplication`] - The remote-object boundary trait
//! - [`InstanceRegistry`] / [`HostLauncher`] - Locate, start and attach to
//!   host instances by numeric id
//! - [`mock`] - In-memory host for tests (`mock-host` feature)

pub mod api;
pub mod launcher;
#[cfg(any(test, feature = "mock-host"))]
pub mod mock;

pub use api::{DatasetHandle, HostApplication, ObjectHandle, ObjectKind};
pub use launcher::{HostLauncher, InstanceRegistry};

#[cfg(any(test, feature = "mock-host"))]
pub use mock::{MockCounters, MockHost, MockRegistry};
