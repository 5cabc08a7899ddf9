//! # voxbridge: remote-control connector for a microscopy visualization host
//!
//! A thin adapter that drives an external 3D microscopy visualization
//! application ("the host") through its remote-object interface: locate
//! and launch the host, attach through its instance registry, and move
//! voxel volumes, geometry and scene objects across the boundary with the
//! caller's array conventions on this side.
//!
//! ## Architecture
//!
//! - **Host boundary**: the [`host::HostApplication`] trait wraps the
//!   vendor's remote proxy; [`host::HostLauncher`] starts an instance and
//!   attaches by numeric id
//! - **Connector**: [`Connector`] owns one boxed connection plus the
//!   indexing base ([`IndexingBase`]) applied to every index parameter
//! - **Marshalling**: volume reads/writes convert between the host's flat
//!   x-fastest slabs and ndarray `(X, Y, Z)` volumes, with hard
//!   type/shape/bounds validation and a benign-empty dead-connection
//!   contract
//!
//! Everything is synchronous and single-threaded: each operation issues
//! at most one remote data call and blocks until it returns.
//!
//! ## Configuration
//!
//! [`config::ConnectorConfig`] is a TOML file (see [`config::default_path`])
//! holding the indexing base and the host launch settings; the
//! `VOXBRIDGE_HOST_PATH` environment variable overrides the install
//! location.
//!
//! ## Example
//!
//! ```ignore
//! use voxbridge::{config::ConnectorConfig, host::HostLauncher, Connector};
//!
//! let config = ConnectorConfig::load("voxbridge.toml")?;
//! let launcher = HostLauncher::new(config.host.clone());
//! let host = launcher.launch(&registry)?;
//! let mut connector = Connector::new(host, config.indexing_base);
//!
//! if let Some(volume) = connector.read_volume(0, 0, None)? {
//!     println!("got {}", volume);
//! }
//! connector.close()?;
//! ```

pub mod color;
pub mod config;
pub mod connector;
pub mod error;
pub mod geometry;
pub mod host;
pub mod scene;
pub mod types;
pub mod volume;

// Re-export commonly used types
pub use config::ConnectorConfig;
pub use connector::Connector;
pub use error::{Result, VoxBridgeError};
pub use host::{DatasetHandle, HostApplication, HostLauncher, ObjectHandle, ObjectKind};
pub use types::{DataType, DatasetBounds, DatasetSizes, IndexingBase, SpotData, Volume};
