//! HostApplication trait for the remote-object boundary
//!
//! This module defines the common trait behind which the host
//! application's remote proxy lives, enabling both a real vendor-backed
//! connection and a mock host for testing.
//!
//! Everything the connector does is a short forwarding call through this
//! trait. All indices crossing the boundary are 0-based; converting from
//! the caller's configured [`crate::IndexingBase`] happens before a call
//! reaches an implementation. Slab buffers are flat with x varying
//! fastest, then y, then z, which is the host's own storage order.

use crate::error::Result;
use crate::types::{DataType, DatasetBounds, DatasetSizes, SpotData};

/// Opaque handle to a dataset owned by the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetHandle(pub u64);

/// Opaque handle to a scene-graph object owned by the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub u64);

/// Concrete kind of a scene-graph object
///
/// The host exposes scene children as generic items; this enumeration is
/// the result of asking the host which concrete interface an item
/// supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A point-cloud object (detected particles, vesicles, nuclei, ...)
    Spots,
    /// A segmented surface object
    Surfaces,
    /// The rendered volume of the dataset itself
    Volume,
    /// The bounding frame decoration
    Frame,
    /// A light source
    LightSource,
    /// The scene camera
    Camera,
    /// A grouping folder
    Group,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectKind::Spots => "Spots",
            ObjectKind::Surfaces => "Surfaces",
            ObjectKind::Volume => "Volume",
            ObjectKind::Frame => "Frame",
            ObjectKind::LightSource => "LightSource",
            ObjectKind::Camera => "Camera",
            ObjectKind::Group => "Group",
        };
        write!(f, "{}", name)
    }
}

/// Unified interface to a running host application instance
///
/// Implementations wrap the vendor's remote-proxy client; the mock
/// implementation backs the same surface with in-memory state. The
/// connector never talks to the host any other way.
///
/// # Example
///
/// ```ignore
/// fn dataset_type_of(host: &dyn HostApplication) -> Option<DataType> {
///     let dataset = host.active_dataset().ok()??;
///     host.dataset_type(dataset).ok()
/// }
/// ```
pub trait HostApplication: Send {
    /// Cheap liveness probe against the remote object.
    ///
    /// Called once per connector operation; the result is never cached.
    fn is_alive(&self) -> bool;

    /// The host's version string, e.g. `"HostVis x64 9.5.1"`
    fn version(&self) -> Result<String>;

    /// Ask the host application to shut down
    fn quit(&mut self) -> Result<()>;

    // ---- dataset accessors ----

    /// The currently active dataset, if one is loaded
    fn active_dataset(&self) -> Result<Option<DatasetHandle>>;

    /// Declared voxel datatype tag of a dataset
    fn dataset_type(&self, dataset: DatasetHandle) -> Result<DataType>;

    /// Per-axis voxel counts plus channel/timepoint counts
    fn dataset_sizes(&self, dataset: DatasetHandle) -> Result<DatasetSizes>;

    /// World-unit extents of a dataset
    fn dataset_bounds(&self, dataset: DatasetHandle) -> Result<DatasetBounds>;

    // ---- typed flat slab accessors, one per datatype tag ----

    /// Read one (channel, timepoint) slab of a uint8 dataset
    fn read_slab_u8(
        &self,
        dataset: DatasetHandle,
        channel: usize,
        timepoint: usize,
    ) -> Result<Vec<u8>>;

    /// Read one (channel, timepoint) slab of a uint16 dataset
    fn read_slab_u16(
        &self,
        dataset: DatasetHandle,
        channel: usize,
        timepoint: usize,
    ) -> Result<Vec<u16>>;

    /// Read one (channel, timepoint) slab of a float32 dataset
    fn read_slab_f32(
        &self,
        dataset: DatasetHandle,
        channel: usize,
        timepoint: usize,
    ) -> Result<Vec<f32>>;

    /// Read a box of a uint8 dataset; `origin`/`size` are 0-based voxel coordinates
    fn read_subslab_u8(
        &self,
        dataset: DatasetHandle,
        origin: [usize; 3],
        size: [usize; 3],
        channel: usize,
        timepoint: usize,
    ) -> Result<Vec<u8>>;

    /// Read a box of a uint16 dataset
    fn read_subslab_u16(
        &self,
        dataset: DatasetHandle,
        origin: [usize; 3],
        size: [usize; 3],
        channel: usize,
        timepoint: usize,
    ) -> Result<Vec<u16>>;

    /// Read a box of a float32 dataset
    fn read_subslab_f32(
        &self,
        dataset: DatasetHandle,
        origin: [usize; 3],
        size: [usize; 3],
        channel: usize,
        timepoint: usize,
    ) -> Result<Vec<f32>>;

    /// Write one (channel, timepoint) slab of a uint8 dataset
    fn write_slab_u8(
        &mut self,
        dataset: DatasetHandle,
        channel: usize,
        timepoint: usize,
        data: &[u8],
    ) -> Result<()>;

    /// Write one (channel, timepoint) slab of a uint16 dataset
    fn write_slab_u16(
        &mut self,
        dataset: DatasetHandle,
        channel: usize,
        timepoint: usize,
        data: &[u16],
    ) -> Result<()>;

    /// Write one (channel, timepoint) slab of a float32 dataset
    fn write_slab_f32(
        &mut self,
        dataset: DatasetHandle,
        channel: usize,
        timepoint: usize,
        data: &[f32],
    ) -> Result<()>;

    // ---- scene accessors ----

    /// Root of the scene, if a scene exists
    fn scene_root(&self) -> Result<Option<ObjectHandle>>;

    /// The object currently selected in the host UI
    fn selected_object(&self) -> Result<Option<ObjectHandle>>;

    /// Concrete kind of a scene object
    fn object_kind(&self, object: ObjectHandle) -> Result<ObjectKind>;

    /// Display name of a scene object
    fn object_name(&self, object: ObjectHandle) -> Result<String>;

    /// Direct children of a scene object, in scene order
    fn object_children(&self, object: ObjectHandle) -> Result<Vec<ObjectHandle>>;

    // ---- spot accessors ----

    /// Read the spot columns of a spots object
    fn spots(&self, object: ObjectHandle) -> Result<SpotData>;

    /// Replace the spot columns of a spots object
    fn set_spots(&mut self, object: ObjectHandle, spots: &SpotData) -> Result<()>;

    /// Create a new spots object in the scene and return its handle.
    ///
    /// `color_rgba` is the packed scalar produced by
    /// [`crate::color::rgba_to_scalar`].
    fn create_spots(&mut self, name: &str, spots: &SpotData, color_rgba: u32)
        -> Result<ObjectHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_kind_display() {
        assert_eq!(ObjectKind::Spots.to_string(), "Spots");
        assert_eq!(ObjectKind::LightSource.to_string(), "LightSource");
    }

    #[test]
    fn test_handles_are_copy_and_hashable() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(ObjectHandle(1));
        set.insert(ObjectHandle(1));
        set.insert(ObjectHandle(2));
        assert_eq!(set.len(), 2);
    }
}
