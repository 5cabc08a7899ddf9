//! Mock host implementation for testing
//!
//! This module provides a mock host application that can be used for
//! testing the connector without a running visualization host. It backs
//! the [`HostApplication`] trait with an in-memory dataset and scene
//! table.
//!
//! # Features
//!
//! - **In-memory dataset**: per-(channel, timepoint) typed slabs,
//!   zero-initialized on first access
//! - **Scene table**: build a scene with groups, spots and other
//!   object kinds via builder methods
//! - **Call counters**: shared [`MockCounters`] let tests assert that a
//!   rejected operation issued no slab call at all
//! - **Liveness switch**: `set_alive(false)` simulates a dead connection
//!
//! # Example
//!
//! ```ignore
//! use voxbridge::host::mock::MockHost;
//! use voxbridge::{DataType, DatasetBounds, DatasetSizes};
//!
//! let host = MockHost::new().with_dataset(
//!     DataType::UInt16,
//!     DatasetSizes { x: 64, y: 64, z: 10, c: 2, t: 3 },
//!     DatasetBounds { min: [0.0; 3], max: [64.0, 64.0, 30.0] },
//! );
//! let counters = host.counters();
//! let connector = Connector::new(Box::new(host), IndexingBase::ZeroBased);
//! ```
//!
//! # Enabling
//!
//! The mock host is compiled for this crate's own tests and, for
//! downstream consumers, behind the `mock-host` feature:
//!
//! ```bash
//! cargo test --features mock-host
//! ```

use crate::error::{Result, VoxBridgeError};
use crate::types::{DataType, DatasetBounds, DatasetSizes, SpotData};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::api::{DatasetHandle, HostApplication, ObjectHandle, ObjectKind};
use super::launcher::InstanceRegistry;

/// Handle value the mock uses for its single dataset
const MOCK_DATASET: DatasetHandle = DatasetHandle(1);

/// Shared counters for remote calls issued against a [`MockHost`]
///
/// Clone this before boxing the host; the clones observe the same
/// counters.
#[derive(Debug, Clone, Default)]
pub struct MockCounters {
    slab_reads: Arc<AtomicU64>,
    slab_writes: Arc<AtomicU64>,
}

impl MockCounters {
    /// Number of slab/sub-slab read calls issued so far
    pub fn slab_reads(&self) -> u64 {
        self.slab_reads.load(Ordering::SeqCst)
    }

    /// Number of slab write calls issued so far
    pub fn slab_writes(&self) -> u64 {
        self.slab_writes.load(Ordering::SeqCst)
    }

    fn record_read(&self) {
        self.slab_reads.fetch_add(1, Ordering::SeqCst);
    }

    fn record_write(&self) {
        self.slab_writes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Typed storage for one (channel, timepoint) slab
#[derive(Debug, Clone)]
enum SlabBuffer {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>),
}

impl SlabBuffer {
    fn zeros(tag: DataType, len: usize) -> Self {
        match tag {
            DataType::UInt8 => SlabBuffer::U8(vec![0; len]),
            DataType::UInt16 => SlabBuffer::U16(vec![0; len]),
            DataType::Float32 => SlabBuffer::F32(vec![0.0; len]),
        }
    }
}

/// The mock's in-memory dataset
#[derive(Debug)]
struct MockDataset {
    tag: DataType,
    sizes: DatasetSizes,
    bounds: DatasetBounds,
    slabs: HashMap<(usize, usize), SlabBuffer>,
}

impl MockDataset {
    fn slab_mut(&mut self, channel: usize, timepoint: usize) -> &mut SlabBuffer {
        let len = self.sizes.slab_len();
        let tag = self.tag;
        self.slabs
            .entry((channel, timepoint))
            .or_insert_with(|| SlabBuffer::zeros(tag, len))
    }

    fn check_indices(&self, channel: usize, timepoint: usize) -> Result<()> {
        if channel >= self.sizes.c || timepoint >= self.sizes.t {
            return Err(VoxBridgeError::Host(format!(
                "mock host: slab ({}, {}) outside dataset ({} channels, {} timepoints)",
                channel, timepoint, self.sizes.c, self.sizes.t
            )));
        }
        Ok(())
    }

    fn check_box(&self, origin: [usize; 3], size: [usize; 3]) -> Result<()> {
        let (sx, sy, sz) = self.sizes.spatial();
        let inside = origin[0] + size[0] <= sx
            && origin[1] + size[1] <= sy
            && origin[2] + size[2] <= sz;
        if !inside {
            return Err(VoxBridgeError::Host(format!(
                "mock host: box at {:?} size {:?} outside dataset ({}, {}, {})",
                origin, size, sx, sy, sz
            )));
        }
        Ok(())
    }
}

/// Copy a box out of an x-fastest flat buffer
fn extract_box<T: Copy>(
    buf: &[T],
    sizes: &DatasetSizes,
    origin: [usize; 3],
    size: [usize; 3],
) -> Vec<T> {
    let mut out = Vec::with_capacity(size[0] * size[1] * size[2]);
    for z in origin[2]..origin[2] + size[2] {
        for y in origin[1]..origin[1] + size[1] {
            let row = sizes.x * (y + sizes.y * z) + origin[0];
            out.extend_from_slice(&buf[row..row + size[0]]);
        }
    }
    out
}

/// One entry in the mock's scene table
#[derive(Debug)]
struct MockObject {
    kind: ObjectKind,
    name: String,
    children: Vec<ObjectHandle>,
    spots: Option<SpotData>,
    color_rgba: Option<u32>,
}

/// Mock host application for testing without a real host
pub struct MockHost {
    /// Whether the mock connection is "alive"
    alive: bool,
    /// Simulated host version string
    version: String,
    /// The single mock dataset, if loaded
    dataset: Option<MockDataset>,
    /// Scene table; an object's handle is its index + 1
    objects: Vec<MockObject>,
    /// Root of the scene, if one was created
    root: Option<ObjectHandle>,
    /// Current selection
    selection: Option<ObjectHandle>,
    /// Remote-call counters shared with tests
    counters: MockCounters,
}

impl MockHost {
    /// Create a new mock host with no dataset and no scene
    pub fn new() -> Self {
        Self {
            alive: true,
            version: "MockVis x64 9.5.1".to_string(),
            dataset: None,
            objects: Vec::new(),
            root: None,
            selection: None,
            counters: MockCounters::default(),
        }
    }

    /// Set the simulated version string
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Load a zero-filled dataset of the given tag, sizes and bounds
    pub fn with_dataset(mut self, tag: DataType, sizes: DatasetSizes, bounds: DatasetBounds) -> Self {
        self.dataset = Some(MockDataset {
            tag,
            sizes,
            bounds,
            slabs: HashMap::new(),
        });
        self
    }

    /// Create the scene root (a group) and return the builder
    pub fn with_scene(mut self) -> Self {
        let handle = self.push_object(ObjectKind::Group, "Scene", None);
        self.root = Some(handle);
        self
    }

    /// Get a clone of the shared call counters
    pub fn counters(&self) -> MockCounters {
        self.counters.clone()
    }

    /// Flip the simulated connection liveness
    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
        tracing::info!("Mock host liveness set to {}", alive);
    }

    /// Add an object under `parent` (or under the root when `None`)
    pub fn add_object(
        &mut self,
        kind: ObjectKind,
        name: impl Into<String>,
        parent: Option<ObjectHandle>,
    ) -> ObjectHandle {
        let parent = parent.or(self.root);
        self.push_object(kind, name, parent)
    }

    /// Add a spots object with the given data under the root
    pub fn add_spots(&mut self, name: impl Into<String>, spots: SpotData) -> ObjectHandle {
        let handle = self.add_object(ObjectKind::Spots, name, None);
        self.object_mut(handle).spots = Some(spots);
        handle
    }

    /// Mark an object as the current selection
    pub fn select(&mut self, object: ObjectHandle) {
        self.selection = Some(object);
    }

    fn push_object(
        &mut self,
        kind: ObjectKind,
        name: impl Into<String>,
        parent: Option<ObjectHandle>,
    ) -> ObjectHandle {
        self.objects.push(MockObject {
            kind,
            name: name.into(),
            children: Vec::new(),
            spots: None,
            color_rgba: None,
        });
        let handle = ObjectHandle(self.objects.len() as u64);
        if let Some(parent) = parent {
            self.object_mut(parent).children.push(handle);
        }
        handle
    }

    fn object(&self, handle: ObjectHandle) -> Result<&MockObject> {
        (handle.0 as usize)
            .checked_sub(1)
            .and_then(|index| self.objects.get(index))
            .ok_or_else(|| VoxBridgeError::Host(format!("mock host: unknown object {:?}", handle)))
    }

    fn object_mut(&mut self, handle: ObjectHandle) -> &mut MockObject {
        &mut self.objects[handle.0 as usize - 1]
    }

    fn dataset_ref(&self, handle: DatasetHandle) -> Result<&MockDataset> {
        if handle != MOCK_DATASET {
            return Err(VoxBridgeError::Host(format!(
                "mock host: unknown dataset {:?}",
                handle
            )));
        }
        self.dataset
            .as_ref()
            .ok_or_else(|| VoxBridgeError::Host("mock host: no dataset loaded".to_string()))
    }

    fn dataset_mut(&mut self, handle: DatasetHandle) -> Result<&mut MockDataset> {
        if handle != MOCK_DATASET {
            return Err(VoxBridgeError::Host(format!(
                "mock host: unknown dataset {:?}",
                handle
            )));
        }
        self.dataset
            .as_mut()
            .ok_or_else(|| VoxBridgeError::Host("mock host: no dataset loaded".to_string()))
    }

    fn check_tag(dataset: &MockDataset, expected: DataType) -> Result<()> {
        if dataset.tag != expected {
            return Err(VoxBridgeError::Host(format!(
                "mock host: typed accessor for {} used on a {} dataset",
                expected, dataset.tag
            )));
        }
        Ok(())
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! mock_slab_accessors {
    ($read:ident, $subread:ident, $write:ident, $elem:ty, $variant:ident, $tag:expr) => {
        fn $read(
            &self,
            dataset: DatasetHandle,
            channel: usize,
            timepoint: usize,
        ) -> Result<Vec<$elem>> {
            let ds = self.dataset_ref(dataset)?;
            Self::check_tag(ds, $tag)?;
            ds.check_indices(channel, timepoint)?;
            self.counters.record_read();
            Ok(match ds.slabs.get(&(channel, timepoint)) {
                Some(SlabBuffer::$variant(buf)) => buf.clone(),
                Some(_) => unreachable!("slab type checked against dataset tag"),
                None => vec![Default::default(); ds.sizes.slab_len()],
            })
        }

        fn $subread(
            &self,
            dataset: DatasetHandle,
            origin: [usize; 3],
            size: [usize; 3],
            channel: usize,
            timepoint: usize,
        ) -> Result<Vec<$elem>> {
            let ds = self.dataset_ref(dataset)?;
            Self::check_tag(ds, $tag)?;
            ds.check_indices(channel, timepoint)?;
            ds.check_box(origin, size)?;
            self.counters.record_read();
            Ok(match ds.slabs.get(&(channel, timepoint)) {
                Some(SlabBuffer::$variant(buf)) => extract_box(buf, &ds.sizes, origin, size),
                Some(_) => unreachable!("slab type checked against dataset tag"),
                None => vec![Default::default(); size[0] * size[1] * size[2]],
            })
        }

        fn $write(
            &mut self,
            dataset: DatasetHandle,
            channel: usize,
            timepoint: usize,
            data: &[$elem],
        ) -> Result<()> {
            let counters = self.counters.clone();
            let ds = self.dataset_mut(dataset)?;
            Self::check_tag(ds, $tag)?;
            ds.check_indices(channel, timepoint)?;
            if data.len() != ds.sizes.slab_len() {
                return Err(VoxBridgeError::Host(format!(
                    "mock host: slab write of {} voxels into a {}-voxel dataset",
                    data.len(),
                    ds.sizes.slab_len()
                )));
            }
            counters.record_write();
            *ds.slab_mut(channel, timepoint) = SlabBuffer::$variant(data.to_vec());
            Ok(())
        }
    };
}

impl HostApplication for MockHost {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn version(&self) -> Result<String> {
        Ok(self.version.clone())
    }

    fn quit(&mut self) -> Result<()> {
        self.alive = false;
        tracing::info!("Mock host quit");
        Ok(())
    }

    fn active_dataset(&self) -> Result<Option<DatasetHandle>> {
        Ok(self.dataset.as_ref().map(|_| MOCK_DATASET))
    }

    fn dataset_type(&self, dataset: DatasetHandle) -> Result<DataType> {
        Ok(self.dataset_ref(dataset)?.tag)
    }

    fn dataset_sizes(&self, dataset: DatasetHandle) -> Result<DatasetSizes> {
        Ok(self.dataset_ref(dataset)?.sizes)
    }

    fn dataset_bounds(&self, dataset: DatasetHandle) -> Result<DatasetBounds> {
        Ok(self.dataset_ref(dataset)?.bounds)
    }

    mock_slab_accessors!(
        read_slab_u8,
        read_subslab_u8,
        write_slab_u8,
        u8,
        U8,
        DataType::UInt8
    );
    mock_slab_accessors!(
        read_slab_u16,
        read_subslab_u16,
        write_slab_u16,
        u16,
        U16,
        DataType::UInt16
    );
    mock_slab_accessors!(
        read_slab_f32,
        read_subslab_f32,
        write_slab_f32,
        f32,
        F32,
        DataType::Float32
    );

    fn scene_root(&self) -> Result<Option<ObjectHandle>> {
        Ok(self.root)
    }

    fn selected_object(&self) -> Result<Option<ObjectHandle>> {
        Ok(self.selection)
    }

    fn object_kind(&self, object: ObjectHandle) -> Result<ObjectKind> {
        Ok(self.object(object)?.kind)
    }

    fn object_name(&self, object: ObjectHandle) -> Result<String> {
        Ok(self.object(object)?.name.clone())
    }

    fn object_children(&self, object: ObjectHandle) -> Result<Vec<ObjectHandle>> {
        Ok(self.object(object)?.children.clone())
    }

    fn spots(&self, object: ObjectHandle) -> Result<SpotData> {
        let obj = self.object(object)?;
        obj.spots
            .clone()
            .ok_or_else(|| VoxBridgeError::Host(format!("mock host: {} has no spot data", obj.name)))
    }

    fn set_spots(&mut self, object: ObjectHandle, spots: &SpotData) -> Result<()> {
        self.object(object)?;
        self.object_mut(object).spots = Some(spots.clone());
        Ok(())
    }

    fn create_spots(
        &mut self,
        name: &str,
        spots: &SpotData,
        color_rgba: u32,
    ) -> Result<ObjectHandle> {
        let handle = self.add_spots(name.to_string(), spots.clone());
        self.object_mut(handle).color_rgba = Some(color_rgba);
        Ok(handle)
    }
}

/// Mock instance registry for launcher tests
///
/// Instances can be made visible immediately or only after a number of
/// polls, to exercise the launcher's registry polling loop.
pub struct MockRegistry {
    /// Instance ids and the number of `instances()` calls after which each
    /// becomes visible
    entries: Vec<(u32, u32)>,
    polls: std::cell::Cell<u32>,
}

impl MockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            polls: std::cell::Cell::new(0),
        }
    }

    /// Register an instance that is visible immediately
    pub fn with_instance(mut self, id: u32) -> Self {
        self.entries.push((id, 0));
        self
    }

    /// Register an instance that appears after `polls` enumeration calls
    pub fn with_delayed_instance(mut self, id: u32, polls: u32) -> Self {
        self.entries.push((id, polls));
        self
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceRegistry for MockRegistry {
    fn instances(&self) -> Result<Vec<u32>> {
        let polls = self.polls.get();
        self.polls.set(polls + 1);
        Ok(self
            .entries
            .iter()
            .filter(|(_, after)| *after <= polls)
            .map(|(id, _)| *id)
            .collect())
    }

    fn attach(&self, id: u32) -> Result<Box<dyn HostApplication>> {
        if self.entries.iter().any(|(known, _)| *known == id) {
            Ok(Box::new(MockHost::new()))
        } else {
            Err(VoxBridgeError::Registry(format!(
                "no instance with id {}",
                id
            )))
        }
    }
}
