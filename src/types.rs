//! Core data types for voxbridge
//!
//! This module contains the fundamental data structures used throughout
//! the connector for representing voxel volumes and their metadata.
//!
//! # Main Types
//!
//! - [`DataType`] - Enum of voxel element types supported by the host
//! - [`Volume`] - A 3-D voxel slab tagged with its element type
//! - [`IndexingBase`] - Whether caller indices are 0- or 1-origin
//! - [`DatasetSizes`] - Per-axis voxel counts plus channel/timepoint counts
//! - [`DatasetBounds`] - World-unit extents of the dataset
//! - [`SpotData`] - Columnar positions/timepoints/radii of a spots object
//!
//! # Datatype Tags
//!
//! The host stores voxels in one of three representations: 8-bit unsigned,
//! 16-bit unsigned, or 32-bit floating point. The tag is mirrored on both
//! sides of the remote boundary and is never coerced: a volume handed to a
//! write call must carry exactly the dataset's declared tag, because a
//! silent numeric conversion would corrupt voxel intensities.

use crate::error::{Result, VoxBridgeError};
use ndarray::{Array2, Array3, Axis};
use serde::{Deserialize, Serialize};

/// Voxel element type declared by a host dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DataType {
    /// 8-bit unsigned integer voxels
    #[default]
    UInt8,
    /// 16-bit unsigned integer voxels
    UInt16,
    /// 32-bit floating point voxels
    Float32,
}

impl DataType {
    /// Returns the size in bytes of one voxel of this type
    pub fn size_bytes(&self) -> usize {
        match self {
            DataType::UInt8 => 1,
            DataType::UInt16 => 2,
            DataType::Float32 => 4,
        }
    }

    /// Map a host-side type descriptor string to a tag.
    ///
    /// An unknown descriptor is a hard error: it indicates an unsupported
    /// or corrupted dataset, never something to coerce around.
    pub fn try_from_descriptor(descriptor: &str) -> Result<Self> {
        match descriptor {
            "uint8" => Ok(DataType::UInt8),
            "uint16" => Ok(DataType::UInt16),
            "float32" => Ok(DataType::Float32),
            other => Err(VoxBridgeError::UnsupportedDataType(other.to_string())),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::UInt8 => write!(f, "uint8"),
            DataType::UInt16 => write!(f, "uint16"),
            DataType::Float32 => write!(f, "float32"),
        }
    }
}

/// Indexing origin for channel/timepoint (and sub-volume origin) parameters
///
/// Fixed once per connector instance and applied uniformly to every
/// index-taking call. Numerical environments with 1-based conventions pass
/// `OneBased`; everything else uses `ZeroBased`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IndexingBase {
    /// Indices start at 0
    #[default]
    ZeroBased,
    /// Indices start at 1
    OneBased,
}

impl IndexingBase {
    /// The numeric offset subtracted from caller indices
    pub fn offset(&self) -> usize {
        match self {
            IndexingBase::ZeroBased => 0,
            IndexingBase::OneBased => 1,
        }
    }

    /// Convert a caller index to 0-based and bounds-check it against `size`.
    ///
    /// `what` names the index in the error ("channel", "timepoint", ...).
    /// The reported index is the caller's, in their own base.
    pub fn to_zero_based(&self, index: usize, what: &'static str, size: usize) -> Result<usize> {
        let zero_based = index
            .checked_sub(self.offset())
            .filter(|i| *i < size)
            .ok_or(VoxBridgeError::IndexOutOfBounds { what, index, size })?;
        Ok(zero_based)
    }
}

/// Per-axis voxel counts of a dataset, plus channel and timepoint counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSizes {
    /// Voxels along X
    pub x: usize,
    /// Voxels along Y
    pub y: usize,
    /// Voxels along Z
    pub z: usize,
    /// Number of channels
    pub c: usize,
    /// Number of timepoints
    pub t: usize,
}

impl DatasetSizes {
    /// The spatial dimensions as an (X, Y, Z) tuple
    pub fn spatial(&self) -> (usize, usize, usize) {
        (self.x, self.y, self.z)
    }

    /// Number of voxels in one (channel, timepoint) slab
    pub fn slab_len(&self) -> usize {
        self.x * self.y * self.z
    }
}

/// World-unit extents of a dataset
///
/// `min` and `max` are the dataset's bounding box corners in the host's
/// spatial units (typically micrometers).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetBounds {
    /// Minimum corner (x, y, z)
    pub min: [f32; 3],
    /// Maximum corner (x, y, z)
    pub max: [f32; 3],
}

/// A 3-D voxel slab tagged with its element type
///
/// The variant is the datatype tag; there is deliberately no generic
/// parameter, so every consumer that dispatches on the tag does so with an
/// exhaustive match that the compiler checks when a tag is added.
///
/// Axis order is (X, Y, Z) in the caller's convention. A volume obtained
/// from [`crate::Connector::read_volume_row_major`] is (Y, X, Z) instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Volume {
    /// 8-bit unsigned voxels
    U8(Array3<u8>),
    /// 16-bit unsigned voxels
    U16(Array3<u16>),
    /// 32-bit floating point voxels
    F32(Array3<f32>),
}

impl Volume {
    /// The datatype tag of this volume's elements
    pub fn data_type(&self) -> DataType {
        match self {
            Volume::U8(_) => DataType::UInt8,
            Volume::U16(_) => DataType::UInt16,
            Volume::F32(_) => DataType::Float32,
        }
    }

    /// Dimensions as an (X, Y, Z) tuple
    pub fn dim(&self) -> (usize, usize, usize) {
        match self {
            Volume::U8(a) => a.dim(),
            Volume::U16(a) => a.dim(),
            Volume::F32(a) => a.dim(),
        }
    }

    /// True if the volume holds no voxels
    pub fn is_empty(&self) -> bool {
        let (x, y, z) = self.dim();
        x == 0 || y == 0 || z == 0
    }

    /// Total number of voxels
    pub fn len(&self) -> usize {
        let (x, y, z) = self.dim();
        x * y * z
    }

    /// Swap the first two axes: (X, Y, Z) becomes (Y, X, Z).
    ///
    /// This is the fixed permutation between the host's column-major
    /// orientation and a row-major caller convention. Applying it twice
    /// returns the original volume.
    pub fn permute_xy(self) -> Volume {
        match self {
            Volume::U8(a) => Volume::U8(a.permuted_axes([1, 0, 2])),
            Volume::U16(a) => Volume::U16(a.permuted_axes([1, 0, 2])),
            Volume::F32(a) => Volume::F32(a.permuted_axes([1, 0, 2])),
        }
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (x, y, z) = self.dim();
        write!(f, "{}x{}x{} {} volume", x, y, z, self.data_type())
    }
}

// A 2-D array is treated as a single Z-slice.
impl From<Array2<u8>> for Volume {
    fn from(slice: Array2<u8>) -> Self {
        Volume::U8(slice.insert_axis(Axis(2)))
    }
}

impl From<Array2<u16>> for Volume {
    fn from(slice: Array2<u16>) -> Self {
        Volume::U16(slice.insert_axis(Axis(2)))
    }
}

impl From<Array2<f32>> for Volume {
    fn from(slice: Array2<f32>) -> Self {
        Volume::F32(slice.insert_axis(Axis(2)))
    }
}

impl From<Array3<u8>> for Volume {
    fn from(v: Array3<u8>) -> Self {
        Volume::U8(v)
    }
}

impl From<Array3<u16>> for Volume {
    fn from(v: Array3<u16>) -> Self {
        Volume::U16(v)
    }
}

impl From<Array3<f32>> for Volume {
    fn from(v: Array3<f32>) -> Self {
        Volume::F32(v)
    }
}

/// Columnar data of a spots object: one entry per spot
///
/// The three columns must have equal lengths; [`SpotData::validate`] is
/// called before any remote spot call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpotData {
    /// Spot centers in world units (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Timepoint index of each spot (0-based on the host side)
    pub timepoints: Vec<i32>,
    /// Spot radii in world units
    pub radii: Vec<f32>,
}

impl SpotData {
    /// Number of spots
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if there are no spots
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check that all three columns have the same length
    pub fn validate(&self) -> Result<()> {
        if self.timepoints.len() != self.positions.len()
            || self.radii.len() != self.positions.len()
        {
            return Err(VoxBridgeError::Scene(format!(
                "spot columns differ in length: {} positions, {} timepoints, {} radii",
                self.positions.len(),
                self.timepoints.len(),
                self.radii.len()
            )));
        }
        Ok(())
    }
}
