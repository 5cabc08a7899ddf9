//! Volume marshalling between caller arrays and host slabs
//!
//! This module is the data-transfer heart of the connector: it converts
//! one (channel, timepoint) voxel slab between the caller's
//! multi-dimensional [`Volume`] representation and the host's flat typed
//! buffer representation, in both directions.
//!
//! # Layout
//!
//! The host stores a slab as a flat sequence with x varying fastest, then
//! y, then z. Reads reinterpret that sequence column-major into an
//! `(X, Y, Z)` array; writes linearize back to the same order. The
//! row-major variants additionally swap the first two axes for callers
//! whose native array convention is (Y, X, Z).
//!
//! # Validation
//!
//! The host API itself enforces none of this, so the marshaller does:
//! indices are converted from the configured base and bounds-checked,
//! the volume's element type must equal the dataset's declared tag (no
//! numeric coercion, ever), and a written volume's spatial shape must
//! equal the dataset extents exactly. All violations are hard errors
//! raised before any slab call is issued. A missing connection or an
//! empty dataset is not a violation: reads come back empty and writes
//! no-op, per the connector-wide dead-connection policy.

use crate::connector::Connector;
use crate::error::{Result, VoxBridgeError};
use crate::host::DatasetHandle;
use crate::types::{DataType, DatasetSizes, Volume};
use ndarray::{Array3, ShapeBuilder};

impl Connector {
    /// Resolve the dataset a slab operation targets.
    ///
    /// Returns `None` on the benign-empty path: dead connection, no
    /// dataset loaded, or the empty-dataset sentinel (zero-sized first
    /// spatial axis).
    pub(crate) fn dataset_context(
        &self,
        dataset: Option<DatasetHandle>,
    ) -> Result<Option<(DatasetHandle, DatasetSizes)>> {
        if !self.is_alive() {
            tracing::debug!("no live host connection");
            return Ok(None);
        }
        let handle = match dataset {
            Some(handle) => handle,
            None => match self.host.active_dataset()? {
                Some(handle) => handle,
                None => {
                    tracing::debug!("no dataset loaded");
                    return Ok(None);
                }
            },
        };
        let sizes = self.host.dataset_sizes(handle)?;
        if sizes.x == 0 {
            tracing::debug!("dataset is empty");
            return Ok(None);
        }
        Ok(Some((handle, sizes)))
    }

    /// Read one (channel, timepoint) slab as an (X, Y, Z) volume.
    ///
    /// `dataset` defaults to the host's currently active dataset. Indices
    /// are taken in the connector's configured base. Returns `Ok(None)`
    /// when the connection is dead, no dataset is loaded, or the dataset
    /// is empty; raises on out-of-bounds indices.
    pub fn read_volume(
        &self,
        channel: usize,
        timepoint: usize,
        dataset: Option<DatasetHandle>,
    ) -> Result<Option<Volume>> {
        let Some((dataset, sizes)) = self.dataset_context(dataset)? else {
            return Ok(None);
        };
        let base = self.indexing_base();
        let c = base.to_zero_based(channel, "channel", sizes.c)?;
        let t = base.to_zero_based(timepoint, "timepoint", sizes.t)?;

        let tag = self.host.dataset_type(dataset)?;
        tracing::debug!("reading {} slab (channel {}, timepoint {})", tag, c, t);

        let volume = match tag {
            DataType::UInt8 => {
                Volume::U8(slab_to_array(self.host.read_slab_u8(dataset, c, t)?, sizes.spatial())?)
            }
            DataType::UInt16 => Volume::U16(slab_to_array(
                self.host.read_slab_u16(dataset, c, t)?,
                sizes.spatial(),
            )?),
            DataType::Float32 => Volume::F32(slab_to_array(
                self.host.read_slab_f32(dataset, c, t)?,
                sizes.spatial(),
            )?),
        };
        Ok(Some(volume))
    }

    /// [`read_volume`](Self::read_volume) followed by the fixed
    /// (X, Y, Z) → (Y, X, Z) axis swap.
    ///
    /// All validation and the benign-empty contract are delegated to
    /// `read_volume`; there is no other semantic difference.
    pub fn read_volume_row_major(
        &self,
        channel: usize,
        timepoint: usize,
        dataset: Option<DatasetHandle>,
    ) -> Result<Option<Volume>> {
        Ok(self
            .read_volume(channel, timepoint, dataset)?
            .map(Volume::permute_xy))
    }

    /// Read a rectangular box of one (channel, timepoint) slab.
    ///
    /// `origin` is given per axis in the connector's configured base;
    /// `size` is a plain voxel count per axis. The box must lie entirely
    /// inside the dataset extents.
    pub fn read_subvolume(
        &self,
        origin: [usize; 3],
        size: [usize; 3],
        channel: usize,
        timepoint: usize,
        dataset: Option<DatasetHandle>,
    ) -> Result<Option<Volume>> {
        let Some((dataset, sizes)) = self.dataset_context(dataset)? else {
            return Ok(None);
        };
        let base = self.indexing_base();
        let c = base.to_zero_based(channel, "channel", sizes.c)?;
        let t = base.to_zero_based(timepoint, "timepoint", sizes.t)?;

        let (sx, sy, sz) = sizes.spatial();
        let origin = [
            base.to_zero_based(origin[0], "x origin", sx)?,
            base.to_zero_based(origin[1], "y origin", sy)?,
            base.to_zero_based(origin[2], "z origin", sz)?,
        ];
        let inside =
            origin[0] + size[0] <= sx && origin[1] + size[1] <= sy && origin[2] + size[2] <= sz;
        if !inside {
            return Err(VoxBridgeError::Dataset(format!(
                "sub-volume of size {:?} at origin {:?} exceeds dataset extents ({}, {}, {})",
                size, origin, sx, sy, sz
            )));
        }

        let tag = self.host.dataset_type(dataset)?;
        tracing::debug!(
            "reading {} sub-volume {:?}+{:?} (channel {}, timepoint {})",
            tag,
            origin,
            size,
            c,
            t
        );

        let shape = (size[0], size[1], size[2]);
        let volume = match tag {
            DataType::UInt8 => Volume::U8(slab_to_array(
                self.host.read_subslab_u8(dataset, origin, size, c, t)?,
                shape,
            )?),
            DataType::UInt16 => Volume::U16(slab_to_array(
                self.host.read_subslab_u16(dataset, origin, size, c, t)?,
                shape,
            )?),
            DataType::Float32 => Volume::F32(slab_to_array(
                self.host.read_subslab_f32(dataset, origin, size, c, t)?,
                shape,
            )?),
        };
        Ok(Some(volume))
    }

    /// Write an (X, Y, Z) volume into one (channel, timepoint) slab of the
    /// active dataset.
    ///
    /// A 2-D slice can be written by converting it first
    /// (`Volume::from(array2)`), which makes it a single Z-slice.
    ///
    /// Silently does nothing when the connection is dead, no dataset is
    /// loaded, or the dataset is empty. Out-of-bounds indices, an element
    /// type differing from the dataset's declared tag, or a spatial shape
    /// differing from the dataset extents are hard errors, raised before
    /// the slab write is issued. There is no partial-write recovery: the
    /// write either fully dispatches or is rejected before starting.
    pub fn write_volume(&mut self, volume: &Volume, channel: usize, timepoint: usize) -> Result<()> {
        let Some((dataset, sizes)) = self.dataset_context(None)? else {
            tracing::debug!("write_volume skipped");
            return Ok(());
        };
        let base = self.indexing_base();
        let c = base.to_zero_based(channel, "channel", sizes.c)?;
        let t = base.to_zero_based(timepoint, "timepoint", sizes.t)?;

        let tag = self.host.dataset_type(dataset)?;
        if volume.data_type() != tag {
            return Err(VoxBridgeError::TypeMismatch {
                expected: tag.to_string(),
                actual: volume.data_type().to_string(),
            });
        }
        if volume.dim() != sizes.spatial() {
            return Err(VoxBridgeError::ShapeMismatch {
                expected: sizes.spatial(),
                actual: volume.dim(),
            });
        }

        tracing::debug!("writing {} slab (channel {}, timepoint {})", tag, c, t);
        match volume {
            Volume::U8(a) => self.host.write_slab_u8(dataset, c, t, &array_to_slab(a)),
            Volume::U16(a) => self.host.write_slab_u16(dataset, c, t, &array_to_slab(a)),
            Volume::F32(a) => self.host.write_slab_f32(dataset, c, t, &array_to_slab(a)),
        }
    }

    /// Write a (Y, X, Z)-oriented volume.
    ///
    /// Swaps the first two axes back to (X, Y, Z) and then applies the
    /// exact [`write_volume`](Self::write_volume) contract.
    pub fn write_volume_row_major(
        &mut self,
        volume: &Volume,
        channel: usize,
        timepoint: usize,
    ) -> Result<()> {
        let permuted = volume.clone().permute_xy();
        self.write_volume(&permuted, channel, timepoint)
    }
}

/// Reinterpret a flat x-fastest buffer as an (X, Y, Z) array
fn slab_to_array<T>(raw: Vec<T>, shape: (usize, usize, usize)) -> Result<Array3<T>> {
    let expected = shape.0 * shape.1 * shape.2;
    if raw.len() != expected {
        return Err(VoxBridgeError::Host(format!(
            "host returned {} voxels for a {:?} slab ({} expected)",
            raw.len(),
            shape,
            expected
        )));
    }
    // x varies fastest in the buffer, which is column-major for (X, Y, Z)
    Array3::from_shape_vec(shape.f(), raw)
        .map_err(|e| VoxBridgeError::Host(format!("slab reshape failed: {}", e)))
}

/// Linearize an (X, Y, Z) array into the host's x-fastest order
fn array_to_slab<T: Clone>(array: &Array3<T>) -> Vec<T> {
    // iterating the (Z, Y, X) view row-major makes x the fastest axis
    array.view().permuted_axes([2, 1, 0]).iter().cloned().collect()
}
