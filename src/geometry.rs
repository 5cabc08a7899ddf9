//! Dataset geometry and coordinate mapping
//!
//! Accessors for the active dataset's voxel counts, world-unit extents
//! and derived voxel sizes, plus the mapping between world-unit positions
//! and fractional voxel coordinates.
//!
//! Everything here follows the connector-wide benign-empty policy: a dead
//! connection, a missing dataset or the empty-dataset sentinel makes each
//! accessor return `Ok(None)` instead of erroring. Nothing is cached;
//! every call queries the host afresh.

use crate::connector::Connector;
use crate::error::Result;
use crate::host::DatasetHandle;
use crate::types::{DatasetBounds, DatasetSizes};

impl Connector {
    /// Voxel counts and channel/timepoint counts of a dataset.
    ///
    /// `dataset` defaults to the host's currently active dataset.
    pub fn dataset_sizes(&self, dataset: Option<DatasetHandle>) -> Result<Option<DatasetSizes>> {
        Ok(self.dataset_context(dataset)?.map(|(_, sizes)| sizes))
    }

    /// World-unit extents of a dataset
    pub fn dataset_bounds(&self, dataset: Option<DatasetHandle>) -> Result<Option<DatasetBounds>> {
        match self.dataset_context(dataset)? {
            Some((handle, _)) => Ok(Some(self.host.dataset_bounds(handle)?)),
            None => Ok(None),
        }
    }

    /// Voxel size per axis, in world units: `(max - min) / count`
    pub fn voxel_sizes(&self, dataset: Option<DatasetHandle>) -> Result<Option<[f32; 3]>> {
        let Some((handle, sizes)) = self.dataset_context(dataset)? else {
            return Ok(None);
        };
        let bounds = self.host.dataset_bounds(handle)?;
        Ok(Some(voxel_sizes_of(&bounds, &sizes)))
    }

    /// Map world-unit positions to fractional voxel coordinates.
    ///
    /// Voxel-center convention in the connector's indexing base: the
    /// center of the first voxel maps to 0.0 (or 1.0 with 1-based
    /// indexing), so `v = (u - min) / voxel_size - 0.5 + base`.
    pub fn map_units_to_voxels(
        &self,
        positions: &[[f32; 3]],
        dataset: Option<DatasetHandle>,
    ) -> Result<Option<Vec<[f32; 3]>>> {
        let Some((handle, sizes)) = self.dataset_context(dataset)? else {
            return Ok(None);
        };
        let bounds = self.host.dataset_bounds(handle)?;
        let voxel_sizes = voxel_sizes_of(&bounds, &sizes);
        let base = self.indexing_base().offset() as f32;

        Ok(Some(
            positions
                .iter()
                .map(|p| {
                    [
                        (p[0] - bounds.min[0]) / voxel_sizes[0] - 0.5 + base,
                        (p[1] - bounds.min[1]) / voxel_sizes[1] - 0.5 + base,
                        (p[2] - bounds.min[2]) / voxel_sizes[2] - 0.5 + base,
                    ]
                })
                .collect(),
        ))
    }

    /// Map fractional voxel coordinates to world-unit positions.
    ///
    /// The exact inverse of
    /// [`map_units_to_voxels`](Self::map_units_to_voxels):
    /// `u = (v + 0.5 - base) * voxel_size + min`.
    pub fn map_voxels_to_units(
        &self,
        positions: &[[f32; 3]],
        dataset: Option<DatasetHandle>,
    ) -> Result<Option<Vec<[f32; 3]>>> {
        let Some((handle, sizes)) = self.dataset_context(dataset)? else {
            return Ok(None);
        };
        let bounds = self.host.dataset_bounds(handle)?;
        let voxel_sizes = voxel_sizes_of(&bounds, &sizes);
        let base = self.indexing_base().offset() as f32;

        Ok(Some(
            positions
                .iter()
                .map(|p| {
                    [
                        (p[0] + 0.5 - base) * voxel_sizes[0] + bounds.min[0],
                        (p[1] + 0.5 - base) * voxel_sizes[1] + bounds.min[1],
                        (p[2] + 0.5 - base) * voxel_sizes[2] + bounds.min[2],
                    ]
                })
                .collect(),
        ))
    }
}

/// Per-axis voxel size of a dataset with the given bounds and counts
fn voxel_sizes_of(bounds: &DatasetBounds, sizes: &DatasetSizes) -> [f32; 3] {
    let (x, y, z) = sizes.spatial();
    [
        (bounds.max[0] - bounds.min[0]) / x as f32,
        (bounds.max[1] - bounds.min[1]) / y as f32,
        (bounds.max[2] - bounds.min[2]) / z as f32,
    ]
}
