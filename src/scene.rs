//! Scene traversal and spot objects
//!
//! Thin forwarding surface over the host's scene graph: enumerate the
//! children of the scene (optionally recursively and filtered by
//! kind), query the current selection, and read or write the spot
//! objects used for detected particles.
//!
//! The benign-empty policy applies here too: with no live connection,
//! traversals come back empty, spot reads come back `None`, and spot
//! writes are skipped. Misusing a handle (asking a surface object for
//! its spots) or handing over ragged spot columns is a hard error.

use crate::color;
use crate::connector::Connector;
use crate::error::{Result, VoxBridgeError};
use crate::host::{ObjectHandle, ObjectKind};
use crate::types::SpotData;

impl Connector {
    /// Children of the scene, in scene order.
    ///
    /// With `recursive` the traversal is depth-first, parents before
    /// their children. `filter` keeps only objects of one kind; group
    /// objects are still descended into.
    pub fn scene_children(
        &self,
        recursive: bool,
        filter: Option<ObjectKind>,
    ) -> Result<Vec<ObjectHandle>> {
        if !self.is_alive() {
            return Ok(Vec::new());
        }
        let Some(root) = self.host.scene_root()? else {
            tracing::debug!("host has no scene");
            return Ok(Vec::new());
        };
        let mut found = Vec::new();
        self.collect_children(root, recursive, filter, &mut found)?;
        Ok(found)
    }

    fn collect_children(
        &self,
        parent: ObjectHandle,
        recursive: bool,
        filter: Option<ObjectKind>,
        found: &mut Vec<ObjectHandle>,
    ) -> Result<()> {
        for child in self.host.object_children(parent)? {
            let kind = self.host.object_kind(child)?;
            if filter.is_none() || filter == Some(kind) {
                found.push(child);
            }
            if recursive {
                self.collect_children(child, recursive, filter, found)?;
            }
        }
        Ok(())
    }

    /// The object currently selected in the host UI, if any.
    ///
    /// With a `filter`, a selection of a different kind yields `None`.
    pub fn scene_selection(&self, filter: Option<ObjectKind>) -> Result<Option<ObjectHandle>> {
        if !self.is_alive() {
            return Ok(None);
        }
        let Some(selected) = self.host.selected_object()? else {
            return Ok(None);
        };
        if let Some(kind) = filter {
            if self.host.object_kind(selected)? != kind {
                return Ok(None);
            }
        }
        Ok(Some(selected))
    }

    /// Display name of a scene object
    pub fn object_name(&self, object: ObjectHandle) -> Result<String> {
        self.host.object_name(object)
    }

    /// Concrete kind of a scene object
    pub fn object_kind(&self, object: ObjectHandle) -> Result<ObjectKind> {
        self.host.object_kind(object)
    }

    /// Read the spot columns of a spots object.
    ///
    /// Returns `Ok(None)` with no live connection; a handle that is not a
    /// spots object is a `Scene` error.
    pub fn spots(&self, object: ObjectHandle) -> Result<Option<SpotData>> {
        if !self.is_alive() {
            return Ok(None);
        }
        self.ensure_spots(object)?;
        Ok(Some(self.host.spots(object)?))
    }

    /// Replace the spot columns of a spots object.
    ///
    /// Skipped silently with no live connection. The handle must be a
    /// spots object and the columns must have equal lengths; both are
    /// checked before the remote call.
    pub fn set_spots(&mut self, object: ObjectHandle, spots: &SpotData) -> Result<()> {
        if !self.is_alive() {
            tracing::debug!("set_spots skipped: no live connection");
            return Ok(());
        }
        self.ensure_spots(object)?;
        spots.validate()?;
        tracing::debug!("writing {} spots", spots.len());
        self.host.set_spots(object, spots)
    }

    /// Create a new spots object in the scene.
    ///
    /// `color` is an RGBA quadruple with components in [0, 1]. Returns
    /// `Ok(None)` with no live connection.
    pub fn create_spots(
        &mut self,
        name: &str,
        spots: &SpotData,
        color: [f32; 4],
    ) -> Result<Option<ObjectHandle>> {
        if !self.is_alive() {
            tracing::debug!("create_spots skipped: no live connection");
            return Ok(None);
        }
        spots.validate()?;
        let packed = color::rgba_to_scalar(color);
        tracing::info!("creating spots object '{}' with {} spots", name, spots.len());
        Ok(Some(self.host.create_spots(name, spots, packed)?))
    }

    fn ensure_spots(&self, object: ObjectHandle) -> Result<()> {
        let kind = self.host.object_kind(object)?;
        if kind != ObjectKind::Spots {
            return Err(VoxBridgeError::Scene(format!(
                "object '{}' is a {}, not a spots object",
                self.host.object_name(object)?,
                kind
            )));
        }
        Ok(())
    }
}
