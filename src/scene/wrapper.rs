//! Chainable node operation wrapper.
//!
//! [`SceneNode`] borrows a [`Scene`] mutably and provides a fluent API for
//! driving bound keyboard parts without `get_node_mut().unwrap()` chains.
//!
//! All methods silently no-op when the handle is stale: a key handle that
//! outlived an unmount simply stops moving anything.
//!
//! # Example
//!
//! ```rust,ignore
//! scene.node(esc)
//!     .translate(Vec3::new(0.0, -0.004, 0.0))
//!     .set_visible(true);
//! ```
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::must_use_candidate)]
use glam::Vec3;

use crate::scene::NodeHandle;
use crate::scene::scene::Scene;

/// Temporary mutable borrow of a scene node for chainable operations.
pub struct SceneNode<'a> {
    scene: &'a mut Scene,
    handle: NodeHandle,
}

impl<'a> SceneNode<'a> {
    #[inline]
    pub fn new(scene: &'a mut Scene, handle: NodeHandle) -> Self {
        Self { scene, handle }
    }

    /// Returns the underlying handle.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    /// Whether the handle still points at a live node.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.scene.contains(self.handle)
    }

    /// Local position, if the node is alive.
    #[inline]
    pub fn position(&self) -> Option<Vec3> {
        self.scene.get_node(self.handle).map(|n| n.transform.position)
    }

    // -- Transform setters (chainable) --

    /// Sets the node's local position.
    #[inline]
    pub fn set_position(self, position: Vec3) -> Self {
        if let Some(node) = self.scene.get_node_mut(self.handle) {
            node.transform.position = position;
        }
        self
    }

    /// Offsets the node's local position.
    #[inline]
    pub fn translate(self, offset: Vec3) -> Self {
        if let Some(node) = self.scene.get_node_mut(self.handle) {
            node.transform.position += offset;
        }
        self
    }

    /// Sets rotation from Euler angles (XYZ intrinsic order, radians).
    #[inline]
    pub fn set_rotation_euler(self, euler: Vec3) -> Self {
        if let Some(node) = self.scene.get_node_mut(self.handle) {
            node.transform.set_rotation_euler(euler.x, euler.y, euler.z);
        }
        self
    }

    /// Sets non-uniform scale.
    #[inline]
    pub fn set_scale(self, scale: Vec3) -> Self {
        if let Some(node) = self.scene.get_node_mut(self.handle) {
            node.transform.scale = scale;
        }
        self
    }

    /// Sets node visibility.
    #[inline]
    pub fn set_visible(self, visible: bool) -> Self {
        if let Some(node) = self.scene.get_node_mut(self.handle) {
            node.visible = visible;
        }
        self
    }

    /// Sets both shadow flags (no-op if the node has no mesh).
    #[inline]
    pub fn set_shadows(self, cast: bool, receive: bool) -> Self {
        if let Some(mesh) = self.scene.get_mesh_mut(self.handle) {
            mesh.cast_shadows = cast;
            mesh.receive_shadows = receive;
        }
        self
    }
}
