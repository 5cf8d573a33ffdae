//! Scene graph module
//!
//! Manages the node hierarchy the keyboard is composed into:
//! - Node: hierarchy links, transform and visibility
//! - Transform: local TRS with cached local/world matrices
//! - Scene: node arena plus component maps (names, meshes)
//! - SceneNode: chainable mutation wrapper used by animation code
//! - transform_system: world-matrix propagation decoupled from `Scene`

pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;
pub mod wrapper;

pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;
pub use wrapper::SceneNode;

use slotmap::new_key_type;

new_key_type! {
    /// Versioned handle to a scene node.
    ///
    /// A handle outlives its node safely: once the node is removed every
    /// lookup through the handle returns `None`, even if the slot is reused.
    pub struct NodeHandle;
}
