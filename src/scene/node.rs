use crate::scene::NodeHandle;
use crate::scene::transform::Transform;
use glam::Affine3A;

/// A minimal scene node containing only hot data.
///
/// Names and mesh components live in the [`Scene`]'s component maps so that
/// pure groups stay small.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child links:
/// - `parent`: handle of the parent node (`None` for roots)
/// - `children`: ordered child handles
///
/// Links are maintained by [`Scene`]; they are read-only from outside the
/// crate so the tree invariant cannot be broken by hand.
///
/// [`Scene`]: crate::scene::Scene
#[derive(Debug, Clone)]
pub struct Node {
    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Core Spatial Data ===
    pub transform: Transform,

    // === Core State ===
    pub visible: bool,
}

impl Node {
    /// Creates a new node with identity transform, visible.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World matrix as of the last transform update.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
