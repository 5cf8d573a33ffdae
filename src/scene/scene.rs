use glam::Vec3;
use slotmap::{SecondaryMap, SlotMap, SparseSecondaryMap};

use crate::assets::AssetServer;
use crate::errors::SceneError;
use crate::resources::{BoundingBox, Mesh};
use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::scene::wrapper::SceneNode;
use crate::scene::{NodeHandle, transform_system};

/// Scene graph: a node arena plus component maps.
///
/// # Storage
///
/// - `nodes`: every node, addressed by versioned [`NodeHandle`]s
/// - `names`: dense name component (almost every node is named)
/// - `meshes`: sparse mesh component (groups carry none)
///
/// Removing a node removes its whole subtree and all of its components, so
/// handles into the subtree go stale together.
pub struct Scene {
    pub(crate) nodes: SlotMap<NodeHandle, Node>,
    pub(crate) root_nodes: Vec<NodeHandle>,

    // === Components ===
    pub(crate) names: SecondaryMap<NodeHandle, String>,
    pub(crate) meshes: SparseSecondaryMap<NodeHandle, Mesh>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            names: SecondaryMap::new(),
            meshes: SparseSecondaryMap::new(),
        }
    }

    // ========================================================================
    // Node Management
    // ========================================================================

    /// Starts building a node.
    pub fn build_node(&'_ mut self, name: &str) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    /// Creates an unnamed root node.
    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    /// Creates a named root node.
    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        let handle = self.add_node(Node::new());
        self.names.insert(handle, name.to_string());
        handle
    }

    /// Adds a node as a scene root.
    ///
    /// Hierarchy links carried by `node` are discarded: a node enters the
    /// scene without children.
    pub fn add_node(&mut self, mut node: Node) -> NodeHandle {
        node.parent = None;
        node.children.clear();
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node under `parent`. Falls back to a root when the parent is
    /// stale.
    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found, adding child as a root");
            return self.add_node(child);
        }
        child.parent = Some(parent);
        child.children.clear();
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };

        // Unlink the subtree root from its parent (or the root list).
        if let Some(parent) = node.parent {
            if let Some(p) = self.nodes.get_mut(parent)
                && let Some(pos) = p.children.iter().position(|&x| x == handle)
            {
                p.children.remove(pos);
            }
        } else if let Some(pos) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(pos);
        }

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
            self.names.remove(current);
            self.meshes.remove(current);
        }
    }

    /// Re-parents `child` under `parent`.
    ///
    /// Refuses to attach a node to itself or to one of its own descendants;
    /// the hierarchy is left untouched in that case.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> Result<(), SceneError> {
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            return Err(SceneError::StaleHandle);
        }
        if child == parent || self.is_ancestor(child, parent) {
            log::warn!(
                "Refusing to attach {:?} under {:?}: would create a cycle",
                self.get_name(child),
                self.get_name(parent)
            );
            return Err(SceneError::Cycle {
                child: self.get_name(child).unwrap_or_default().to_string(),
                parent: self.get_name(parent).unwrap_or_default().to_string(),
            });
        }

        self.unlink(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
        Ok(())
    }

    /// Makes `child` a scene root, keeping its subtree.
    pub fn detach(&mut self, child: NodeHandle) {
        if !self.nodes.contains_key(child) {
            return;
        }
        self.unlink(child);
        self.root_nodes.push(child);
    }

    /// Removes `child` from its parent's children (or the root list) and
    /// clears its parent link. The node is left dangling until re-linked.
    fn unlink(&mut self, child: NodeHandle) {
        let Some(old_parent) = self.nodes.get(child).map(|n| n.parent) else {
            return;
        };
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }

        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
            c.transform.mark_dirty();
        }
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Chainable mutation wrapper for one node.
    pub fn node(&mut self, handle: NodeHandle) -> SceneNode<'_> {
        SceneNode::new(self, handle)
    }

    #[inline]
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // Components
    // ========================================================================

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if self.nodes.contains_key(handle) {
            self.names.insert(handle, name.to_string());
        }
    }

    pub fn set_mesh(&mut self, handle: NodeHandle, mesh: Mesh) {
        if self.nodes.contains_key(handle) {
            self.meshes.insert(handle, mesh);
        }
    }

    #[must_use]
    pub fn get_mesh(&self, handle: NodeHandle) -> Option<&Mesh> {
        self.meshes.get(handle)
    }

    pub fn get_mesh_mut(&mut self, handle: NodeHandle) -> Option<&mut Mesh> {
        self.meshes.get_mut(handle)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Depth-first, document-order walk of the subtree rooted at `root`,
    /// the root included.
    #[must_use]
    pub fn descendants(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// First node named `name` in `root`'s subtree, in document order.
    #[must_use]
    pub fn find_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.descendants(root)
            .into_iter()
            .find(|&h| self.get_name(h) == Some(name))
    }

    /// Whether the node and every ancestor are visible.
    #[must_use]
    pub fn is_visible_in_hierarchy(&self, handle: NodeHandle) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.nodes.get(h) else {
                return false;
            };
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        true
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Updates world matrices of every node in the scene.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    /// Updates world matrices of one subtree.
    pub fn update_subtree(&mut self, root: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, root);
    }

    /// World-space bounds of the meshes in `handle`'s subtree.
    ///
    /// Uses world matrices from the last update.
    #[must_use]
    pub fn get_bbox_of_node(&self, handle: NodeHandle, assets: &AssetServer) -> Option<BoundingBox> {
        self.descendants(handle)
            .into_iter()
            .filter_map(|h| {
                let mesh = self.meshes.get(h)?;
                let node = self.nodes.get(h)?;
                let local = assets.get_geometry(mesh.geometry)?.bounding_box()?;
                Some(local.transform(&node.transform.world_matrix))
            })
            .reduce(|a, b| a.union(&b))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Node Builder
// ============================================================================

/// Fluent construction of one named node.
pub struct NodeBuilder<'a> {
    scene: &'a mut Scene,
    name: String,
    node: Node,
    parent: Option<NodeHandle>,
    mesh: Option<Mesh>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: &str) -> Self {
        Self {
            scene,
            name: name.to_string(),
            node: Node::new(),
            parent: None,
            mesh: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.node.transform.position = position;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.node.transform = transform;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.node.visible = visible;
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Inserts the node and returns its handle.
    pub fn build(self) -> NodeHandle {
        let handle = match self.parent {
            Some(parent) => self.scene.add_to_parent(self.node, parent),
            None => self.scene.add_node(self.node),
        };
        self.scene.names.insert(handle, self.name);
        if let Some(mesh) = self.mesh {
            self.scene.meshes.insert(handle, mesh);
        }
        handle
    }
}
