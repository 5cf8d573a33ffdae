//! Transform System
//!
//! Propagates local transforms into world matrices. Decoupled from
//! [`Scene`] so it only borrows the node arena.
//!
//! [`Scene`]: crate::scene::Scene

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Updates world matrices for every tree rooted in `roots`.
///
/// Uses an explicit stack so deep hierarchies cannot overflow the call
/// stack. A node's world matrix is only recomputed when its local TRS or an
/// ancestor changed.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // Work stack: (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = node.transform.world_matrix;

        // Reverse so children are visited in document order.
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }
}

/// Updates the subtree rooted at `root_handle`, taking the parent's current
/// world matrix as the starting point.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root_handle: NodeHandle) {
    let Some(node) = nodes.get(root_handle) else {
        return;
    };
    let parent_world = node
        .parent
        .and_then(|p| nodes.get(p))
        .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);

    let mut stack: Vec<(NodeHandle, Affine3A)> = vec![(root_handle, parent_world)];

    while let Some((node_handle, parent_world_matrix)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };
        node.transform.update_local_matrix();
        let new_world = parent_world_matrix * *node.transform.local_matrix();
        node.transform.set_world_matrix(new_world);

        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, new_world));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_hierarchy_update() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let mut parent = Node::new();
        parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new();
        child.transform.position = Vec3::new(0.0, 1.0, 0.0);
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes.get_mut(parent_handle).unwrap().children.push(child_handle);

        update_hierarchy_iterative(&mut nodes, &[parent_handle]);

        let child_world_pos = nodes.get(child_handle).unwrap().transform.world_matrix.translation;
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
    }
}
