//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: create/remove nodes, attach/detach hierarchy
//! - Tree invariant: self and cycle attachment refusal
//! - Component management: names, meshes
//! - Node query: descendants, find_by_name, visibility, bounds
//! - SceneNode wrapper convenience API

use glam::Vec3;
use keyrig::assets::AssetServer;
use keyrig::errors::SceneError;
use keyrig::resources::{Geometry, Material, Mesh};
use keyrig::scene::node::Node;
use keyrig::scene::scene::Scene;

fn new_scene() -> Scene {
    Scene::new()
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn scene_create_node() {
    let mut scene = new_scene();
    let handle = scene.create_node();
    assert!(scene.get_node(handle).is_some());
    assert!(scene.contains(handle));
}

#[test]
fn scene_create_node_with_name() {
    let mut scene = new_scene();
    let handle = scene.create_node_with_name("TestNode");
    assert_eq!(scene.get_name(handle), Some("TestNode"));
}

#[test]
fn scene_set_name() {
    let mut scene = new_scene();
    let handle = scene.create_node();
    scene.set_name(handle, "Renamed");
    assert_eq!(scene.get_name(handle), Some("Renamed"));
}

#[test]
fn scene_add_node_to_root() {
    let mut scene = new_scene();
    let handle = scene.add_node(Node::new());
    assert!(scene.root_nodes().contains(&handle));
}

#[test]
fn scene_remove_node_removes_from_root() {
    let mut scene = new_scene();
    let handle = scene.add_node(Node::new());
    scene.remove_node(handle);

    assert!(!scene.root_nodes().contains(&handle));
    assert!(scene.get_node(handle).is_none());
}

#[test]
fn scene_remove_node_removes_subtree() {
    let mut scene = new_scene();
    let parent = scene.add_node(Node::new());
    let child = scene.create_node_with_name("child");
    let grandchild = scene.create_node();

    scene.attach(child, parent).unwrap();
    scene.attach(grandchild, child).unwrap();

    scene.remove_node(parent);

    assert!(scene.get_node(parent).is_none());
    assert!(scene.get_node(child).is_none());
    assert!(scene.get_node(grandchild).is_none());
    assert_eq!(scene.get_name(child), None);
    assert_eq!(scene.node_count(), 0);
}

#[test]
fn scene_remove_child_keeps_parent() {
    let mut scene = new_scene();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);

    scene.remove_node(child);

    assert!(scene.get_node(parent).unwrap().children().is_empty());
}

#[test]
fn scene_stale_handle_not_aliased() {
    let mut scene = new_scene();
    let old = scene.create_node_with_name("old");
    scene.remove_node(old);
    let new = scene.create_node_with_name("new");

    assert_ne!(old, new);
    assert!(scene.get_node(old).is_none());
    assert_eq!(scene.get_name(old), None);
}

// ============================================================================
// Hierarchy: Attach / Detach
// ============================================================================

#[test]
fn scene_attach_sets_parent_child() {
    let mut scene = new_scene();
    let parent = scene.create_node();
    let child = scene.create_node();

    scene.attach(child, parent).unwrap();

    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert!(scene.get_node(parent).unwrap().children().contains(&child));
    assert!(!scene.root_nodes().contains(&child));
}

#[test]
fn scene_attach_removes_from_old_parent() {
    let mut scene = new_scene();
    let parent1 = scene.create_node();
    let parent2 = scene.create_node();
    let child = scene.create_node();

    scene.attach(child, parent1).unwrap();
    scene.attach(child, parent2).unwrap();

    assert!(
        !scene.get_node(parent1).unwrap().children().contains(&child),
        "Child should be removed from old parent"
    );
    assert!(
        scene.get_node(parent2).unwrap().children().contains(&child),
        "Child should be in new parent"
    );
}

#[test]
fn scene_attach_to_self_is_refused() {
    let mut scene = new_scene();
    let node = scene.create_node();

    let result = scene.attach(node, node);

    assert!(matches!(result, Err(SceneError::Cycle { .. })));
    assert_eq!(scene.get_node(node).unwrap().parent(), None);
    assert!(scene.root_nodes().contains(&node));
}

#[test]
fn scene_attach_under_descendant_is_refused() {
    let mut scene = new_scene();
    let a = scene.create_node_with_name("a");
    let b = scene.create_node_with_name("b");
    let c = scene.create_node_with_name("c");
    scene.attach(b, a).unwrap();
    scene.attach(c, b).unwrap();

    let result = scene.attach(a, c);

    match result {
        Err(SceneError::Cycle { child, parent }) => {
            assert_eq!(child, "a");
            assert_eq!(parent, "c");
        }
        other => panic!("expected cycle refusal, got {other:?}"),
    }
    // Hierarchy untouched
    assert_eq!(scene.get_node(a).unwrap().parent(), None);
    assert_eq!(scene.get_node(c).unwrap().parent(), Some(b));
    assert!(scene.is_ancestor(a, c));
}

#[test]
fn scene_attach_stale_handle() {
    let mut scene = new_scene();
    let parent = scene.create_node();
    let child = scene.create_node();
    scene.remove_node(parent);

    assert!(matches!(scene.attach(child, parent), Err(SceneError::StaleHandle)));
}

#[test]
fn scene_detach_makes_root() {
    let mut scene = new_scene();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);

    scene.detach(child);

    assert_eq!(scene.get_node(child).unwrap().parent(), None);
    assert!(scene.root_nodes().contains(&child));
    assert!(scene.get_node(parent).unwrap().children().is_empty());
}

#[test]
fn scene_reparent_leaves_single_link() {
    let mut scene = new_scene();
    let a = scene.create_node();
    let b = scene.create_node();
    let child = scene.create_node();

    scene.attach(child, a).unwrap();
    scene.attach(child, b).unwrap();

    let roots = scene.root_nodes();
    assert_eq!(roots.iter().filter(|&&h| h == child).count(), 0);
    assert_eq!(roots.iter().filter(|&&h| h == a).count(), 1);
    assert_eq!(roots.iter().filter(|&&h| h == b).count(), 1);
    assert_eq!(scene.descendants(b), vec![b, child]);

    scene.detach(child);
    assert_eq!(scene.root_nodes().iter().filter(|&&h| h == child).count(), 1);
}

#[test]
fn scene_reparent_twice_world_position_follows_parent() {
    let mut scene = new_scene();
    let p = scene.build_node("p").with_position(Vec3::new(1.0, 0.0, 0.0)).build();
    let q = scene.build_node("q").with_position(Vec3::new(0.0, 2.0, 0.0)).build();
    let child = scene.create_node_with_name("child");

    scene.attach(child, p).unwrap();
    scene.attach(p, q).unwrap();
    scene.update_matrix_world();

    // Moving the leaf after both re-parents must still compose through q and p
    scene.node(child).set_position(Vec3::new(0.0, 0.0, 3.0));
    scene.update_matrix_world();

    let world = scene.get_node(child).unwrap().transform.world_position();
    assert!((world - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5, "got {world}");
    assert_eq!(scene.root_nodes(), &[q]);

    scene.remove_node(q);
    assert!(scene.root_nodes().is_empty());
    assert_eq!(scene.node_count(), 0);
}

#[test]
fn scene_add_cloned_node_does_not_share_children() {
    let mut scene = new_scene();
    let parent = scene.create_node_with_name("parent");
    let child = scene.build_node("child").with_parent(parent).build();

    let copy = scene.get_node(parent).unwrap().clone();
    let dup = scene.add_node(copy);
    let copy = scene.get_node(parent).unwrap().clone();
    let nested = scene.add_to_parent(copy, dup);

    assert_eq!(scene.get_node(dup).unwrap().children().len(), 1);
    assert!(scene.get_node(nested).unwrap().children().is_empty());
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));

    scene.remove_node(dup);
    assert!(scene.contains(child), "removing the copy keeps the original subtree");
    assert!(scene.get_node(parent).unwrap().children().contains(&child));
}

#[test]
fn scene_add_to_parent() {
    let mut scene = new_scene();
    let parent = scene.add_node(Node::new());
    let child = scene.add_to_parent(Node::new(), parent);

    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert!(scene.get_node(parent).unwrap().children().contains(&child));
}

// ============================================================================
// Component Management: Mesh
// ============================================================================

#[test]
fn scene_set_get_mesh() {
    let assets = AssetServer::new();
    let named = assets
        .named("memory://mesh")
        .mesh("cube", Geometry::new_box(1.0, 1.0, 1.0))
        .material("white", Material::default())
        .finish();

    let mut scene = new_scene();
    let handle = scene.create_node();
    let mesh = Mesh::new(named.mesh("cube").unwrap(), named.material("white").unwrap());
    scene.set_mesh(handle, mesh);

    assert!(scene.get_mesh(handle).is_some());

    scene.remove_node(handle);
    assert!(scene.get_mesh(handle).is_none());
}

// ============================================================================
// Hierarchy + Transform Dirty Propagation
// ============================================================================

#[test]
fn scene_attach_marks_child_dirty() {
    let mut scene = new_scene();
    let parent = scene.create_node();
    let child = scene.create_node();

    // Consume dirty flag by calling update_local_matrix
    scene
        .get_node_mut(child)
        .unwrap()
        .transform
        .update_local_matrix();

    scene.attach(child, parent).unwrap();

    let child_node = scene.get_node_mut(child).unwrap();
    assert!(
        child_node.transform.update_local_matrix(),
        "Attach should mark child transform dirty"
    );
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn scene_descendants_document_order() {
    let mut scene = new_scene();
    let root = scene.create_node_with_name("root");
    let a = scene.build_node("a").with_parent(root).build();
    let a1 = scene.build_node("a1").with_parent(a).build();
    let b = scene.build_node("b").with_parent(root).build();

    assert_eq!(scene.descendants(root), vec![root, a, a1, b]);
    assert_eq!(scene.find_by_name(root, "b"), Some(b));
    assert_eq!(scene.find_by_name(a, "b"), None);
}

#[test]
fn scene_visibility_in_hierarchy() {
    let mut scene = new_scene();
    let root = scene.create_node();
    let child = scene.build_node("child").with_parent(root).build();

    assert!(scene.is_visible_in_hierarchy(child));
    scene.get_node_mut(root).unwrap().visible = false;
    assert!(!scene.is_visible_in_hierarchy(child));
}

#[test]
fn scene_bbox_of_node() {
    let assets = AssetServer::new();
    let named = assets
        .named("memory://bbox")
        .mesh("cube", Geometry::new_box(2.0, 2.0, 2.0))
        .material("white", Material::default())
        .finish();
    let cube = || Mesh::new(named.mesh("cube").unwrap(), named.material("white").unwrap());

    let mut scene = new_scene();
    let root = scene.create_node();
    scene
        .build_node("left")
        .with_parent(root)
        .with_position(Vec3::new(-2.0, 0.0, 0.0))
        .with_mesh(cube())
        .build();
    scene
        .build_node("right")
        .with_parent(root)
        .with_position(Vec3::new(2.0, 0.0, 0.0))
        .with_mesh(cube())
        .build();
    scene.update_matrix_world();

    let bbox = scene.get_bbox_of_node(root, &assets).unwrap();
    assert!((bbox.min.x + 3.0).abs() < 1e-5);
    assert!((bbox.max.x - 3.0).abs() < 1e-5);
    assert!((bbox.size().y - 2.0).abs() < 1e-5);

    let empty = scene.create_node();
    assert!(scene.get_bbox_of_node(empty, &assets).is_none());
}

// ============================================================================
// SceneNode Wrapper
// ============================================================================

#[test]
fn scene_node_wrapper_chain() {
    let mut scene = new_scene();
    let handle = scene.create_node();

    scene
        .node(handle)
        .set_position(Vec3::new(1.0, 2.0, 3.0))
        .translate(Vec3::new(0.0, -1.0, 0.0))
        .set_scale(Vec3::splat(2.0))
        .set_visible(false);

    let node = scene.get_node(handle).unwrap();
    assert_eq!(node.transform.position, Vec3::new(1.0, 1.0, 3.0));
    assert_eq!(node.transform.scale, Vec3::splat(2.0));
    assert!(!node.visible);
}

#[test]
fn scene_node_wrapper_stale_is_noop() {
    let mut scene = new_scene();
    let handle = scene.create_node();
    scene.remove_node(handle);

    let wrapper = scene.node(handle).translate(Vec3::ONE);
    assert!(!wrapper.is_alive());
    assert_eq!(wrapper.position(), None);
}
