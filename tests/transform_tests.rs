//! Transform and TransformSystem tests
//!
//! Tests for:
//! - Transform TRS operations and dirty checking
//! - Euler angle round-trip conversions
//! - Placement construction
//! - Hierarchical matrix propagation (full scene, subtree)

use glam::{Mat4, Quat, Vec3};
use keyrig::scene::NodeHandle;
use keyrig::scene::node::Node;
use keyrig::scene::scene::Scene;
use keyrig::scene::transform::Transform;
use std::f32::consts::FRAC_PI_2;

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn world_pos(scene: &Scene, handle: NodeHandle) -> Vec3 {
    scene.get_node(handle).unwrap().transform.world_position()
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();

    // First call always updates
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.position = Vec3::new(1.0, 2.0, 3.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.rotation = Quat::from_rotation_y(FRAC_PI_2);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.scale = Vec3::splat(2.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());
}

#[test]
fn transform_mark_dirty_forces_update() {
    let mut t = Transform::new();
    t.update_local_matrix();
    assert!(!t.update_local_matrix());

    t.mark_dirty();
    assert!(t.update_local_matrix());
}

#[test]
fn transform_local_matrix_reflects_trs() {
    let mut t = Transform::new();
    t.position = Vec3::new(10.0, 20.0, 30.0);
    t.scale = Vec3::splat(2.0);
    t.update_local_matrix();

    let mat = Mat4::from(*t.local_matrix());
    let translation = mat.w_axis.truncate();
    assert!(vec3_approx(translation, Vec3::new(10.0, 20.0, 30.0)));
}

#[test]
fn transform_euler_roundtrip() {
    let mut t = Transform::new();
    let (x, y, z) = (0.3, 0.7, 1.2);
    t.set_rotation_euler(x, y, z);

    let euler = t.rotation_euler();
    assert!(approx_eq(euler.x, x));
    assert!(approx_eq(euler.y, y));
    assert!(approx_eq(euler.z, z));
}

#[test]
fn transform_from_placement_absent_rotation_is_identity() {
    let t = Transform::from_placement(Vec3::new(0.1, 0.2, 0.3), None);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.position, Vec3::new(0.1, 0.2, 0.3));

    let tilted = Transform::from_placement(Vec3::ZERO, Some(Vec3::new(-0.12, 0.0, 0.0)));
    assert!(approx_eq(tilted.rotation_euler().x, -0.12));
}

// ============================================================================
// Hierarchy Propagation
// ============================================================================

/// Chain of `length` nodes, each offset by +1 on X from its parent.
fn create_chain(scene: &mut Scene, length: usize) -> Vec<NodeHandle> {
    let mut handles = Vec::with_capacity(length);
    let mut parent: Option<NodeHandle> = None;
    for i in 0..length {
        let builder = scene
            .build_node(&format!("n{i}"))
            .with_position(Vec3::new(1.0, 0.0, 0.0));
        let handle = match parent {
            Some(p) => builder.with_parent(p).build(),
            None => builder.build(),
        };
        handles.push(handle);
        parent = Some(handle);
    }
    handles
}

#[test]
fn hierarchy_chain_world_positions() {
    let mut scene = Scene::new();
    let chain = create_chain(&mut scene, 5);

    scene.update_matrix_world();

    for (i, &handle) in chain.iter().enumerate() {
        let expected = Vec3::new((i + 1) as f32, 0.0, 0.0);
        assert!(vec3_approx(world_pos(&scene, handle), expected), "node {i}");
    }
}

#[test]
fn hierarchy_with_rotation_and_scale() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new());
    {
        let node = scene.get_node_mut(parent).unwrap();
        node.transform.rotation = Quat::from_rotation_y(FRAC_PI_2);
        node.transform.scale = Vec3::splat(2.0);
    }
    let child = scene
        .build_node("child")
        .with_parent(parent)
        .with_position(Vec3::new(1.0, 0.0, 0.0))
        .build();

    scene.update_matrix_world();

    // +X rotated 90 degrees about Y is -Z, then scaled by 2
    assert!(vec3_approx(world_pos(&scene, child), Vec3::new(0.0, 0.0, -2.0)));
}

#[test]
fn hierarchy_parent_change_propagates() {
    let mut scene = Scene::new();
    let chain = create_chain(&mut scene, 3);
    scene.update_matrix_world();

    scene.node(chain[0]).translate(Vec3::new(0.0, 5.0, 0.0));
    scene.update_matrix_world();

    assert!(vec3_approx(world_pos(&scene, chain[2]), Vec3::new(3.0, 5.0, 0.0)));
}

#[test]
fn hierarchy_subtree_update() {
    let mut scene = Scene::new();
    let chain = create_chain(&mut scene, 4);
    scene.update_matrix_world();

    scene.node(chain[1]).set_position(Vec3::new(0.0, 1.0, 0.0));
    scene.update_subtree(chain[1]);

    // chain[0] at x=1; chain[1] offset (0,1,0); chain[2..] add +1 X each
    assert!(vec3_approx(world_pos(&scene, chain[1]), Vec3::new(1.0, 1.0, 0.0)));
    assert!(vec3_approx(world_pos(&scene, chain[3]), Vec3::new(3.0, 1.0, 0.0)));
}

#[test]
fn hierarchy_stale_root_is_skipped() {
    let mut scene = Scene::new();
    let chain = create_chain(&mut scene, 2);
    scene.remove_node(chain[0]);

    // Must not panic on the removed subtree
    scene.update_matrix_world();
    scene.update_subtree(chain[1]);
    assert!(scene.get_node(chain[1]).is_none());
}
