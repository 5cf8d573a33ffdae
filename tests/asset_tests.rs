//! Asset Storage & Provider Tests
//!
//! Tests for:
//! - AssetStorage: insert_unique deduplication, get, len
//! - Thread safety: concurrent reads via RwLock
//! - AssetServer: in-memory named sets, resolution cache, failure modes

use std::sync::Arc;

use keyrig::assets::storage::AssetStorage;
use keyrig::assets::{AssetKind, AssetProvider, AssetServer, asset_uuid};
use keyrig::errors::{AssetError, Error};
use keyrig::resources::{Geometry, Material};
use glam::Vec4;
use slotmap::new_key_type;
use uuid::Uuid;

new_key_type! { struct TestHandle; }

// ============================================================================
// AssetStorage
// ============================================================================

#[test]
fn storage_insert_and_get() {
    let storage = AssetStorage::<TestHandle, String>::new();
    let handle = storage.insert_unique(Uuid::new_v4(), "hello".to_string());
    assert_eq!(storage.get(handle).unwrap().as_str(), "hello");
}

#[test]
fn storage_foreign_handle_returns_none() {
    let storage = AssetStorage::<TestHandle, String>::new();
    let handle = storage.insert_unique(Uuid::new_v4(), "test".to_string());
    let storage2 = AssetStorage::<TestHandle, String>::new();
    assert!(storage2.get(handle).is_none());
}

#[test]
fn storage_distinct_uuids_distinct_handles() {
    let storage = AssetStorage::<TestHandle, i32>::new();
    assert!(storage.is_empty());

    let h1 = storage.insert_unique(Uuid::new_v4(), 10);
    let h2 = storage.insert_unique(Uuid::new_v4(), 20);

    assert_ne!(h1, h2);
    assert_eq!(*storage.get(h1).unwrap(), 10);
    assert_eq!(*storage.get(h2).unwrap(), 20);
    assert_eq!(storage.len(), 2);
}

#[test]
fn storage_same_uuid_keeps_first() {
    let storage = AssetStorage::<TestHandle, String>::new();
    let uuid = Uuid::new_v4();

    let h1 = storage.insert_unique(uuid, "first".to_string());
    let h2 = storage.insert_unique(uuid, "second".to_string());

    assert_eq!(h1, h2, "Same UUID should return same handle");
    assert_eq!(storage.get(h1).unwrap().as_str(), "first");
    assert_eq!(storage.len(), 1);
}

// ============================================================================
// Thread Safety
// ============================================================================

#[test]
fn storage_concurrent_reads() {
    use std::thread;

    let storage = Arc::new(AssetStorage::<TestHandle, i32>::new());
    let handle = storage.insert_unique(Uuid::new_v4(), 42);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let s = Arc::clone(&storage);
        handles.push(thread::spawn(move || {
            assert_eq!(*s.get(handle).unwrap(), 42);
        }));
    }

    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn storage_concurrent_inserts_converge() {
    use std::thread;

    let storage = Arc::new(AssetStorage::<TestHandle, usize>::new());
    let uuid = Uuid::new_v4();

    let results: Vec<TestHandle> = (0..4)
        .map(|i| {
            let s = Arc::clone(&storage);
            thread::spawn(move || s.insert_unique(uuid, i))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(storage.len(), 1);
}

// ============================================================================
// Named Assets
// ============================================================================

#[test]
fn named_assets_lookup() {
    let server = AssetServer::new();
    let named = server
        .named("memory://board")
        .mesh("plate", Geometry::new_box(0.3, 0.002, 0.12))
        .material("plate", Material::new(Vec4::new(0.2, 0.2, 0.2, 1.0)))
        .finish();

    assert_eq!(named.resource_id(), "memory://board");
    assert_eq!(named.mesh_count(), 1);
    assert_eq!(named.material_count(), 1);

    let geometry = server.get_geometry(named.mesh("plate").unwrap()).unwrap();
    assert_eq!(geometry.vertex_count(), 8);
    assert!(named.mesh("frame").is_none());
    assert!(named.material("frame").is_none());
}

#[test]
fn named_assets_same_name_different_kind() {
    let server = AssetServer::new();
    let named = server
        .named("memory://kinds")
        .mesh("plate", Geometry::new_box(1.0, 1.0, 1.0))
        .material("plate", Material::default())
        .finish();

    assert!(named.mesh("plate").is_some());
    assert!(named.material("plate").is_some());
    assert_ne!(
        asset_uuid("memory://kinds", AssetKind::Mesh, "plate"),
        asset_uuid("memory://kinds", AssetKind::Material, "plate")
    );
}

#[test]
fn named_assets_dedupe_across_registrations() {
    let server = AssetServer::new();
    let first = server
        .named("memory://dedupe")
        .mesh("cube", Geometry::new_box(1.0, 1.0, 1.0))
        .build();
    let second = server
        .named("memory://dedupe")
        .mesh("cube", Geometry::new_box(5.0, 5.0, 5.0))
        .build();

    assert_eq!(first.mesh("cube"), second.mesh("cube"));
    assert_eq!(server.geometries.len(), 1);
}

// ============================================================================
// Resolution Cache
// ============================================================================

#[test]
fn server_resolve_is_idempotent() {
    let server = AssetServer::new();
    let registered = server
        .named("memory://cached")
        .mesh("cube", Geometry::new_box(1.0, 1.0, 1.0))
        .finish();

    let a = server.resolve("memory://cached").unwrap();
    let b = server.resolve("memory://cached").unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &registered));
}

#[test]
fn server_first_registration_wins() {
    let server = AssetServer::new();
    let first = server
        .named("memory://race")
        .mesh("a", Geometry::new_box(1.0, 1.0, 1.0))
        .finish();
    let second = server
        .named("memory://race")
        .mesh("b", Geometry::new_box(1.0, 1.0, 1.0))
        .finish();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(second.mesh("b").is_none());
}

#[test]
fn server_clone_shares_cache() {
    let server = AssetServer::new();
    server
        .named("memory://shared")
        .mesh("cube", Geometry::new_box(1.0, 1.0, 1.0))
        .finish();

    let clone = server.clone();
    assert!(clone.is_resolved("memory://shared"));
}

// ============================================================================
// Failure Modes
// ============================================================================

#[test]
fn server_resolve_missing_file_is_not_found() {
    let server = AssetServer::new();
    let path = std::env::temp_dir().join(format!("{}.glb", Uuid::new_v4()));

    let result = server.resolve(path.to_str().unwrap());

    assert!(matches!(result, Err(Error::Asset(AssetError::NotFound(_)))));
    assert!(!server.is_resolved(path.to_str().unwrap()));
}

#[test]
fn server_resolve_unknown_extension_is_format_error() {
    let server = AssetServer::new();
    let result = server.resolve("keyboard.fbx");
    assert!(matches!(result, Err(Error::Asset(AssetError::Format(_)))));
}

#[test]
fn server_preload_failure_is_silent() {
    let server = AssetServer::new();
    // Fire-and-forget: nothing to observe but the absence of a panic
    server.preload("does/not/exist.glb");
    assert!(!server.is_resolved("does/not/exist.glb"));
}
