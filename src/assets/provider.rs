//! Asset Provider contract
//!
//! A provider turns a resource identifier into [`NamedAssets`]: two lookup
//! tables from the semantic names authored in the source asset to stored
//! geometry and material handles.
//!
//! Resolution must be idempotent for a given identifier. The composer treats
//! a resolved set as read-only and never mutates asset content.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::assets::server::{AssetServer, GeometryHandle, MaterialHandle};
use crate::errors::Result;
use crate::resources::{Geometry, Material};

/// Source of named meshes and materials.
pub trait AssetProvider {
    /// Resolves `resource_id`, blocking until the asset is available.
    fn resolve(&self, resource_id: &str) -> Result<Arc<NamedAssets>>;

    /// Starts resolving `resource_id` ahead of first use.
    ///
    /// Fire-and-forget: the outcome is not reported to the caller. The
    /// default implementation resolves eagerly and discards the result.
    fn preload(&self, resource_id: &str) {
        if let Err(e) = self.resolve(resource_id) {
            log::warn!("Preload of '{resource_id}' failed: {e}");
        }
    }
}

/// Which table an asset name belongs to. Part of the dedup UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Mesh,
    Material,
}

impl AssetKind {
    fn as_str(self) -> &'static str {
        match self {
            AssetKind::Mesh => "mesh",
            AssetKind::Material => "material",
        }
    }
}

/// Stable identity of a named asset inside one resource.
#[must_use]
pub fn asset_uuid(resource_id: &str, kind: AssetKind, name: &str) -> Uuid {
    let key = format!("{resource_id}#{}/{name}", kind.as_str());
    Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
}

/// Name tables produced by resolving one resource.
#[derive(Debug, Clone, Default)]
pub struct NamedAssets {
    resource_id: String,
    meshes: FxHashMap<String, GeometryHandle>,
    materials: FxHashMap<String, MaterialHandle>,
}

impl NamedAssets {
    #[must_use]
    pub fn new(resource_id: &str) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            ..Default::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    #[inline]
    #[must_use]
    pub fn mesh(&self, name: &str) -> Option<GeometryHandle> {
        self.meshes.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn material(&self, name: &str) -> Option<MaterialHandle> {
        self.materials.get(name).copied()
    }

    pub fn mesh_names(&self) -> impl Iterator<Item = &str> {
        self.meshes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub(crate) fn insert_mesh(&mut self, name: &str, handle: GeometryHandle) {
        self.meshes.insert(name.to_string(), handle);
    }

    pub(crate) fn insert_material(&mut self, name: &str, handle: MaterialHandle) {
        self.materials.insert(name.to_string(), handle);
    }
}

/// Registers geometry and materials into an [`AssetServer`] under one
/// resource identifier.
///
/// Used by loaders and by hosts that build geometry in memory.
///
/// ```rust,ignore
/// let assets = server
///     .named("memory://keyboard")
///     .mesh("keycap_esc", Geometry::new_box(0.018, 0.008, 0.018))
///     .material("keycap", Material::default())
///     .finish();
/// ```
pub struct NamedAssetsBuilder<'a> {
    server: &'a AssetServer,
    assets: NamedAssets,
}

impl<'a> NamedAssetsBuilder<'a> {
    pub(crate) fn new(server: &'a AssetServer, resource_id: &str) -> Self {
        Self {
            server,
            assets: NamedAssets::new(resource_id),
        }
    }

    /// Adds a named mesh asset. A repeated name keeps the first geometry.
    #[must_use]
    pub fn mesh(mut self, name: &str, geometry: Geometry) -> Self {
        self.add_mesh(name, geometry);
        self
    }

    /// Adds a named material asset. A repeated name keeps the first material.
    #[must_use]
    pub fn material(mut self, name: &str, material: Material) -> Self {
        self.add_material(name, material);
        self
    }

    pub fn add_mesh(&mut self, name: &str, geometry: Geometry) -> GeometryHandle {
        let uuid = asset_uuid(&self.assets.resource_id, AssetKind::Mesh, name);
        let handle = self.server.geometries.insert_unique(uuid, geometry);
        self.assets.insert_mesh(name, handle);
        handle
    }

    pub fn add_material(&mut self, name: &str, material: Material) -> MaterialHandle {
        let uuid = asset_uuid(&self.assets.resource_id, AssetKind::Material, name);
        let handle = self.server.materials.insert_unique(uuid, material);
        self.assets.insert_material(name, handle);
        handle
    }

    /// Returns the name tables without publishing them.
    #[must_use]
    pub fn build(self) -> NamedAssets {
        self.assets
    }

    /// Publishes the name tables in the server's resolution cache.
    ///
    /// If the resource was already resolved the cached set wins and is
    /// returned instead.
    pub fn finish(self) -> Arc<NamedAssets> {
        let server = self.server;
        server.insert_resolved(self.assets)
    }
}
