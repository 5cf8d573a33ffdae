use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use slotmap::new_key_type;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tokio::runtime::Runtime;

use crate::assets::io::{AssetFormat, AssetReader, FileAssetReader, source_filename};
use crate::assets::provider::{AssetProvider, NamedAssets, NamedAssetsBuilder};
use crate::assets::storage::AssetStorage;
use crate::errors::Result;
use crate::resources::{Geometry, Material};

fn get_asset_runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create asset loader runtime"))
}

// Strongly-typed handles
new_key_type! {
    pub struct GeometryHandle;
    pub struct MaterialHandle;
}

// ============================================================================
// Asset Server
// ============================================================================

/// Shared asset storage plus a per-resource resolution cache.
///
/// Cloning is cheap; clones share storage and cache.
#[derive(Clone)]
pub struct AssetServer {
    pub geometries: Arc<AssetStorage<GeometryHandle, Geometry>>,
    pub materials: Arc<AssetStorage<MaterialHandle, Material>>,

    resolved: Arc<RwLock<FxHashMap<String, Arc<NamedAssets>>>>,
}

impl Default for AssetServer {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetServer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            geometries: Arc::new(AssetStorage::new()),
            materials: Arc::new(AssetStorage::new()),
            resolved: Arc::new(RwLock::new(FxHashMap::default())),
        }
    }

    /// Starts an in-memory named asset set for `resource_id`.
    pub fn named(&self, resource_id: &str) -> NamedAssetsBuilder<'_> {
        NamedAssetsBuilder::new(self, resource_id)
    }

    /// Returns the cached name tables of an already resolved resource.
    #[must_use]
    pub fn get_resolved(&self, resource_id: &str) -> Option<Arc<NamedAssets>> {
        self.resolved.read().get(resource_id).cloned()
    }

    #[must_use]
    pub fn is_resolved(&self, resource_id: &str) -> bool {
        self.resolved.read().contains_key(resource_id)
    }

    /// First writer wins so that concurrent loads converge on one set.
    pub(crate) fn insert_resolved(&self, assets: NamedAssets) -> Arc<NamedAssets> {
        let mut guard = self.resolved.write();
        guard
            .entry(assets.resource_id().to_string())
            .or_insert_with(|| Arc::new(assets))
            .clone()
    }

    #[must_use]
    pub fn get_geometry(&self, handle: GeometryHandle) -> Option<Arc<Geometry>> {
        self.geometries.get(handle)
    }

    #[must_use]
    pub fn get_material(&self, handle: MaterialHandle) -> Option<Arc<Material>> {
        self.materials.get(handle)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Loads and resolves a resource from disk, blocking the calling thread.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`AssetServer::load_async`] there.
    pub fn load(&self, resource_id: &str) -> Result<Arc<NamedAssets>> {
        get_asset_runtime().block_on(self.load_async(resource_id))
    }

    /// Asynchronously loads and resolves a resource from disk.
    pub async fn load_async(&self, resource_id: &str) -> Result<Arc<NamedAssets>> {
        if let Some(assets) = self.get_resolved(resource_id) {
            return Ok(assets);
        }

        let format = AssetFormat::detect(resource_id)?;
        let reader = FileAssetReader::new(resource_id);
        let filename = source_filename(resource_id);

        // 1. IO: Read bytes
        let bytes = reader.read_bytes(filename).await?;

        // 2. Decode on a blocking thread
        let server = self.clone();
        let id = resource_id.to_string();
        let base_path = reader.root_path().to_path_buf();
        let assets = tokio::task::spawn_blocking(move || {
            Self::decode(&server, format, &id, &bytes, &base_path)
        })
        .await??;

        log::info!(
            "Resolved '{}': {} meshes, {} materials ({} geometries stored)",
            resource_id,
            assets.mesh_count(),
            assets.material_count(),
            self.geometries.len()
        );

        Ok(self.insert_resolved(assets))
    }

    fn decode(
        server: &AssetServer,
        format: AssetFormat,
        resource_id: &str,
        bytes: &[u8],
        base_path: &Path,
    ) -> Result<NamedAssets> {
        match format {
            #[cfg(feature = "gltf")]
            AssetFormat::Gltf => {
                crate::assets::loaders::GltfLoader::load_from_slice(server, resource_id, bytes, base_path)
            }
            #[cfg(not(feature = "gltf"))]
            AssetFormat::Gltf => {
                let _ = (server, bytes, base_path);
                Err(crate::errors::Error::Asset(crate::errors::AssetError::Format(format!(
                    "glTF support is disabled; enable the `gltf` feature to load {resource_id}"
                ))))
            }
        }
    }
}

impl AssetProvider for AssetServer {
    fn resolve(&self, resource_id: &str) -> Result<Arc<NamedAssets>> {
        if let Some(assets) = self.get_resolved(resource_id) {
            return Ok(assets);
        }
        self.load(resource_id)
    }

    fn preload(&self, resource_id: &str) {
        if self.is_resolved(resource_id) {
            return;
        }
        let server = self.clone();
        let id = resource_id.to_string();
        get_asset_runtime().spawn(async move {
            if let Err(e) = server.load_async(&id).await {
                log::warn!("Preload of '{id}' failed: {e}");
            }
        });
    }
}
