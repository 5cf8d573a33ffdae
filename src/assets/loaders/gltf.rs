//! glTF / GLB loader
//!
//! Walks a parsed glTF document and registers:
//! - one named mesh asset per named node that carries a mesh
//!   (all primitives of that mesh merged into one [`Geometry`])
//! - one named material asset per material
//!
//! Node transforms and the document hierarchy are not imported: placement
//! belongs to the keyboard layout, the asset only supplies names.

use std::path::Path;

use base64::Engine;
use glam::{Vec3, Vec4};

use crate::assets::provider::{NamedAssets, NamedAssetsBuilder};
use crate::assets::server::AssetServer;
use crate::errors::{AssetError, Error, Result};
use crate::resources::material::{AlphaMode, Side};
use crate::resources::{Geometry, Material};

pub struct GltfLoader;

impl GltfLoader {
    /// Entry point: decodes `.gltf` or `.glb` bytes.
    ///
    /// External buffers are resolved relative to `base_path`.
    pub fn load_from_slice(
        server: &AssetServer,
        resource_id: &str,
        bytes: &[u8],
        base_path: &Path,
    ) -> Result<NamedAssets> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let buffers = Self::load_buffers(&gltf, base_path)?;

        let unsupported: Vec<_> = gltf.extensions_required().collect();
        if !unsupported.is_empty() {
            log::warn!("'{resource_id}' requires extensions that are ignored: {unsupported:?}");
        }

        let mut builder = server.named(resource_id);
        Self::load_materials(&gltf, &mut builder);
        Self::load_meshes(&gltf, &buffers, &mut builder);

        Ok(builder.build())
    }

    // --- Helpers ---

    fn load_buffers(gltf: &gltf::Gltf, base_path: &Path) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            match buffer.source() {
                gltf::buffer::Source::Bin => {
                    let Some(blob) = gltf.blob.as_deref() else {
                        return Err(Error::Asset(AssetError::InvalidData(
                            "Missing GLB binary chunk".to_string(),
                        )));
                    };
                    buffer_data.push(blob.to_vec());
                }
                gltf::buffer::Source::Uri(uri) => {
                    buffer_data.push(Self::read_uri(uri, base_path)?);
                }
            }
        }
        Ok(buffer_data)
    }

    fn read_uri(uri: &str, base_path: &Path) -> Result<Vec<u8>> {
        if let Some(rest) = uri.strip_prefix("data:") {
            let Some((_, payload)) = rest.split_once(";base64,") else {
                return Err(Error::Asset(AssetError::Format(
                    "Only base64 data URIs are supported".to_string(),
                )));
            };
            return Ok(base64::engine::general_purpose::STANDARD.decode(payload)?);
        }

        let path = base_path.join(uri);
        std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Asset(AssetError::NotFound(path.display().to_string()))
            } else {
                Error::Io(e)
            }
        })
    }

    // --- Loading Logic ---

    fn load_materials(gltf: &gltf::Gltf, builder: &mut NamedAssetsBuilder<'_>) {
        for material in gltf.materials() {
            let Some(index) = material.index() else {
                continue;
            };
            let name = material
                .name()
                .map_or_else(|| format!("material_{index}"), str::to_string);

            let pbr = material.pbr_metallic_roughness();
            let mut engine_mat = Material::new(Vec4::from_array(pbr.base_color_factor()))
                .with_name(&name)
                .with_metalness(pbr.metallic_factor())
                .with_roughness(pbr.roughness_factor());
            engine_mat.emissive = Vec3::from_array(material.emissive_factor());
            engine_mat.side = if material.double_sided() {
                Side::Double
            } else {
                Side::Front
            };
            engine_mat.alpha_mode = match material.alpha_mode() {
                gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
                gltf::material::AlphaMode::Mask => {
                    AlphaMode::Mask(material.alpha_cutoff().unwrap_or(0.5))
                }
                gltf::material::AlphaMode::Blend => AlphaMode::Blend,
            };

            builder.add_material(&name, engine_mat);
        }
    }

    fn load_meshes(gltf: &gltf::Gltf, buffers: &[Vec<u8>], builder: &mut NamedAssetsBuilder<'_>) {
        for node in gltf.nodes() {
            let Some(mesh) = node.mesh() else {
                continue;
            };
            let Some(name) = node.name().or_else(|| mesh.name()) else {
                log::debug!("Skipping unnamed mesh node #{}", node.index());
                continue;
            };

            let geometry = Self::load_mesh_geometry(name, &mesh, buffers);
            builder.add_mesh(name, geometry);
        }
    }

    /// Merges every primitive of `mesh` into one indexed geometry.
    fn load_mesh_geometry(name: &str, mesh: &gltf::Mesh<'_>, buffers: &[Vec<u8>]) -> Geometry {
        let mut geometry = Geometry::new(Some(name));
        let mut indices: Vec<u32> = Vec::new();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let base = geometry.positions.len() as u32;
            geometry.positions.extend(positions.map(Vec3::from_array));
            let added = geometry.positions.len() as u32 - base;

            if let Some(normals) = reader.read_normals() {
                geometry.normals.extend(normals.map(Vec3::from_array));
            }

            match reader.read_indices() {
                Some(read) => indices.extend(read.into_u32().map(|i| base + i)),
                None => indices.extend(base..base + added),
            }
        }

        // Normals are only meaningful when every primitive supplied them.
        if geometry.normals.len() != geometry.positions.len() {
            geometry.normals.clear();
        }
        if !indices.is_empty() {
            geometry.indices = Some(indices);
        }
        geometry
    }
}
