pub mod io;
pub mod loaders;
pub mod provider;
pub mod server;
pub mod storage;

pub use provider::{AssetKind, AssetProvider, NamedAssets, NamedAssetsBuilder, asset_uuid};
pub use server::{AssetServer, GeometryHandle, MaterialHandle};
pub use storage::AssetStorage;

#[cfg(feature = "gltf")]
pub use loaders::GltfLoader;
