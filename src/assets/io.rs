use std::path::{Path, PathBuf};

use crate::errors::{AssetError, Error, Result};

/// Asset reader trait
/// Supports asynchronous reading of resource bytes.
pub trait AssetReader: Send + Sync {
    /// Asynchronously reads a resource's byte stream.
    fn read_bytes(&self, uri: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Local file reader rooted at the directory of the requested resource.
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_dir() {
            path.to_path_buf()
        } else {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl AssetReader for FileAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::Asset(
                AssetError::NotFound(path.display().to_string()),
            )),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Container formats the asset server knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    /// `.gltf` (JSON) or `.glb` (binary) scene
    Gltf,
}

impl AssetFormat {
    /// Picks a format from the resource identifier's extension.
    pub fn detect(resource_id: &str) -> Result<Self> {
        let extension = Path::new(resource_id)
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("gltf" | "glb") => Ok(Self::Gltf),
            Some(other) => Err(Error::Asset(AssetError::Format(format!(
                "Unsupported asset extension '.{other}' for {resource_id}"
            )))),
            None => Err(Error::Asset(AssetError::Format(format!(
                "Cannot infer asset format of {resource_id}"
            )))),
        }
    }
}

/// Returns the file-name part of a resource identifier.
pub fn source_filename(source: &str) -> &str {
    Path::new(source)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(source)
}
