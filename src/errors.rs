//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`Error`] covers every failure mode:
//! - Asset resolution and decoding errors ([`AssetError`])
//! - Scene hierarchy errors ([`SceneError`])
//! - File I/O and JSON configuration errors
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`.
//!
//! ```rust,ignore
//! use keyrig::errors::Result;
//!
//! fn mount() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Errors raised while resolving a resource identifier into named assets.
#[derive(Error, Debug)]
pub enum AssetError {
    /// The resource identifier could not be resolved.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The resource exists but its format could not be decoded.
    #[error("Asset format error: {0}")]
    Format(String),

    /// The resource decoded but its content is unusable.
    #[error("Invalid asset data: {0}")]
    InvalidData(String),
}

/// Errors raised by scene hierarchy operations.
#[derive(Error, Debug)]
pub enum SceneError {
    /// A node handle no longer refers to a live node.
    #[error("Stale node handle")]
    StaleHandle,

    /// The requested attachment would break the tree invariant.
    #[error("Attaching {child} under {parent} would create a cycle")]
    Cycle {
        /// Name of the node being attached
        child: String,
        /// Name of the requested parent
        parent: String,
    },
}

/// The main error type for the keyboard rig.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// Asset resolution or decoding failure.
    #[error(transparent)]
    Asset(#[from] AssetError),

    // ========================================================================
    // Scene Errors
    // ========================================================================
    /// Scene hierarchy failure.
    #[error(transparent)]
    Scene(#[from] SceneError),

    // ========================================================================
    // I/O & Configuration Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error (embedded buffers).
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Background load task failed to complete.
    #[error("Task join error: {0}")]
    TaskJoin(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

#[cfg(feature = "gltf")]
impl From<gltf::Error> for Error {
    fn from(err: gltf::Error) -> Self {
        Error::Asset(AssetError::Format(format!("glTF: {err}")))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::TaskJoin(err.to_string())
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
