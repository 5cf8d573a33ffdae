//! Resource definitions
//!
//! Plain data consumed by the scene and the renderer:
//! - Geometry: named mesh payload and its bounds
//! - Material: named surface appearance
//! - Mesh: one geometry + one material placed on a node

pub mod geometry;
pub mod material;
pub mod mesh;

pub use geometry::{BoundingBox, Geometry};
pub use material::{AlphaMode, Material, Side};
pub use mesh::Mesh;
