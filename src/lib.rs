#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Mechanical keyboard scene rig.
//!
//! Resolves a keyboard model into named meshes and materials, composes it
//! into a scene graph following the board's physical layout, and exposes
//! stable handles (rows, keys, structural parts) for host-driven animation.

pub mod assets;
pub mod errors;
pub mod keyboard;
pub mod resources;
pub mod scene;

pub use assets::{AssetProvider, AssetServer, NamedAssets};
pub use errors::{AssetError, Error, Result, SceneError};
pub use keyboard::{GroupProps, KeyboardHandles, KeyboardRig, RigSettings, Row, preload};
pub use resources::{Geometry, Material, Mesh};
pub use scene::{Node, NodeHandle, Scene, Transform};
