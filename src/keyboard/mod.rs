//! Keyboard component
//!
//! Mounts a mechanical keyboard model into a [`Scene`](crate::scene::Scene)
//! and exposes stable handles to its rows, keys and structural parts so host
//! code can animate them.
//!
//! - [`layout`]: static physical layout and asset naming
//! - [`composer`]: builds the node tree from resolved assets
//! - [`handles`]: slot table and the published handles container
//! - [`rig`]: the component instance tying the above together

pub mod composer;
pub mod handles;
pub mod layout;
pub mod rig;
pub mod settings;

pub use composer::{ComposeReport, Composition, MissingAsset, SkippedNode, compose};
pub use handles::{HandleTable, KeyboardHandles, RowHandles, Slot, SwitchComponents, SwitchPart};
pub use layout::{KEY_PITCH, KeyboardLayout, Row};
pub use rig::KeyboardRig;
pub use settings::{GroupProps, RigSettings};

use crate::assets::AssetProvider;

/// Starts loading `resource_id` ahead of the first render.
///
/// Fire-and-forget: a later [`KeyboardRig::render`] behaves the same whether
/// or not this was called.
pub fn preload(provider: &dyn AssetProvider, resource_id: &str) {
    log::debug!("Preloading '{resource_id}'");
    provider.preload(resource_id);
}
