//! Construction-time configuration of a [`KeyboardRig`].
//!
//! Both structs deserialize from JSON with every field optional.
//!
//! [`KeyboardRig`]: crate::keyboard::KeyboardRig

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::keyboard::layout::KeyboardLayout;
use crate::scene::Transform;

/// Keys given an individual slot unless configured otherwise.
pub const DEFAULT_BOUND_KEYS: [&str; 7] = ["esc", "f1", "f2", "f3", "f4", "f5", "f6"];

/// Which parts of the keyboard get individual handles, plus render flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // any missing field will be set to the struct's default
pub struct RigSettings {
    /// Keys bound in `keys`. All other keys are reachable through their row.
    pub bound_keys: Vec<String>,
    /// Keys whose switch parts are bound in `switch_components`.
    /// Empty disables the capability.
    pub switch_component_keys: Vec<String>,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
    /// Build the legend overlay under the `extrude` group.
    pub legends: bool,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            bound_keys: DEFAULT_BOUND_KEYS.iter().map(ToString::to_string).collect(),
            switch_component_keys: Vec::new(),
            cast_shadows: true,
            receive_shadows: true,
            legends: true,
        }
    }
}

impl RigSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.normalize();
        Ok(settings)
    }

    /// Lower-cases key names and drops duplicates, keeping first occurrence.
    pub fn normalize(&mut self) {
        normalize_keys(&mut self.bound_keys);
        normalize_keys(&mut self.switch_component_keys);
    }

    #[must_use]
    pub fn binds_key(&self, key: &str) -> bool {
        self.bound_keys.iter().any(|k| k == key)
    }

    #[must_use]
    pub fn binds_switch_components(&self, key: &str) -> bool {
        self.switch_component_keys.iter().any(|k| k == key)
    }

    #[must_use]
    pub fn switch_components_enabled(&self) -> bool {
        !self.switch_component_keys.is_empty()
    }

    /// Configured key names the layout does not know.
    #[must_use]
    pub fn unknown_keys<'a>(&'a self, layout: &KeyboardLayout) -> Vec<&'a str> {
        self.bound_keys
            .iter()
            .chain(&self.switch_component_keys)
            .map(String::as_str)
            .filter(|k| !layout.contains_key(k))
            .collect()
    }
}

fn normalize_keys(keys: &mut Vec<String>) {
    let mut seen = Vec::with_capacity(keys.len());
    keys.retain_mut(|k| {
        *k = k.trim().to_ascii_lowercase();
        if seen.contains(k) {
            false
        } else {
            seen.push(k.clone());
            true
        }
    });
}

/// Pass-through properties applied verbatim to the top-level container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupProps {
    pub position: Vec3,
    /// XYZ Euler angles in radians. `None` means identity.
    pub rotation: Option<Vec3>,
    pub scale: Vec3,
    pub visible: bool,
}

impl Default for GroupProps {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: None,
            scale: Vec3::ONE,
            visible: true,
        }
    }
}

impl GroupProps {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        let mut transform = Transform::from_placement(self.position, self.rotation);
        transform.scale = self.scale;
        transform
    }
}
