use crate::assets::{GeometryHandle, MaterialHandle};

/// A placed copy of one named geometry with one named material.
///
/// Stored as a component of a scene node; the node carries the transform.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,

    // === Asset references ===
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,

    // === Instance render settings ===
    pub visible: bool,
    pub cast_shadows: bool,
    pub receive_shadows: bool,

    /// Draw order hint for the renderer.
    pub render_order: i32,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: GeometryHandle, material: MaterialHandle) -> Self {
        Self {
            name: "Mesh".to_string(),
            geometry,
            material,
            visible: true,
            cast_shadows: false,
            receive_shadows: false,
            render_order: 0,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    #[must_use]
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadows = cast;
        self.receive_shadows = receive;
        self
    }
}
