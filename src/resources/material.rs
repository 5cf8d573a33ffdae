use glam::{Vec3, Vec4};

/// Which faces of a mesh are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// How the alpha channel of the base color is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask(f32),
    Blend,
}

/// Surface appearance shared by any number of mesh instances.
///
/// Only the metallic-roughness factors exported by the authoring tool are
/// carried; textures and shading models belong to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub color: Vec4,
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: Vec3,
    pub side: Side,
    pub alpha_mode: AlphaMode,
}

impl Material {
    #[must_use]
    pub fn new(color: Vec4) -> Self {
        Self {
            name: None,
            color,
            metalness: 0.0,
            roughness: 1.0,
            emissive: Vec3::ZERO,
            side: Side::Front,
            alpha_mode: AlphaMode::Opaque,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    #[must_use]
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    #[inline]
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.color.w
    }

    #[inline]
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        matches!(self.alpha_mode, AlphaMode::Blend)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}
