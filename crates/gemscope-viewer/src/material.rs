//! Materials
//!
//! Display material parameters assigned to loaded meshes and to the current
//! selection highlight.

/// PBR-style display material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color, linear RGB in 0..=1
    pub base_color: [f32; 3],
    /// Metallic factor
    pub metallic: f32,
    /// Roughness factor
    pub roughness: f32,
    /// Opacity (materials render transparent below 1.0)
    pub opacity: f32,
    /// Double-sided rendering
    pub double_sided: bool,
}

impl Material {
    /// Default gem material: light blue, polished metal look
    pub fn default_gem() -> Self {
        Self {
            base_color: [173.0 / 255.0, 216.0 / 255.0, 230.0 / 255.0],
            metallic: 0.7,
            roughness: 0.3,
            opacity: 0.9,
            double_sided: true,
        }
    }

    /// Selection highlight: default gem parameters with a yellow base color
    pub fn highlight() -> Self {
        Self {
            base_color: [1.0, 1.0, 0.0],
            ..Self::default_gem()
        }
    }

    /// Default gem material tinted with a document draw color (0-255 RGB)
    pub fn from_draw_color(color: [u8; 3]) -> Self {
        Self {
            base_color: [
                color[0] as f32 / 255.0,
                color[1] as f32 / 255.0,
                color[2] as f32 / 255.0,
            ],
            ..Self::default_gem()
        }
    }

    /// Base color as a hex string, e.g. `#add8e6`
    pub fn color_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.base_color[0] * 255.0).round() as u8,
            (self.base_color[1] * 255.0).round() as u8,
            (self.base_color[2] * 255.0).round() as u8,
        )
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::default_gem()
    }
}
