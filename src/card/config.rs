//! Card configuration and material presets.

use crate::error::{CardError, Result};
use crate::placement::PLANE_EPSILON;
use crate::texture::{validate_mask_size, TextureSettings, DEFAULT_MASK_SIZE};
use serde::{Deserialize, Serialize};

/// Surface parameters for one material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    /// Base colour as 0xRRGGBB.
    pub color: u32,
    pub opacity: f32,
    pub transparent: bool,
    pub metalness: f32,
    pub roughness: f32,
    pub env_map_intensity: f32,
    pub double_sided: bool,
}

impl MaterialConfig {
    /// Textured faces of the generated box.
    pub fn face() -> Self {
        Self {
            color: 0xffffff,
            opacity: 1.0,
            transparent: true,
            metalness: 0.15,
            roughness: 0.3,
            env_map_intensity: 0.8,
            double_sided: false,
        }
    }

    /// The four thin sides of the generated box.
    pub fn edge() -> Self {
        Self {
            color: 0xffffff,
            opacity: 0.3,
            transparent: true,
            metalness: 0.1,
            roughness: 0.7,
            env_map_intensity: 1.0,
            double_sided: false,
        }
    }

    /// Texture planes attached to imported models.
    pub fn plane() -> Self {
        Self {
            double_sided: true,
            ..Self::face()
        }
    }

    /// Untextured card shown before any upload.
    pub fn placeholder() -> Self {
        Self {
            color: 0x4a90e2,
            opacity: 0.8,
            transparent: true,
            metalness: 0.2,
            roughness: 0.3,
            env_map_intensity: 0.8,
            double_sided: false,
        }
    }

    /// Linear RGBA factor (opacity in alpha).
    pub fn base_color_factor(&self) -> [f32; 4] {
        let channel = |shift: u32| srgb_to_linear(((self.color >> shift) & 0xff) as f32 / 255.0);
        [channel(16), channel(8), channel(0), self.opacity]
    }

    /// Whether the material needs alpha blending.
    pub fn is_blended(&self) -> bool {
        self.transparent && self.opacity < 1.0
    }

    fn validate(&self, name: &str) -> Result<()> {
        let unit = |v: f32| (0.0..=1.0).contains(&v);
        if !unit(self.opacity) || !unit(self.metalness) || !unit(self.roughness) {
            return Err(CardError::InvalidParameter(format!(
                "{} material: opacity, metalness and roughness must be in [0, 1]",
                name
            )));
        }
        if !(self.env_map_intensity >= 0.0) {
            return Err(CardError::InvalidParameter(format!(
                "{} material: env_map_intensity must be non-negative",
                name
            )));
        }
        Ok(())
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Card building configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Height of the generated card; width follows the front image's aspect ratio.
    pub base_height: f32,
    /// Depth of the generated card.
    pub thickness: f32,
    /// Gap between a texture plane and the surface it covers.
    pub plane_epsilon: f32,
    /// Corner radius of the imported-model mask, as a fraction of its size.
    pub corner_radius: f32,
    /// Mask resolution in pixels.
    pub mask_size: u32,
    /// Uniform scale applied to imported models.
    pub model_scale: f32,
    /// Aspect ratio of the placeholder card (63:88 trading card).
    pub placeholder_aspect: f32,
    pub face_material: MaterialConfig,
    pub edge_material: MaterialConfig,
    pub plane_material: MaterialConfig,
    pub placeholder_material: MaterialConfig,
    /// Sampling for images on the generated box.
    pub face_texture: TextureSettings,
    /// Sampling for images on imported-model planes.
    pub plane_texture: TextureSettings,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            base_height: 4.0,
            thickness: 0.05,
            plane_epsilon: PLANE_EPSILON,
            corner_radius: 0.03,
            mask_size: DEFAULT_MASK_SIZE,
            model_scale: 3.5,
            placeholder_aspect: 0.716,
            face_material: MaterialConfig::face(),
            edge_material: MaterialConfig::edge(),
            plane_material: MaterialConfig::plane(),
            placeholder_material: MaterialConfig::placeholder(),
            face_texture: TextureSettings::default(),
            plane_texture: TextureSettings::for_plane(),
        }
    }
}

impl CardConfig {
    pub fn with_base_height(mut self, height: f32) -> Self {
        self.base_height = height;
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_mask_size(mut self, size: u32) -> Self {
        self.mask_size = size;
        self
    }

    pub fn with_model_scale(mut self, scale: f32) -> Self {
        self.model_scale = scale;
        self
    }

    /// Load a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make geometry or masks meaningless.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("base_height", self.base_height),
            ("thickness", self.thickness),
            ("plane_epsilon", self.plane_epsilon),
            ("model_scale", self.model_scale),
            ("placeholder_aspect", self.placeholder_aspect),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(CardError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(self.corner_radius > 0.0 && self.corner_radius <= 0.5) {
            return Err(CardError::InvalidParameter(format!(
                "corner_radius must be in (0, 0.5], got {}",
                self.corner_radius
            )));
        }
        validate_mask_size(self.mask_size)?;

        self.face_material.validate("face")?;
        self.edge_material.validate("edge")?;
        self.plane_material.validate("plane")?;
        self.placeholder_material.validate("placeholder")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_config_is_valid() {
        let config = CardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_height, 4.0);
        assert_eq!(config.mask_size, 512);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = [
            CardConfig::default().with_base_height(0.0),
            CardConfig::default().with_thickness(f32::NAN),
            CardConfig::default().with_corner_radius(0.6),
            CardConfig::default().with_mask_size(0),
            CardConfig::default().with_mask_size(65536),
            CardConfig::default().with_model_scale(-1.0),
        ];
        for config in bad {
            assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{ "base_height": 6.0, "corner_radius": 0.1 }"#;
        let config = CardConfig::from_json(json).unwrap();
        assert_eq!(config.base_height, 6.0);
        assert_eq!(config.corner_radius, 0.1);
        assert_eq!(config.thickness, 0.05);
        assert!(CardConfig::from_json(r#"{ "thickness": -1.0 }"#).is_err());
        assert!(CardConfig::from_json(r#"{ "mask_size": 65536 }"#).is_err());
    }

    #[test]
    fn test_material_presets() {
        assert!(MaterialConfig::plane().double_sided);
        assert!(!MaterialConfig::face().is_blended());
        assert!(MaterialConfig::edge().is_blended());

        let white = MaterialConfig::face().base_color_factor();
        assert_eq!(white, [1.0, 1.0, 1.0, 1.0]);
        let blue = MaterialConfig::placeholder().base_color_factor();
        assert!(blue[2] > blue[0]);
        assert_eq!(blue[3], 0.8);
    }
}
