//! Texture sampling settings and UV transforms.

use glam::{Mat3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Texture coordinate wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

/// Minification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinFilter {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

/// Magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagFilter {
    Nearest,
    Linear,
}

/// How a face image is sampled: orientation tweaks plus filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    /// Rotation about the UV centre, in radians.
    pub rotation: f32,
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,
    pub anisotropy: u8,
    /// Colour data is sRGB encoded.
    pub srgb: bool,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
            wrap_s: WrapMode::ClampToEdge,
            wrap_t: WrapMode::ClampToEdge,
            min_filter: MinFilter::LinearMipmapLinear,
            mag_filter: MagFilter::Linear,
            anisotropy: 16,
            srgb: true,
        }
    }
}

impl TextureSettings {
    /// Settings for a texture plane on an imported model.
    pub fn for_plane() -> Self {
        Self {
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    /// Flipping switches both axes to repeat wrapping so the mirrored
    /// range [-1, 0] maps back onto the image.
    pub fn with_flip(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        if flip_x || flip_y {
            self.wrap_s = WrapMode::Repeat;
            self.wrap_t = WrapMode::Repeat;
        }
        self
    }

    /// Per-axis (repeat, offset) pair.
    pub fn repeat_offset(&self) -> ([f32; 2], [f32; 2]) {
        let (rx, ox) = if self.flip_x { (-1.0, 1.0) } else { (1.0, 0.0) };
        let (ry, oy) = if self.flip_y { (-1.0, 1.0) } else { (1.0, 0.0) };
        ([rx, ry], [ox, oy])
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == 0.0 && !self.flip_x && !self.flip_y
    }

    /// UV matrix combining repeat, offset and rotation about the centre.
    pub fn uv_transform(&self) -> Mat3 {
        let ([sx, sy], [tx, ty]) = self.repeat_offset();
        let (cx, cy) = if self.rotation != 0.0 { (0.5, 0.5) } else { (0.0, 0.0) };
        let (s, c) = self.rotation.sin_cos();

        Mat3::from_cols(
            Vec3::new(sx * c, -sy * s, 0.0),
            Vec3::new(sx * s, sy * c, 0.0),
            Vec3::new(
                -sx * (c * cx + s * cy) + cx + tx,
                -sy * (-s * cx + c * cy) + cy + ty,
                1.0,
            ),
        )
    }

    pub fn apply(&self, uv: [f32; 2]) -> [f32; 2] {
        if self.is_identity() {
            return uv;
        }
        self.uv_transform().transform_point2(Vec2::from(uv)).to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5
    }

    #[test]
    fn test_identity_passthrough() {
        let settings = TextureSettings::default();
        assert!(settings.is_identity());
        assert_eq!(settings.apply([0.3, 0.7]), [0.3, 0.7]);
        assert_eq!(settings.wrap_s, WrapMode::ClampToEdge);
    }

    #[test]
    fn test_flip_x() {
        let settings = TextureSettings::default().with_flip(true, false);
        assert!(close(settings.apply([0.25, 0.5]), [0.75, 0.5]));
        assert_eq!(settings.wrap_s, WrapMode::Repeat);
        assert_eq!(settings.wrap_t, WrapMode::Repeat);
    }

    #[test]
    fn test_flip_y() {
        let settings = TextureSettings::default().with_flip(false, true);
        assert!(close(settings.apply([0.25, 0.1]), [0.25, 0.9]));
    }

    #[test]
    fn test_rotation_about_centre() {
        let settings = TextureSettings::default().with_rotation(PI);
        assert!(close(settings.apply([0.0, 0.0]), [1.0, 1.0]));
        assert!(close(settings.apply([0.5, 0.5]), [0.5, 0.5]));
    }

    #[test]
    fn test_plane_settings_repeat() {
        let settings = TextureSettings::for_plane();
        assert_eq!(settings.wrap_s, WrapMode::Repeat);
        assert_eq!(settings.min_filter, MinFilter::LinearMipmapLinear);
        assert!(settings.is_identity());
    }
}
