//! Viewer transform for imported models.

use crate::placement::classify_orientation;
use crate::types::{BoundingBox, Extent};
use glam::{Mat4, Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Rotation, uniform scale and recentring applied to an imported model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub rotation: Quat,
    pub scale: f32,
    pub translation: Vec3,
}

impl ModelTransform {
    /// Stand a flat model upright (thin along Y becomes thin along Z),
    /// scale it, then move the transformed box's centre to the origin.
    pub fn for_bounds(bounds: &BoundingBox, scale: f32) -> Self {
        let upright = classify_orientation(&bounds.extent()).needs_upright();
        let rotation = if upright {
            Quat::from_rotation_x(-FRAC_PI_2)
        } else {
            Quat::IDENTITY
        };

        let unplaced = Self {
            rotation,
            scale,
            translation: Vec3::ZERO,
        };
        let center = Vec3::from(bounds.transformed(&unplaced.to_matrix()).center());

        Self {
            translation: -center,
            ..unplaced
        }
    }

    pub fn is_upright(&self) -> bool {
        self.rotation != Quat::IDENTITY
    }

    /// Translation * rotation * scale.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.translation,
        )
    }

    /// Bounds after the transform.
    pub fn apply(&self, bounds: &BoundingBox) -> BoundingBox {
        bounds.transformed(&self.to_matrix())
    }

    /// Extent after the transform; this is what the texture planes cover.
    pub fn placed_extent(&self, bounds: &BoundingBox) -> Extent {
        self.apply(bounds).extent()
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            scale: 1.0,
            translation: Vec3::ZERO,
        }
    }
}
