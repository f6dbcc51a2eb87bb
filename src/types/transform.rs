//! Rigid transforms for texture planes.

use glam::{Quat, Vec3};

/// Position and orientation of a plane relative to the card origin.
///
/// Planes are authored in the X-Y plane facing +Z; the rotation turns that
/// normal onto the face they cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl PlaneTransform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Outward normal of the plane after rotation.
    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

impl Default for PlaneTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_normal_follows_rotation() {
        let t = PlaneTransform::new(Vec3::new(0.5, 0.0, 0.0), Quat::from_rotation_y(FRAC_PI_2));
        assert!(t.normal().abs_diff_eq(Vec3::X, 1e-6));
    }
}
