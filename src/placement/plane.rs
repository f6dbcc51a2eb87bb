//! Texture plane placer.

use super::OrientationResult;
use crate::error::{CardError, Result};
use crate::types::{Axis, Extent, PlaneTransform};
use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};

/// Gap between a plane and the face it covers, in local units.
/// Keeps the two surfaces from z-fighting.
pub const PLANE_EPSILON: f32 = 0.001;

/// Size and transforms of the front and back texture planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPlan {
    pub thin_axis: Axis,
    pub plane_width: f32,
    pub plane_height: f32,
    /// Signed displacement of the front plane along the thin axis.
    pub front_offset: f32,
    /// Always `-front_offset`.
    pub back_offset: f32,
    pub front_rotation: Quat,
    pub back_rotation: Quat,
}

impl PlacementPlan {
    pub fn front_transform(&self) -> PlaneTransform {
        PlaneTransform::new(self.offset_vector(self.front_offset), self.front_rotation)
    }

    pub fn back_transform(&self) -> PlaneTransform {
        PlaneTransform::new(self.offset_vector(self.back_offset), self.back_rotation)
    }

    fn offset_vector(&self, offset: f32) -> Vec3 {
        Vec3::from(self.thin_axis.unit_vector()) * offset
    }
}

/// Place the planes with the default [`PLANE_EPSILON`] gap.
pub fn compute_placement(
    extent: &Extent,
    orientation: &OrientationResult,
) -> Result<PlacementPlan> {
    compute_placement_with_epsilon(extent, orientation, PLANE_EPSILON)
}

/// Place two planes flush on the faces perpendicular to the thin axis.
///
/// Planes start in the X-Y plane facing +Z and are turned onto their face;
/// both use the same unmirrored UV mapping.
pub fn compute_placement_with_epsilon(
    extent: &Extent,
    orientation: &OrientationResult,
    epsilon: f32,
) -> Result<PlacementPlan> {
    extent.validate()?;
    if !(epsilon > 0.0 && epsilon.is_finite()) {
        return Err(CardError::InvalidParameter(format!(
            "plane epsilon must be positive, got {}",
            epsilon
        )));
    }

    let thin_axis = orientation.thin_axis;
    let offset = extent.get(thin_axis) / 2.0 + epsilon;

    let (plane_width, plane_height, front_rotation, back_rotation) = match thin_axis {
        Axis::Z => (
            extent.width,
            extent.height,
            Quat::IDENTITY,
            Quat::from_rotation_y(PI),
        ),
        Axis::X => (
            extent.depth,
            extent.height,
            Quat::from_rotation_y(FRAC_PI_2),
            Quat::from_rotation_y(-FRAC_PI_2),
        ),
        Axis::Y => (
            extent.width,
            extent.depth,
            Quat::from_rotation_x(-FRAC_PI_2),
            Quat::from_rotation_x(FRAC_PI_2),
        ),
    };

    tracing::debug!(
        %thin_axis,
        plane_width,
        plane_height,
        offset,
        "computed texture plane placement"
    );

    Ok(PlacementPlan {
        thin_axis,
        plane_width,
        plane_height,
        front_offset: offset,
        back_offset: -offset,
        front_rotation,
        back_rotation,
    })
}
