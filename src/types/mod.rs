//! Shared types used throughout the library.

mod axis;
mod transform;

pub use axis::Axis;
pub use transform::PlaneTransform;

use crate::error::{CardError, Result};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Dimensions of an axis-aligned bounding box in a mesh's local space.
///
/// `width` runs along X, `height` along Y and `depth` along Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    pub fn from_array(dims: [f32; 3]) -> Self {
        Self::new(dims[0], dims[1], dims[2])
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.width, self.height, self.depth]
    }

    /// Magnitude along one axis.
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
            Axis::Z => self.depth,
        }
    }

    /// True if any dimension is zero, negative or not finite.
    pub fn is_degenerate(&self) -> bool {
        self.to_array().iter().any(|d| !d.is_finite() || *d <= 0.0)
    }

    /// Reject degenerate extents.
    pub fn validate(&self) -> Result<()> {
        if self.is_degenerate() {
            return Err(CardError::DegenerateExtent(self.to_array()));
        }
        Ok(())
    }

    /// Uniformly scaled copy.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor, self.depth * factor)
    }
}

impl From<[f32; 3]> for Extent {
    fn from(dims: [f32; 3]) -> Self {
        Self::from_array(dims)
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// Box of the given extent centred on the origin.
    pub fn centered(extent: Extent) -> Self {
        let half = Vec3::from(extent.to_array()) * 0.5;
        Self::new((-half).to_array(), half.to_array())
    }

    pub fn from_points(points: impl Iterator<Item = [f32; 3]>) -> Option<Self> {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        let mut has_points = false;

        for p in points {
            has_points = true;
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        if has_points {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn dimensions(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn extent(&self) -> Extent {
        Extent::from_array(self.dimensions())
    }

    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> Self {
        let mut min = self.min;
        let mut max = self.max;
        for i in 0..3 {
            min[i] = min[i].min(other.min[i]);
            max[i] = max[i].max(other.max[i]);
        }
        Self { min, max }
    }

    /// The eight corner points.
    pub fn corners(&self) -> [[f32; 3]; 8] {
        let (a, b) = (self.min, self.max);
        [
            [a[0], a[1], a[2]],
            [b[0], a[1], a[2]],
            [a[0], b[1], a[2]],
            [b[0], b[1], a[2]],
            [a[0], a[1], b[2]],
            [b[0], a[1], b[2]],
            [a[0], b[1], b[2]],
            [b[0], b[1], b[2]],
        ]
    }

    /// Axis-aligned box around this box after an affine transform.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self.corners();
        // Eight corners always yield a box.
        Self::from_points(
            corners
                .iter()
                .map(|c| matrix.transform_point3(Vec3::from(*c)).to_array()),
        )
        .unwrap_or(*self)
    }
}
