//! Bounding-box orientation classifier.

use crate::types::{Axis, Extent};

/// Axes of an extent sorted by magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationResult {
    /// Axis with the smallest magnitude; the card's face normal.
    pub thin_axis: Axis,
    /// `(axis, magnitude)` ascending by magnitude. `sorted_axes[0].0 == thin_axis`.
    pub sorted_axes: [(Axis, f32); 3],
}

impl OrientationResult {
    /// Magnitude along the thin axis.
    pub fn thin_magnitude(&self) -> f32 {
        self.sorted_axes[0].1
    }

    /// Axis with the largest magnitude.
    pub fn long_axis(&self) -> Axis {
        self.sorted_axes[2].0
    }

    /// A model lying flat (thin along the up axis) must be stood upright
    /// with a quarter turn about X before texturing.
    pub fn needs_upright(&self) -> bool {
        self.thin_axis == Axis::Y
    }
}

/// Sort the three axes of `extent` ascending by magnitude.
///
/// Equal magnitudes keep [`Axis::TIE_BREAK_ORDER`] (Z, X, Y), so a cube is
/// thin along Z.
pub fn classify_orientation(extent: &Extent) -> OrientationResult {
    let mut sorted_axes = Axis::TIE_BREAK_ORDER.map(|axis| (axis, extent.get(axis)));
    // Stable sort; total_cmp keeps NaN from scrambling the order.
    sorted_axes.sort_by(|a, b| a.1.total_cmp(&b.1));

    OrientationResult {
        thin_axis: sorted_axes[0].0,
        sorted_axes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_magnitudes_pick_argmin() {
        let cases = [
            (Extent::new(2.0, 4.0, 0.05), Axis::Z),
            (Extent::new(0.1, 3.0, 2.0), Axis::X),
            (Extent::new(5.0, 1.0, 4.0), Axis::Y),
        ];
        for (extent, expected) in cases {
            let result = classify_orientation(&extent);
            assert_eq!(result.thin_axis, expected);
            assert_eq!(classify_orientation(&extent), result);
        }
    }

    #[test]
    fn test_sorted_ascending() {
        let result = classify_orientation(&Extent::new(3.0, 1.0, 2.0));
        let axes: Vec<Axis> = result.sorted_axes.iter().map(|(a, _)| *a).collect();
        assert_eq!(axes, vec![Axis::Y, Axis::Z, Axis::X]);
        assert_eq!(result.thin_magnitude(), 1.0);
        assert_eq!(result.long_axis(), Axis::X);
    }

    #[test]
    fn test_cube_tie_breaks_to_z() {
        let result = classify_orientation(&Extent::new(1.0, 1.0, 1.0));
        assert_eq!(result.thin_axis, Axis::Z);
        let axes: Vec<Axis> = result.sorted_axes.iter().map(|(a, _)| *a).collect();
        assert_eq!(axes, vec![Axis::Z, Axis::X, Axis::Y]);
    }

    #[test]
    fn test_partial_ties() {
        // X and Y tie below Z: X wins.
        assert_eq!(classify_orientation(&Extent::new(1.0, 1.0, 2.0)).thin_axis, Axis::X);
        // Z and Y tie below X: Z wins.
        assert_eq!(classify_orientation(&Extent::new(2.0, 1.0, 1.0)).thin_axis, Axis::Z);
    }

    #[test]
    fn test_flat_slab_needs_upright() {
        let result = classify_orientation(&Extent::new(5.0, 1.0, 5.0));
        assert_eq!(result.thin_axis, Axis::Y);
        assert!(result.needs_upright());
        assert!(!classify_orientation(&Extent::new(5.0, 5.0, 1.0)).needs_upright());
    }
}
