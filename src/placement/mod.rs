//! Orientation classification and texture plane placement.
//!
//! Given the extent of a card-like mesh, [`classify_orientation`] finds the
//! thin axis (the face normal of the card) and [`compute_placement`] derives
//! two planes sitting flush on the opposite faces along that axis.

mod orientation;
mod plane;

pub use orientation::{classify_orientation, OrientationResult};
pub use plane::{compute_placement, compute_placement_with_epsilon, PlacementPlan, PLANE_EPSILON};
