//! Triangle meshes for the card body and texture planes.

pub mod geometry;
pub mod primitives;

pub use geometry::{Mesh, Vertex};
pub use primitives::{box_face, box_faces, plane, BoxFace};
