//! Export formats for built cards.

pub mod gltf;

pub use gltf::{export_glb, write_glb};
