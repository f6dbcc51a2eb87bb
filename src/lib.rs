//! # Card Mesher
//!
//! A Rust library for turning uploaded card images into a 3D card scene.
//!
//! ## Overview
//!
//! Given a front image (and optionally a back image and a glTF/GLB model),
//! this library builds a [`TexturedCard`]: either a generated rounded box
//! with the images on its faces, or an imported model with two textured
//! planes laid flush against its thin faces. The result can be inspected,
//! spun with a [`RotationController`], and exported as GLB.
//!
//! ## Quick Start
//!
//! ```ignore
//! use card_mesher::{CardBuilder, CardRequest, export_glb};
//!
//! let front = std::fs::read("front.png")?;
//! let model = std::fs::read("card.glb")?;
//!
//! let mut builder = CardBuilder::new();
//! let card = builder.build(&CardRequest::new(&front).with_model(&model))?;
//!
//! let glb_bytes = export_glb(&card)?;
//! ```
//!
//! ## Host Integration
//!
//! Renderers implement [`CardHost`] and hand it to a [`CardSlot`], which
//! detaches and releases the previous card whenever a new one is shown:
//!
//! ```ignore
//! use card_mesher::{CardSlot, CardHost, TexturedCard};
//!
//! struct Scene;
//! impl CardHost for Scene {
//!     fn attach(&mut self, card: &TexturedCard) { /* upload meshes */ }
//!     fn detach(&mut self, card: &TexturedCard) { /* free GPU resources */ }
//! }
//!
//! let mut slot = CardSlot::new(Scene);
//! slot.show(card)?;
//! ```

pub mod error;
pub mod types;
pub mod texture;
pub mod placement;
pub mod model;
pub mod mesher;
pub mod card;
pub mod controls;
pub mod export;

// Re-export main types for convenience
pub use error::{CardError, ErrorKind, Result};
pub use types::{Axis, BoundingBox, Extent, PlaneTransform};
pub use texture::{
    generate_corner_mask, resolve_aspect_ratio, CornerMask, CornerMaskCache, ImageAsset,
    TextureSettings,
};
pub use placement::{classify_orientation, compute_placement, OrientationResult, PlacementPlan};
pub use model::{ImportedModel, ModelTransform};
pub use mesher::{Mesh, Vertex};
pub use card::{
    CardBody, CardBuilder, CardConfig, CardFace, CardHost, CardRequest, CardSlot, CardState,
    MaterialConfig, TexturePlane, TexturedCard,
};
pub use controls::{RotationController, RotationMode};
pub use export::{export_glb, write_glb};

/// Build a card from encoded images with the default configuration.
pub fn build_card(front: &[u8], back: Option<&[u8]>) -> Result<TexturedCard> {
    CardBuilder::new().build_default_card(front, back)
}

#[cfg(feature = "wasm")]
pub mod wasm;
