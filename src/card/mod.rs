//! Textured cards and their lifecycle.
//!
//! A [`TexturedCard`] is built by [`CardBuilder`], handed to a host scene
//! through [`CardSlot`], and explicitly released when replaced. Release drops
//! every plane, texture and mask the card holds; hosts mirror that by freeing
//! the GPU resources they created for it.

mod builder;
mod config;
mod slot;

pub use builder::{CardBuilder, CardRequest};
pub use config::{CardConfig, MaterialConfig};
pub use slot::{CardHost, CardSlot};

use crate::error::{CardError, Result};
use crate::mesher::BoxFace;
use crate::model::{ImportedModel, ModelTransform};
use crate::placement::PlacementPlan;
use crate::texture::{CornerMask, ImageAsset, TextureSettings};
use crate::types::{Extent, PlaneTransform};
use std::sync::Arc;

/// Lifecycle of a card. `Disposed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Unattached,
    Attached,
    Disposed,
}

/// Which side of the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardFace {
    Front,
    Back,
}

/// An image plus the way it is sampled.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: Arc<ImageAsset>,
    pub settings: TextureSettings,
}

impl Texture {
    pub fn new(image: Arc<ImageAsset>, settings: TextureSettings) -> Self {
        Self { image, settings }
    }
}

/// The solid part of the card.
#[derive(Debug, Clone)]
pub enum CardBody {
    /// A generated rectangular box; images go straight onto its ±Z faces.
    Box {
        extent: Extent,
        face_material: MaterialConfig,
        edge_material: MaterialConfig,
    },
    /// An imported model, described by its bounds and viewer transform.
    Imported {
        /// `None` when the caller supplied the extent directly.
        model: Option<ImportedModel>,
        transform: ModelTransform,
        extent: Extent,
    },
}

impl CardBody {
    /// Extent the texture planes are placed against.
    pub fn extent(&self) -> Extent {
        match self {
            CardBody::Box { extent, .. } | CardBody::Imported { extent, .. } => *extent,
        }
    }

    pub fn is_imported(&self) -> bool {
        matches!(self, CardBody::Imported { .. })
    }
}

/// A textured rectangle laid flush against one face of an imported model.
#[derive(Debug, Clone)]
pub struct TexturePlane {
    pub face: CardFace,
    pub width: f32,
    pub height: f32,
    pub transform: PlaneTransform,
    pub material: MaterialConfig,
    pub texture: Option<Texture>,
    /// Shared rounded-corner mask limiting the visible texture.
    pub alpha_mask: Option<Arc<CornerMask>>,
    /// Planes draw after the model so their blended edges sort correctly.
    pub render_order: u32,
}

/// Counts of resources dropped by [`TexturedCard::release`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleasedResources {
    pub planes: usize,
    pub textures: usize,
    pub masks: usize,
}

/// A card body with its front/back images and, for imported models, the
/// two texture planes and their shared mask.
#[derive(Debug)]
pub struct TexturedCard {
    body: CardBody,
    placement: PlacementPlan,
    front_plane: Option<TexturePlane>,
    back_plane: Option<TexturePlane>,
    front_texture: Option<Texture>,
    back_texture: Option<Texture>,
    corner_mask: Option<Arc<CornerMask>>,
    rotation_y: f32,
    state: CardState,
}

impl TexturedCard {
    pub(crate) fn new(
        body: CardBody,
        placement: PlacementPlan,
        front_texture: Option<Texture>,
        back_texture: Option<Texture>,
    ) -> Self {
        Self {
            body,
            placement,
            front_plane: None,
            back_plane: None,
            front_texture,
            back_texture,
            corner_mask: None,
            rotation_y: 0.0,
            state: CardState::Unattached,
        }
    }

    pub(crate) fn with_planes(
        mut self,
        front: TexturePlane,
        back: TexturePlane,
        mask: Option<Arc<CornerMask>>,
    ) -> Self {
        self.front_plane = Some(front);
        self.back_plane = Some(back);
        self.corner_mask = mask;
        self
    }

    pub fn body(&self) -> &CardBody {
        &self.body
    }

    pub fn extent(&self) -> Extent {
        self.body.extent()
    }

    pub fn placement(&self) -> &PlacementPlan {
        &self.placement
    }

    pub fn front_plane(&self) -> Option<&TexturePlane> {
        self.front_plane.as_ref()
    }

    pub fn back_plane(&self) -> Option<&TexturePlane> {
        self.back_plane.as_ref()
    }

    /// Both planes, front first.
    pub fn planes(&self) -> impl Iterator<Item = &TexturePlane> {
        self.front_plane.iter().chain(self.back_plane.iter())
    }

    pub fn front_texture(&self) -> Option<&Texture> {
        self.front_texture.as_ref()
    }

    pub fn back_texture(&self) -> Option<&Texture> {
        self.back_texture.as_ref()
    }

    pub fn corner_mask(&self) -> Option<&Arc<CornerMask>> {
        self.corner_mask.as_ref()
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.state == CardState::Disposed
    }

    /// Texture shown on one face of a box body, if any.
    pub fn box_face_texture(&self, face: BoxFace) -> Option<&Texture> {
        match face {
            BoxFace::Front => self.front_texture.as_ref(),
            BoxFace::Back => self.back_texture.as_ref(),
            _ => None,
        }
    }

    /// Material for one face of a box body. `None` for imported bodies.
    pub fn box_face_material(&self, face: BoxFace) -> Option<MaterialConfig> {
        match &self.body {
            CardBody::Box {
                face_material,
                edge_material,
                ..
            } => {
                if face.is_textured() && self.box_face_texture(face).is_some() {
                    Some(*face_material)
                } else {
                    Some(*edge_material)
                }
            }
            CardBody::Imported { .. } => None,
        }
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Spin about the vertical axis. Ignored once disposed.
    pub fn rotate(&mut self, delta_y: f32) {
        if !self.is_disposed() {
            self.rotation_y += delta_y;
        }
    }

    pub fn set_rotation(&mut self, y: f32) {
        if !self.is_disposed() {
            self.rotation_y = y;
        }
    }

    /// Mark the card as shown by a host. Attaching twice is a no-op.
    pub fn attach(&mut self) -> Result<()> {
        match self.state {
            CardState::Disposed => Err(CardError::CardDisposed),
            _ => {
                self.state = CardState::Attached;
                Ok(())
            }
        }
    }

    /// Drop planes, textures and the mask. One-way; later calls release nothing.
    pub fn release(&mut self) -> ReleasedResources {
        if self.is_disposed() {
            return ReleasedResources::default();
        }

        let released = ReleasedResources {
            planes: self.front_plane.take().map_or(0, |_| 1)
                + self.back_plane.take().map_or(0, |_| 1),
            textures: self.front_texture.take().map_or(0, |_| 1)
                + self.back_texture.take().map_or(0, |_| 1),
            masks: self.corner_mask.take().map_or(0, |_| 1),
        };
        self.state = CardState::Disposed;
        tracing::debug!(?released, "released card resources");
        released
    }
}
