//! Image assets, texture sampling settings and alpha masks.

pub(crate) mod asset;
mod mask;
mod settings;

pub use asset::{resolve_aspect_ratio, ImageAsset};
pub use mask::{
    generate_corner_mask, CornerMask, CornerMaskCache, DEFAULT_MASK_SIZE, MAX_MASK_SIZE,
};
pub(crate) use mask::validate_size as validate_mask_size;
pub use settings::{MagFilter, MinFilter, TextureSettings, WrapMode};
