//! Rounded-corner alpha masks.
//!
//! Imported meshes rarely have faces that are exact rectangles matching the
//! image's aspect ratio. Masking the texture to a rounded rectangle turns any
//! mismatch at the corners into a transparent border instead of a stretched
//! edge.

use crate::error::{CardError, Result};
use image::ImageEncoder;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

/// Default mask resolution in pixels (square).
pub const DEFAULT_MASK_SIZE: u32 = 512;

/// Largest accepted mask resolution.
pub const MAX_MASK_SIZE: u32 = 8192;

/// A square single-channel alpha raster: 255 inside the rounded rectangle,
/// 0 outside.
///
/// Immutable once generated, so it can be shared between materials.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerMask {
    radius: f32,
    size: u32,
    alpha: Vec<u8>,
}

impl CornerMask {
    /// Rasterize a mask with corner radius `radius * size`.
    ///
    /// `radius` must lie in (0, 0.5]. At 0.5 the rounded rectangle becomes
    /// the inscribed circle.
    pub fn generate(radius: f32, size: u32) -> Result<Self> {
        validate_radius(radius)?;
        validate_size(size)?;

        let s = size as f32;
        let r = radius * s;
        // Centre line of the straight edges; quarter arcs live outside it.
        let (lo, hi) = (r, s - r);

        let mut alpha = vec![0u8; size as usize * size as usize];
        for y in 0..size {
            let py = y as f32 + 0.5;
            let cy = py.clamp(lo, hi);
            for x in 0..size {
                let px = x as f32 + 0.5;
                let cx = px.clamp(lo, hi);
                let (dx, dy) = (px - cx, py - cy);
                if dx * dx + dy * dy <= r * r {
                    alpha[y as usize * size as usize + x as usize] = 255;
                }
            }
        }

        Ok(Self { radius, size, alpha })
    }

    /// Corner radius as a fraction of the mask size.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Mask width and height in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Raw alpha values, row-major from the top-left.
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    /// Alpha at pixel (x, y), top-left origin.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.alpha[y as usize * self.size as usize + x as usize]
    }

    /// Nearest-neighbour sample with (u, v) in [0, 1] and v pointing down.
    pub fn sample_image_space(&self, u: f32, v: f32) -> u8 {
        let max = (self.size - 1) as f32;
        let x = (u * self.size as f32).floor().clamp(0.0, max) as u32;
        let y = (v * self.size as f32).floor().clamp(0.0, max) as u32;
        self.alpha_at(x, y)
    }

    /// Fraction of pixels that are opaque.
    pub fn coverage(&self) -> f32 {
        let opaque = self.alpha.iter().filter(|&&a| a == 255).count();
        opaque as f32 / self.alpha.len() as f32
    }

    /// Export the mask as a grayscale PNG (white = opaque).
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(Cursor::new(&mut bytes));
        encoder
            .write_image(&self.alpha, self.size, self.size, image::ExtendedColorType::L8)
            .map_err(|e| CardError::Export(format!("Failed to encode mask PNG: {}", e)))?;
        Ok(bytes)
    }
}

/// Generate a mask at the default resolution.
pub fn generate_corner_mask(radius: f32) -> Result<CornerMask> {
    CornerMask::generate(radius, DEFAULT_MASK_SIZE)
}

pub(crate) fn validate_size(size: u32) -> Result<()> {
    if size == 0 || size > MAX_MASK_SIZE {
        return Err(CardError::InvalidParameter(format!(
            "mask size must be in 1..={}, got {}",
            MAX_MASK_SIZE, size
        )));
    }
    Ok(())
}

fn validate_radius(radius: f32) -> Result<()> {
    // Written so NaN fails too.
    if !(radius > 0.0 && radius <= 0.5) {
        return Err(CardError::InvalidParameter(format!(
            "corner radius must be in (0, 0.5], got {}",
            radius
        )));
    }
    Ok(())
}

/// Masks keyed by radius, shared by reference between planes.
#[derive(Debug)]
pub struct CornerMaskCache {
    size: u32,
    masks: HashMap<u32, Arc<CornerMask>>,
}

impl CornerMaskCache {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            masks: HashMap::new(),
        }
    }

    /// Return the cached mask for `radius`, rasterizing it on first use.
    pub fn get(&mut self, radius: f32) -> Result<Arc<CornerMask>> {
        validate_radius(radius)?;
        if let Some(mask) = self.masks.get(&radius.to_bits()) {
            return Ok(Arc::clone(mask));
        }

        let mask = Arc::new(CornerMask::generate(radius, self.size)?);
        tracing::debug!(radius, size = self.size, "rasterized corner mask");
        self.masks.insert(radius.to_bits(), Arc::clone(&mask));
        Ok(mask)
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

impl Default for CornerMaskCache {
    fn default() -> Self {
        Self::new(DEFAULT_MASK_SIZE)
    }
}
