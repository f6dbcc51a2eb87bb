//! Decoded image assets.

use super::CornerMask;
use crate::error::{CardError, Result};
use base64::Engine as _;
use image::ImageEncoder;
use std::io::Cursor;

/// A decoded RGBA image used as a card face.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl ImageAsset {
    /// Create an asset from raw RGBA data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self { width, height, pixels }
    }

    /// Decode PNG or JPEG bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|e| CardError::ImageDecodeFailed(e.to_string()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(CardError::ImageDecodeFailed(format!(
                "image has zero size ({}x{})",
                width, height
            )));
        }

        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Decode a `data:image/...;base64,` URL, as produced by browser file readers.
    pub fn from_data_url(url: &str) -> Result<Self> {
        Self::from_bytes(&decode_data_url(url)?)
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Get a pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Check if this image has transparency.
    pub fn has_transparency(&self) -> bool {
        self.pixels.chunks(4).any(|pixel| pixel[3] < 255)
    }

    /// Copy with the alpha channel multiplied by a corner mask.
    ///
    /// The mask is sampled nearest-neighbour, so any image size works.
    pub fn masked(&self, mask: &CornerMask) -> Self {
        let mut pixels = self.pixels.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                let u = (x as f32 + 0.5) / self.width as f32;
                let v = (y as f32 + 0.5) / self.height as f32;
                let m = mask.sample_image_space(u, v) as u32;
                let idx = ((y * self.width + x) * 4 + 3) as usize;
                pixels[idx] = ((pixels[idx] as u32 * m + 127) / 255) as u8;
            }
        }
        Self::new(self.width, self.height, pixels)
    }

    /// Export the image as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(Cursor::new(&mut bytes));
        encoder
            .write_image(
                &self.pixels,
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| CardError::Export(format!("Failed to encode PNG: {}", e)))?;
        Ok(bytes)
    }
}

/// Width/height ratio of an encoded image.
///
/// Only the header is read; the pixel data is not decoded.
pub fn resolve_aspect_ratio(data: &[u8]) -> Result<f32> {
    let reader = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CardError::ImageDecodeFailed(e.to_string()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CardError::ImageDecodeFailed(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(CardError::ImageDecodeFailed(format!(
            "image has zero size ({}x{})",
            width, height
        )));
    }
    Ok(width as f32 / height as f32)
}

fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| CardError::ImageDecodeFailed("not a data URL".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CardError::ImageDecodeFailed("data URL has no payload".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(CardError::ImageDecodeFailed(format!(
            "unsupported data URL encoding: {}",
            header
        )));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| CardError::ImageDecodeFailed(format!("invalid base64: {}", e)))
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let pixels: Vec<u8> = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    ImageAsset::new(width, height, pixels).to_png().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use base64::Engine;

    #[test]
    fn test_resolve_aspect_ratio() {
        let png = png_fixture(300, 400, [255, 0, 0, 255]);
        let ratio = resolve_aspect_ratio(&png).unwrap();
        assert!((ratio - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_aspect_ratio_garbage() {
        let err = resolve_aspect_ratio(b"definitely not an image").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImageDecodeFailed);
    }

    #[test]
    fn test_from_bytes() {
        let png = png_fixture(4, 2, [0, 255, 0, 255]);
        let asset = ImageAsset::from_bytes(&png).unwrap();
        assert_eq!((asset.width, asset.height), (4, 2));
        assert_eq!(asset.get_pixel(3, 1), [0, 255, 0, 255]);
        assert_eq!(asset.aspect_ratio(), 2.0);
        assert!(!asset.has_transparency());
    }

    #[test]
    fn test_from_data_url() {
        let png = png_fixture(2, 2, [1, 2, 3, 255]);
        let url = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        );
        let asset = ImageAsset::from_data_url(&url).unwrap();
        assert_eq!(asset.get_pixel(0, 0), [1, 2, 3, 255]);
    }

    #[test]
    fn test_from_data_url_rejects_plain_text() {
        assert!(ImageAsset::from_data_url("data:text/plain,hello").is_err());
        assert!(ImageAsset::from_data_url("https://example.com/a.png").is_err());
    }

    #[test]
    fn test_masked_clears_corners() {
        let asset = ImageAsset::new(64, 64, vec![255; 64 * 64 * 4]);
        let mask = CornerMask::generate(0.25, 64).unwrap();
        let masked = asset.masked(&mask);
        assert_eq!(masked.get_pixel(0, 0)[3], 0);
        assert_eq!(masked.get_pixel(32, 32)[3], 255);
        assert_eq!(masked.get_pixel(0, 0)[0], 255);
        assert!(masked.has_transparency());
    }
}
