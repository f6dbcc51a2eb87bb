//! WASM bindings for card-mesher.
//!
//! This module provides JavaScript-friendly APIs for use in the browser.

use crate::{CardBuilder, CardConfig, CardRequest, RotationController, RotationMode, TexturedCard};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

fn js_error(e: crate::CardError) -> JsError {
    JsError::new(&e.to_string())
}

/// A built card plus the rotation controller driving it.
#[wasm_bindgen]
pub struct CardHandle {
    card: TexturedCard,
    controls: RotationController,
}

#[wasm_bindgen]
impl CardHandle {
    /// Build a card from uploaded file bytes.
    ///
    /// `config_json` optionally overrides the default card configuration.
    /// An image that cannot be decoded yields the placeholder card.
    #[wasm_bindgen(constructor)]
    pub fn new(
        front: &[u8],
        back: Option<Vec<u8>>,
        model: Option<Vec<u8>>,
        config_json: Option<String>,
    ) -> Result<CardHandle, JsError> {
        let mut builder = match config_json {
            Some(json) => CardBuilder::with_config(CardConfig::from_json(&json).map_err(js_error)?)
                .map_err(js_error)?,
            None => CardBuilder::new(),
        };

        let mut request = CardRequest::new(front);
        if let Some(back) = &back {
            request = request.with_back(back);
        }
        if let Some(model) = &model {
            request = request.with_model(model);
        }

        let card = builder.build_or_placeholder(&request).map_err(js_error)?;
        Ok(CardHandle {
            card,
            controls: RotationController::new(),
        })
    }

    /// The untextured card shown before any upload.
    pub fn placeholder() -> Result<CardHandle, JsError> {
        let card = CardBuilder::new().build_placeholder().map_err(js_error)?;
        Ok(CardHandle {
            card,
            controls: RotationController::new(),
        })
    }

    /// Thin axis of the card: "x", "y" or "z".
    #[wasm_bindgen(getter)]
    pub fn thin_axis(&self) -> String {
        self.card.placement().thin_axis.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn plane_width(&self) -> f32 {
        self.card.placement().plane_width
    }

    #[wasm_bindgen(getter)]
    pub fn plane_height(&self) -> f32 {
        self.card.placement().plane_height
    }

    #[wasm_bindgen(getter)]
    pub fn front_offset(&self) -> f32 {
        self.card.placement().front_offset
    }

    #[wasm_bindgen(getter)]
    pub fn back_offset(&self) -> f32 {
        self.card.placement().back_offset
    }

    /// Whether the card uses an imported model.
    #[wasm_bindgen(getter)]
    pub fn is_imported(&self) -> bool {
        self.card.body().is_imported()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation_y(&self) -> f32 {
        self.card.rotation_y()
    }

    /// Export the card as GLB bytes.
    pub fn glb(&self) -> Result<Vec<u8>, JsError> {
        crate::export_glb(&self.card).map_err(js_error)
    }

    /// Add to the Y rotation directly.
    pub fn rotate(&mut self, delta_y: f32) {
        self.card.rotate(delta_y);
    }

    /// Switch between automatic spinning and pointer-driven rotation.
    pub fn set_auto_rotate(&mut self, auto: bool) {
        let mode = if auto {
            RotationMode::Auto
        } else {
            RotationMode::Manual
        };
        self.controls.set_mode(mode);
    }

    /// Pointer x across the canvas in [0, 1].
    pub fn set_pointer(&mut self, x: f32) {
        self.controls.set_pointer(x);
    }

    /// Advance the rotation by one frame.
    pub fn tick(&mut self) {
        self.controls.update(Some(&mut self.card));
    }

    /// Release the card's textures and mask. Further calls are no-ops.
    pub fn release(&mut self) {
        self.card.release();
    }

    #[wasm_bindgen(getter)]
    pub fn is_disposed(&self) -> bool {
        self.card.is_disposed()
    }
}

/// Rasterize a rounded-corner mask at the default resolution and return it
/// as grayscale PNG bytes.
#[wasm_bindgen]
pub fn corner_mask_png(radius: f32) -> Result<Vec<u8>, JsError> {
    let mask = crate::generate_corner_mask(radius).map_err(js_error)?;
    mask.to_png().map_err(js_error)
}

/// Width / height of an encoded image, read from its header.
#[wasm_bindgen]
pub fn image_aspect_ratio(data: &[u8]) -> Result<f32, JsError> {
    crate::resolve_aspect_ratio(data).map_err(js_error)
}
