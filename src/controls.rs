//! Y-axis rotation control for the shown card.

use crate::card::TexturedCard;
use std::f32::consts::TAU;

/// Whether the card spins on its own or follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    Auto,
    Manual,
}

/// Drives a card's Y rotation once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationController {
    mode: RotationMode,
    /// Radians added per update in auto mode.
    pub auto_speed: f32,
    /// Fraction of the remaining angle covered per update in manual mode.
    pub smoothing: f32,
    target_rotation_y: f32,
}

impl RotationController {
    pub fn new() -> Self {
        Self {
            mode: RotationMode::Auto,
            auto_speed: 0.01,
            smoothing: 0.1,
            target_rotation_y: 0.0,
        }
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RotationMode) {
        self.mode = mode;
    }

    pub fn target_rotation_y(&self) -> f32 {
        self.target_rotation_y
    }

    /// Pointer x across the canvas, 0 at the left edge and 1 at the right.
    /// Ignored in auto mode.
    pub fn set_pointer(&mut self, x: f32) {
        if self.mode == RotationMode::Manual {
            self.target_rotation_y = (x.clamp(0.0, 1.0) - 0.5) * TAU;
        }
    }

    /// Advance one frame.
    pub fn update(&self, card: Option<&mut TexturedCard>) {
        let Some(card) = card else {
            return;
        };
        match self.mode {
            RotationMode::Auto => card.rotate(self.auto_speed),
            RotationMode::Manual => {
                let current = card.rotation_y();
                card.set_rotation(current + (self.target_rotation_y - current) * self.smoothing);
            }
        }
    }
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new()
    }
}
