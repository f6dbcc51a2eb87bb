//! Error types for card building.

use thiserror::Error;

/// Result type alias using CardError.
pub type Result<T> = std::result::Result<T, CardError>;

/// Coarse classification of a [`CardError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An image asset could not be rasterized.
    ImageDecodeFailed,
    /// A radius or other configuration value is outside its valid domain.
    InvalidParameter,
    /// A bounding box has a zero (or non-finite) dimension.
    DegenerateExtent,
    /// A 3D model file could not be parsed.
    ModelParseFailed,
    /// The card was used after being released.
    InvalidState,
    /// Serialization or I/O failure while exporting.
    Export,
}

/// Main error type for card operations.
#[derive(Error, Debug)]
pub enum CardError {
    /// An image could not be decoded, or decoded to an empty raster.
    #[error("Image decode failed: {0}")]
    ImageDecodeFailed(String),

    /// A parameter is outside its valid domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The extent has a zero-size dimension.
    #[error("Degenerate extent: [{}, {}, {}]", .0[0], .0[1], .0[2])]
    DegenerateExtent([f32; 3]),

    /// A glTF/GLB model could not be parsed or has no usable bounds.
    #[error("Model parse failed: {0}")]
    ModelParseFailed(String),

    /// The card has already been released.
    #[error("Card has been disposed")]
    CardDisposed,

    /// Failed to export a card.
    #[error("Export error: {0}")]
    Export(String),

    /// Failed to encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to parse or write JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CardError {
    /// Map this error onto the coarse taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CardError::ImageDecodeFailed(_) | CardError::Image(_) => ErrorKind::ImageDecodeFailed,
            CardError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            CardError::DegenerateExtent(_) => ErrorKind::DegenerateExtent,
            CardError::ModelParseFailed(_) => ErrorKind::ModelParseFailed,
            CardError::CardDisposed => ErrorKind::InvalidState,
            CardError::Export(_) | CardError::Json(_) | CardError::Io(_) => ErrorKind::Export,
        }
    }
}
