//! Error types for the spritesheet builder.

use thiserror::Error;

/// Result type alias using SheetError.
pub type Result<T> = std::result::Result<T, SheetError>;

/// Main error type for placement, animation and packing operations.
#[derive(Error, Debug)]
pub enum SheetError {
    /// Failed to read or write a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to parse or produce JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode or encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An asset of the wrong type was offered to a store.
    #[error("Invalid input format: {0}")]
    InvalidInputFormat(String),

    /// An animation with this name already exists.
    #[error("Animation already exists: {0}")]
    DuplicateName(String),

    /// No animation with this name exists.
    #[error("Unknown animation: {0}")]
    UnknownAnimation(String),

    /// Animation names must be non-empty.
    #[error("Invalid animation name: {0:?}")]
    InvalidAnimationName(String),

    /// Frame index outside the animation's sequence.
    #[error("Frame index {index} out of range for animation '{animation}' ({len} frames)")]
    IndexOutOfRange {
        animation: String,
        index: usize,
        len: usize,
    },

    /// Malformed "row:col" cell key text.
    #[error("Invalid cell key: {0:?}")]
    InvalidCellKey(String),

    /// Frame dimensions must both be positive.
    #[error("Invalid frame grid {width}x{height}: frame sizes must be positive")]
    InvalidGrid { width: u32, height: u32 },

    /// No image handle with this id is in the store.
    #[error("Unknown image id: {0}")]
    UnknownImage(usize),

    /// Packing was requested with no images loaded.
    #[error("No images loaded: add at least one image before packing")]
    NoInput,

    /// No referenced cell resolved to pixel content.
    #[error("No frames available for spritesheet generation: add frames covered by an image")]
    EmptyPack,

    /// A bundle was requested before any successful pack.
    #[error("The spritesheet has not been generated yet")]
    NotPacked,

    /// Failed to export the atlas or bundle.
    #[error("Export error: {0}")]
    Export(String),
}
