//! # Spritesheet Builder
//!
//! A Rust library for assembling placed sprite images into a grid-addressed
//! spritesheet with named frame animations.
//!
//! ## Overview
//!
//! Source images are placed anywhere on a shared canvas. A [`FrameGrid`]
//! divides the canvas into cells addressed by [`CellKey`] (`"row:col"`), and
//! animations are ordered lists of those cells. Packing cuts every cell that
//! some animation uses out of the image covering it, stacks the frames into a
//! single-column atlas in row-major order, and rewrites every animation to the
//! new `"<band>:0"` keys.
//!
//! ## Quick Start
//!
//! ```ignore
//! use spritesheet_builder::{Project, ProjectSettings};
//!
//! let mut project = Project::new(ProjectSettings::default().with_grid(32, 32))?;
//! project.add_image_bytes("walk.png", &std::fs::read("walk.png")?)?;
//!
//! let walk = project.begin_animation("walk")?;
//! project.select_frames(&walk, 0, 0, 63, 0)?;
//!
//! let atlas = project.pack()?;
//! std::fs::write("spritesheet.png", atlas.to_png()?)?;
//! std::fs::write("config.json", project.config_json()?)?;
//! ```
//!
//! ## Library Integration
//!
//! The stores can also be driven directly, without a [`Project`]:
//!
//! ```ignore
//! use spritesheet_builder::{atlas, AnimationRegistry, FrameGrid, PlacementStore};
//!
//! let grid = FrameGrid::new(32, 32)?;
//! let mut images = PlacementStore::new();
//! let mut animations = AnimationRegistry::new();
//! // ... place images, define animations ...
//! let packed = atlas::pack(&images, &mut animations, &grid)?;
//! ```

pub mod error;
pub mod types;
pub mod placement;
pub mod animation;
pub mod sound;
pub mod atlas;
pub mod export;
pub mod project;

// Re-export main types for convenience
pub use error::{SheetError, Result};
pub use types::{CellKey, FrameGrid, ImageId};
pub use placement::{PlacementStore, SpriteImage};
pub use animation::{Animation, AnimationRegistry, PREDEFINED_ANIMATIONS, REQUIRED_ANIMATIONS};
pub use sound::{SoundAsset, SoundStore};
pub use atlas::{AtlasBuilder, PackedAtlas, PackedFrame};
pub use export::SheetConfig;
pub use project::{Project, ProjectFile, ProjectSettings};

/// Load a project description file (JSON) with default settings.
pub fn load_project<P: AsRef<std::path::Path>>(path: P) -> Result<Project> {
    Project::from_file(path, ProjectSettings::default())
}

/// Load a sprite from PNG bytes (for WASM compatibility).
pub fn load_sprite_from_bytes(name: &str, data: &[u8]) -> Result<SpriteImage> {
    SpriteImage::from_png_bytes(name, data)
}

#[cfg(feature = "wasm")]
pub mod wasm;
