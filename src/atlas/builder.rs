//! Spritesheet packing: used cells into a single-column atlas.

use crate::animation::AnimationRegistry;
use crate::error::{Result, SheetError};
use crate::placement::{PlacementStore, SpriteImage};
use crate::types::{CellKey, FrameGrid};
use image::ImageEncoder;
use std::collections::BTreeMap;

/// One band of the atlas and the cell it was cut from.
#[derive(Debug, Clone)]
pub struct PackedFrame {
    /// Cell the pixels were taken from, before packing.
    pub source: CellKey,
    /// RGBA8 pixels of one frame.
    pub pixels: Vec<u8>,
}

/// A packed spritesheet.
#[derive(Debug)]
pub struct PackedAtlas {
    /// Width of one frame (and of the atlas) in pixels.
    pub frame_width: u32,
    /// Height of one frame in pixels.
    pub frame_height: u32,
    /// Width of the atlas in pixels.
    pub width: u32,
    /// Height of the atlas in pixels.
    pub height: u32,
    /// RGBA pixel data.
    pub pixels: Vec<u8>,
    /// Frames in band order.
    pub frames: Vec<PackedFrame>,
    /// Mapping from pre-pack cell to band key (`"<index>:0"`).
    pub remap: BTreeMap<CellKey, CellKey>,
}

impl PackedAtlas {
    /// Number of frames (bands) in the atlas.
    pub fn band_count(&self) -> usize {
        self.frames.len()
    }

    /// New key of a pre-pack cell, if it made it into the atlas.
    pub fn remapped(&self, key: CellKey) -> Option<CellKey> {
        self.remap.get(&key).copied()
    }

    /// Export the atlas as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);

        encoder
            .write_image(
                &self.pixels,
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| SheetError::Export(format!("Failed to encode PNG: {}", e)))?;

        Ok(bytes)
    }

    /// The atlas as a sprite, ready to be placed and packed again.
    pub fn to_sprite(&self, name: impl Into<String>) -> Result<SpriteImage> {
        SpriteImage::new(name, self.width, self.height, self.pixels.clone())
    }
}

/// Builder that stacks frames into a single column.
pub struct AtlasBuilder {
    frame_width: u32,
    frame_height: u32,
    frames: Vec<PackedFrame>,
}

impl AtlasBuilder {
    /// Create a builder for frames of the grid's cell size.
    pub fn new(grid: &FrameGrid) -> Self {
        Self {
            frame_width: grid.width(),
            frame_height: grid.height(),
            frames: Vec::new(),
        }
    }

    /// Append a frame below the ones already added.
    pub fn add_frame(&mut self, source: CellKey, pixels: Vec<u8>) {
        debug_assert_eq!(
            pixels.len(),
            self.frame_width as usize * self.frame_height as usize * 4
        );
        self.frames.push(PackedFrame { source, pixels });
    }

    /// Compose the atlas. Band `i` holds the i-th added frame and every
    /// source cell maps to `"i:0"`.
    pub fn build(self) -> Result<PackedAtlas> {
        if self.frames.is_empty() {
            return Err(SheetError::EmptyPack);
        }

        let band_count = u32::try_from(self.frames.len())
            .map_err(|_| SheetError::Export("too many frames for one atlas".to_string()))?;
        let height = self
            .frame_height
            .checked_mul(band_count)
            .ok_or_else(|| SheetError::Export(format!("atlas of {} frames is too tall", band_count)))?;

        // Bands span the full atlas width, so they are contiguous in memory.
        let mut pixels = Vec::with_capacity(self.frame_width as usize * height as usize * 4);
        let mut remap = BTreeMap::new();
        for (index, frame) in self.frames.iter().enumerate() {
            pixels.extend_from_slice(&frame.pixels);
            remap.insert(frame.source, CellKey::band(index as u32));
        }

        Ok(PackedAtlas {
            frame_width: self.frame_width,
            frame_height: self.frame_height,
            width: self.frame_width,
            height,
            pixels,
            frames: self.frames,
            remap,
        })
    }
}

/// Cut every used cell out of its owning image and stack the results.
///
/// Read-only: neither store is modified. Cells referenced by an animation
/// but not covered by any image are left out of the atlas.
pub fn pack_cells(
    store: &PlacementStore,
    animations: &AnimationRegistry,
    grid: &FrameGrid,
) -> Result<PackedAtlas> {
    if store.is_empty() {
        return Err(SheetError::NoInput);
    }

    let used = animations.used_cells();
    let mut builder = AtlasBuilder::new(grid);
    let mut dropped = Vec::new();

    for key in &used {
        let Some(owner) = store.resolve_owner(grid, *key) else {
            dropped.push(*key);
            continue;
        };
        let (ox, oy) = grid.cell_origin(*key);
        let block = owner.copy_block(
            ox - i64::from(owner.x),
            oy - i64::from(owner.y),
            grid.width(),
            grid.height(),
        );
        builder.add_frame(*key, block);
    }

    log::debug!(
        "packing {} used cells: {} resolved, {} without an image",
        used.len(),
        used.len() - dropped.len(),
        dropped.len()
    );
    if !dropped.is_empty() {
        let list: Vec<String> = dropped.iter().map(|k| k.to_string()).collect();
        log::warn!("Dropping cells not covered by any image: {}", list.join(", "));
    }

    builder.build()
}

/// Pack the used cells and rewrite every animation to the new band keys.
///
/// Animations are only touched once the atlas has been built, so a failed
/// pack leaves them unchanged.
pub fn pack(
    store: &PlacementStore,
    animations: &mut AnimationRegistry,
    grid: &FrameGrid,
) -> Result<PackedAtlas> {
    let atlas = pack_cells(store, animations, grid)?;
    animations.apply_remap(&atlas.remap);
    Ok(atlas)
}
