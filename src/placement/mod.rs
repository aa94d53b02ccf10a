//! Placement of source images on the shared canvas.
//!
//! The [`PlacementStore`] owns every [`SpriteImage`] and is the only bridge
//! between grid cells and concrete pixel data: a cell is backed by whichever
//! image covers its origin pixel.

pub mod loader;
pub mod snap;
mod sprite;

pub use snap::{snap_position, DEFAULT_SNAP_THRESHOLD};
pub use sprite::SpriteImage;

#[cfg(test)]
pub(crate) use sprite::solid;

use crate::error::{Result, SheetError};
use crate::types::saturate_to_i32;
use crate::types::{CellKey, FrameGrid, ImageId};

/// Ordered collection of placed images.
///
/// Placement order matters: where images overlap, the one placed most
/// recently shadows earlier ones, both for cell ownership and hit testing.
#[derive(Debug, Default, Clone)]
pub struct PlacementStore {
    entries: Vec<(ImageId, SpriteImage)>,
    next_id: usize,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of placed images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over images in placement order (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = (ImageId, &SpriteImage)> + '_ {
        self.entries.iter().map(|(id, img)| (*id, img))
    }

    /// Get an image by handle.
    pub fn get(&self, id: ImageId) -> Option<&SpriteImage> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, img)| img)
    }

    fn get_mut(&mut self, id: ImageId) -> Result<&mut SpriteImage> {
        self.entries
            .iter_mut()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, img)| img)
            .ok_or(SheetError::UnknownImage(id.0))
    }

    /// Default position for a new image: flush left, directly below every
    /// existing image, on a grid line.
    pub fn next_free_position(&self, grid: &FrameGrid) -> (i32, i32) {
        let max_bottom = self
            .entries
            .iter()
            .map(|(_, img)| img.bottom())
            .fold(0, i64::max);
        let y = grid.align_down(max_bottom);
        (0, saturate_to_i32(y))
    }

    /// Insert an image, at `position` or at the next free position.
    pub fn place(
        &mut self,
        mut image: SpriteImage,
        position: Option<(i32, i32)>,
        grid: &FrameGrid,
    ) -> ImageId {
        let (x, y) = position.unwrap_or_else(|| self.next_free_position(grid));
        image.x = x;
        image.y = y;

        let id = ImageId(self.next_id);
        self.next_id += 1;
        log::debug!(
            "placed {} {} ({}x{}) at ({}, {})",
            id,
            image.name,
            image.width,
            image.height,
            x,
            y
        );
        self.entries.push((id, image));
        id
    }

    /// Remove an image and hand it back.
    pub fn remove(&mut self, id: ImageId) -> Result<SpriteImage> {
        let index = self
            .entries
            .iter()
            .position(|(entry_id, _)| *entry_id == id)
            .ok_or(SheetError::UnknownImage(id.0))?;
        Ok(self.entries.remove(index).1)
    }

    /// The image backing a cell: the most recently placed image that covers
    /// the cell's origin pixel.
    pub fn resolve_owner(&self, grid: &FrameGrid, key: CellKey) -> Option<&SpriteImage> {
        let (ox, oy) = grid.cell_origin(key);
        self.entries
            .iter()
            .rev()
            .map(|(_, img)| img)
            .find(|img| img.covers(ox, oy))
    }

    /// Topmost image under a canvas point, edges included.
    pub fn image_at(&self, px: i32, py: i32) -> Option<ImageId> {
        let (px, py) = (i64::from(px), i64::from(py));
        self.entries
            .iter()
            .rev()
            .find(|(_, img)| {
                px >= i64::from(img.x) && px <= img.right() && py >= i64::from(img.y) && py <= img.bottom()
            })
            .map(|(id, _)| *id)
    }

    /// Snapped version of a proposed position for an image, without moving it.
    pub fn snap_to_grid(
        &self,
        id: ImageId,
        grid: &FrameGrid,
        raw_x: i32,
        raw_y: i32,
        threshold: u32,
    ) -> Result<(i32, i32)> {
        let img = self.get(id).ok_or(SheetError::UnknownImage(id.0))?;
        Ok(snap_position(grid, img.width, img.height, raw_x, raw_y, threshold))
    }

    /// Move an image to a proposed position, snapping it toward grid lines.
    pub fn move_image(
        &mut self,
        id: ImageId,
        grid: &FrameGrid,
        raw_x: i32,
        raw_y: i32,
        threshold: u32,
    ) -> Result<(i32, i32)> {
        let (x, y) = self.snap_to_grid(id, grid, raw_x, raw_y, threshold)?;
        self.set_position(id, x, y)?;
        Ok((x, y))
    }

    /// Move an image to an exact position.
    pub fn set_position(&mut self, id: ImageId, x: i32, y: i32) -> Result<()> {
        let img = self.get_mut(id)?;
        img.x = x;
        img.y = y;
        Ok(())
    }

    /// Crop one image to its vertical opaque extent.
    pub fn trim(&mut self, id: ImageId) -> Result<bool> {
        Ok(self.get_mut(id)?.trim())
    }

    /// Trim every image. Returns the smallest height among images that had
    /// opaque content.
    pub fn trim_all(&mut self) -> Option<u32> {
        let mut min_height = None;
        for (_, img) in &mut self.entries {
            img.trim();
            if img.opaque_rows().is_some() {
                min_height = Some(min_height.map_or(img.height, |h: u32| h.min(img.height)));
            }
        }
        min_height
    }

    /// Stack every image at x = 0 in placement order, each one's bottom edge
    /// resting on a grid line.
    pub fn align_all(&mut self, grid: &FrameGrid) {
        let cell = i64::from(grid.height());
        let mut cursor = 0i64;

        for (_, img) in &mut self.entries {
            let height = i64::from(img.height);
            let bottom = grid.align_down(cursor + height);
            img.x = 0;
            img.y = saturate_to_i32(bottom - height);
            cursor += (height + cell - 1) / cell * cell;
        }
    }
}
