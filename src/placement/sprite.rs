//! Placed sprite images and their pixel operations.

use crate::error::{Result, SheetError};
use crate::types::saturate_to_i32;

/// A decoded source image placed on the shared canvas.
#[derive(Debug, Clone)]
pub struct SpriteImage {
    /// Display/export identifier, usually the source file name.
    pub name: String,
    /// Left edge in canvas pixels.
    pub x: i32,
    /// Top edge in canvas pixels.
    pub y: i32,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl SpriteImage {
    /// Create an image from RGBA data, positioned at the origin.
    pub fn new(name: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let name = name.into();
        if width == 0 || height == 0 {
            return Err(SheetError::InvalidInputFormat(format!(
                "{} has no pixels ({}x{})",
                name, width, height
            )));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(SheetError::InvalidInputFormat(format!(
                "{}: expected {} bytes of RGBA data, got {}",
                name,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            name,
            x: 0,
            y: 0,
            width,
            height,
            pixels,
        })
    }

    /// Decode a PNG file's bytes. Any other format is rejected.
    pub fn from_png_bytes(name: impl Into<String>, data: &[u8]) -> Result<Self> {
        let name = name.into();
        match image::guess_format(data) {
            Ok(image::ImageFormat::Png) => {}
            _ => {
                return Err(SheetError::InvalidInputFormat(format!(
                    "{} is not a PNG image",
                    name
                )))
            }
        }

        let img = image::load_from_memory_with_format(data, image::ImageFormat::Png)?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(name, width, height, rgba.into_raw())
    }

    /// Get a pixel at local (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Bottom edge in canvas pixels (exclusive).
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Right edge in canvas pixels (exclusive).
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Whether a canvas point lies on one of this image's pixels.
    pub fn covers(&self, px: i64, py: i64) -> bool {
        px >= i64::from(self.x) && px < self.right() && py >= i64::from(self.y) && py < self.bottom()
    }

    /// First and last rows that contain a pixel with non-zero alpha.
    pub fn opaque_rows(&self) -> Option<(u32, u32)> {
        let row_bytes = self.width as usize * 4;
        let is_opaque = |row: &[u8]| row.chunks_exact(4).any(|px| px[3] != 0);

        let mut rows = self.pixels.chunks_exact(row_bytes);
        let top = rows.position(is_opaque)?;
        let bottom = self
            .pixels
            .chunks_exact(row_bytes)
            .rposition(is_opaque)
            .unwrap_or(top);
        Some((top as u32, bottom as u32))
    }

    /// Crop away fully transparent rows at the top and bottom.
    ///
    /// The visible content keeps its canvas position: `y` moves down by the
    /// number of rows removed from the top. Returns `false` and leaves the
    /// image untouched when it has no opaque pixel.
    pub fn trim(&mut self) -> bool {
        let Some((top, bottom)) = self.opaque_rows() else {
            return false;
        };
        let new_height = bottom - top + 1;
        if new_height == self.height {
            return false;
        }

        let row_bytes = self.width as usize * 4;
        let start = top as usize * row_bytes;
        let end = (bottom as usize + 1) * row_bytes;
        self.pixels = self.pixels[start..end].to_vec();
        self.height = new_height;
        self.y = saturate_to_i32(i64::from(self.y) + i64::from(top));
        true
    }

    /// Copy a `width x height` block starting at local offset (sx, sy).
    ///
    /// Parts of the block that fall outside the image are transparent.
    pub fn copy_block(&self, sx: i64, sy: i64, width: u32, height: u32) -> Vec<u8> {
        let mut block = vec![0u8; width as usize * height as usize * 4];

        for by in 0..height {
            let src_y = sy + i64::from(by);
            if src_y < 0 || src_y >= i64::from(self.height) {
                continue;
            }
            for bx in 0..width {
                let src_x = sx + i64::from(bx);
                if src_x < 0 || src_x >= i64::from(self.width) {
                    continue;
                }
                let src_idx = ((src_y as usize * self.width as usize) + src_x as usize) * 4;
                let dst_idx = ((by as usize * width as usize) + bx as usize) * 4;
                block[dst_idx..dst_idx + 4].copy_from_slice(&self.pixels[src_idx..src_idx + 4]);
            }
        }

        block
    }
}

#[cfg(test)]
pub(crate) fn solid(name: &str, width: u32, height: u32, color: [u8; 4]) -> SpriteImage {
    let pixels: Vec<u8> = (0..width * height).flat_map(|_| color).collect();
    SpriteImage::new(name, width, height, pixels).unwrap()
}
