//! Frame grid geometry: pixel <-> cell mapping.

use super::CellKey;
use crate::error::{Result, SheetError};

/// Size of one frame cell, shared by every placed image.
///
/// Both dimensions are always positive; the constructor and the setters
/// reject zero. Changing the size never moves images, it only changes which
/// cell a pixel position maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGrid {
    width: u32,
    height: u32,
}

impl Default for FrameGrid {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
        }
    }
}

impl FrameGrid {
    /// Create a grid with the given cell size.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SheetError::InvalidGrid { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Change both cell dimensions. On error the grid is left unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// Change only the cell height.
    pub fn set_height(&mut self, height: u32) -> Result<()> {
        self.resize(self.width, height)
    }

    /// Signed `(row, col)` of the cell containing a pixel.
    ///
    /// Uses floor division, so points left of or above the origin land in
    /// negative cells.
    pub fn cell_coords_at(&self, x: i32, y: i32) -> (i64, i64) {
        (
            i64::from(y).div_euclid(i64::from(self.height)),
            i64::from(x).div_euclid(i64::from(self.width)),
        )
    }

    /// Cell containing a pixel, or `None` when that cell has a negative index.
    pub fn cell_key_at(&self, x: i32, y: i32) -> Option<CellKey> {
        let (row, col) = self.cell_coords_at(x, y);
        Some(CellKey::new(u32::try_from(row).ok()?, u32::try_from(col).ok()?))
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, key: CellKey) -> (i64, i64) {
        (
            i64::from(key.col) * i64::from(self.width),
            i64::from(key.row) * i64::from(self.height),
        )
    }

    /// Every cell touched by the rectangle spanned by two corner points.
    ///
    /// Corners may be given in any order. The result is the full row range
    /// times column range, in row-major order. Cells with negative indices
    /// are not addressable and are left out.
    pub fn range_of_cells(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<CellKey> {
        let (row_a, col_a) = self.cell_coords_at(x1.min(x2), y1.min(y2));
        let (row_b, col_b) = self.cell_coords_at(x1.max(x2), y1.max(y2));

        let rows = clamp_span(row_a, row_b);
        let cols = clamp_span(col_a, col_b);
        let (Some((row_start, row_end)), Some((col_start, col_end))) = (rows, cols) else {
            return Vec::new();
        };

        (row_start..=row_end)
            .flat_map(|row| (col_start..=col_end).map(move |col| CellKey::new(row, col)))
            .collect()
    }

    /// Smallest grid-aligned y at or below `bottom`.
    pub fn align_down(&self, bottom: i64) -> i64 {
        let h = i64::from(self.height);
        -((-bottom).div_euclid(h)) * h
    }
}

/// Narrow a canvas coordinate to `i32`, saturating at the bounds.
pub(crate) fn saturate_to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Restrict an inclusive index span to the non-negative range.
fn clamp_span(start: i64, end: i64) -> Option<(u32, u32)> {
    if end < 0 {
        return None;
    }
    let start = u32::try_from(start.max(0)).ok()?;
    let end = u32::try_from(end).ok()?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            FrameGrid::new(0, 32),
            Err(SheetError::InvalidGrid { width: 0, height: 32 })
        ));
        assert!(FrameGrid::new(32, 0).is_err());

        let mut grid = FrameGrid::new(16, 16).unwrap();
        assert!(grid.resize(0, 8).is_err());
        assert_eq!((grid.width(), grid.height()), (16, 16));
    }

    #[test]
    fn test_cell_key_at() {
        let grid = FrameGrid::new(32, 16).unwrap();
        assert_eq!(grid.cell_key_at(0, 0), Some(CellKey::new(0, 0)));
        assert_eq!(grid.cell_key_at(31, 15), Some(CellKey::new(0, 0)));
        assert_eq!(grid.cell_key_at(32, 16), Some(CellKey::new(1, 1)));
        assert_eq!(grid.cell_key_at(70, 40), Some(CellKey::new(2, 2)));
    }

    #[test]
    fn test_negative_points_floor_toward_negative_infinity() {
        let grid = FrameGrid::new(32, 32).unwrap();
        assert_eq!(grid.cell_coords_at(-1, -1), (-1, -1));
        assert_eq!(grid.cell_coords_at(-32, 5), (0, -1));
        assert_eq!(grid.cell_coords_at(-33, 5), (0, -2));
        assert_eq!(grid.cell_key_at(-1, 0), None);
    }

    #[test]
    fn test_point_lies_inside_its_cell() {
        for (cw, ch) in [(1, 1), (7, 3), (32, 32), (16, 48)] {
            let grid = FrameGrid::new(cw, ch).unwrap();
            for x in (0..200).step_by(13) {
                for y in (0..200).step_by(11) {
                    let key = grid.cell_key_at(x, y).unwrap();
                    let (ox, oy) = grid.cell_origin(key);
                    let (x, y) = (i64::from(x), i64::from(y));
                    assert!(ox <= x && x < ox + i64::from(cw));
                    assert!(oy <= y && y < oy + i64::from(ch));
                }
            }
        }
    }

    #[test]
    fn test_cell_origin() {
        let grid = FrameGrid::new(32, 16).unwrap();
        assert_eq!(grid.cell_origin(CellKey::new(3, 2)), (64, 48));
    }

    #[test]
    fn test_range_of_cells_is_full_rectangle() {
        let grid = FrameGrid::new(32, 32).unwrap();
        // Corners given bottom-right first.
        let cells = grid.range_of_cells(95, 40, 10, 0);
        assert_eq!(cells.len(), 2 * 3);
        assert_eq!(
            cells,
            vec![
                CellKey::new(0, 0),
                CellKey::new(0, 1),
                CellKey::new(0, 2),
                CellKey::new(1, 0),
                CellKey::new(1, 1),
                CellKey::new(1, 2),
            ]
        );
    }

    #[test]
    fn test_range_count_property() {
        let grid = FrameGrid::new(10, 20).unwrap();
        for (x1, y1, x2, y2) in [(0, 0, 0, 0), (5, 5, 95, 15), (99, 199, 3, 0), (10, 20, 30, 60)] {
            let (r1, c1) = grid.cell_coords_at(x1.min(x2), y1.min(y2));
            let (r2, c2) = grid.cell_coords_at(x1.max(x2), y1.max(y2));
            let expected = ((r2 - r1 + 1) * (c2 - c1 + 1)) as usize;
            assert_eq!(grid.range_of_cells(x1, y1, x2, y2).len(), expected);
        }
    }

    #[test]
    fn test_range_clips_negative_cells() {
        let grid = FrameGrid::new(32, 32).unwrap();
        assert_eq!(
            grid.range_of_cells(-40, -40, 10, 10),
            vec![CellKey::new(0, 0)]
        );
        assert!(grid.range_of_cells(-40, -40, -1, -1).is_empty());
    }

    #[test]
    fn test_saturate_to_i32() {
        assert_eq!(saturate_to_i32(-7), -7);
        assert_eq!(saturate_to_i32(i64::from(i32::MAX) + 1), i32::MAX);
        assert_eq!(saturate_to_i32(i64::from(i32::MIN) - 1), i32::MIN);
    }

    #[test]
    fn test_align_down() {
        let grid = FrameGrid::new(32, 32).unwrap();
        assert_eq!(grid.align_down(0), 0);
        assert_eq!(grid.align_down(1), 32);
        assert_eq!(grid.align_down(32), 32);
        assert_eq!(grid.align_down(33), 64);
        assert_eq!(grid.align_down(-5), 0);
    }
}
