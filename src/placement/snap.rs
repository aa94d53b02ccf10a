//! Edge snapping toward grid lines while dragging an image.

use crate::types::FrameGrid;

/// Default attraction distance in pixels.
pub const DEFAULT_SNAP_THRESHOLD: u32 = 10;

/// Adjust a proposed top-left position toward nearby grid lines.
///
/// Each axis is handled independently. The grid line nearest to the leading
/// edge is found first; the trailing edge is compared against the line one
/// cell further. The trailing edge wins when it is strictly closer than the
/// leading edge and within `threshold`; otherwise the leading edge snaps if it
/// is within `threshold`. Positions that are not near a line are returned
/// unchanged.
pub fn snap_position(
    grid: &FrameGrid,
    width: u32,
    height: u32,
    raw_x: i32,
    raw_y: i32,
    threshold: u32,
) -> (i32, i32) {
    (
        snap_axis(raw_x, width, grid.width(), threshold),
        snap_axis(raw_y, height, grid.height(), threshold),
    )
}

fn snap_axis(raw: i32, size: u32, cell: u32, threshold: u32) -> i32 {
    let (pos, size, cell, threshold) = (
        i64::from(raw),
        i64::from(size),
        i64::from(cell),
        i64::from(threshold),
    );

    // Round half up, matching the nearest-line rule used for the leading edge.
    let nearest = (2 * pos + cell).div_euclid(2 * cell) * cell;
    let to_leading = (pos - nearest).abs();
    let to_trailing = (pos + size - (nearest + cell)).abs();

    let snapped = if to_trailing < to_leading && to_trailing < threshold {
        nearest + cell - size
    } else if to_leading < threshold {
        nearest
    } else {
        pos
    };

    i32::try_from(snapped).unwrap_or(raw)
}
