//! Shared types used throughout the library.

mod cell;
mod grid;

pub use cell::CellKey;
pub use grid::FrameGrid;
pub(crate) use grid::saturate_to_i32;

/// Stable handle of an image in a [`PlacementStore`](crate::placement::PlacementStore).
///
/// Ids are never reused, so a handle kept across removals cannot silently
/// point at a different image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(pub usize);

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
