//! Spritesheet packing.
//!
//! This module cuts every cell referenced by an animation out of the placed
//! images, stacks the frames into a single column, and remaps the animations
//! onto the new band keys.

mod builder;

pub use builder::{pack, pack_cells, AtlasBuilder, PackedAtlas, PackedFrame};
