//! The frame-mapped configuration document written next to the atlas.

use crate::animation::AnimationRegistry;
use crate::error::Result;
use crate::types::{CellKey, FrameGrid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized sheet description.
///
/// ```json
/// {
///   "spritesheet": "spritesheet.png",
///   "frame_width": 32,
///   "frame_height": 32,
///   "animations": { "walk": ["0:0", "1:0"] },
///   "sound": ["step.mp3"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetConfig {
    /// File name of the atlas image.
    pub spritesheet: String,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Frame sequence of every animation, keyed by name.
    pub animations: BTreeMap<String, Vec<CellKey>>,
    /// Sound asset names in bundle order.
    #[serde(default)]
    pub sound: Vec<String>,
}

impl SheetConfig {
    /// Describe the current state of a sheet.
    pub fn new(
        spritesheet: impl Into<String>,
        grid: &FrameGrid,
        animations: &AnimationRegistry,
        sound: Vec<String>,
    ) -> Self {
        Self {
            spritesheet: spritesheet.into(),
            frame_width: grid.width(),
            frame_height: grid.height(),
            animations: animations
                .iter()
                .map(|a| (a.name.clone(), a.frames.clone()))
                .collect(),
            sound,
        }
    }

    /// Pretty-printed JSON text.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The frame grid this config describes.
    pub fn grid(&self) -> Result<FrameGrid> {
        FrameGrid::new(self.frame_width, self.frame_height)
    }

    /// Rebuild the animation registry from the stored sequences.
    pub fn registry(&self) -> Result<AnimationRegistry> {
        AnimationRegistry::from_sequences(
            self.animations
                .iter()
                .map(|(name, frames)| (name.clone(), frames.clone())),
        )
    }
}
