//! Named animations as ordered sequences of grid cells.

mod idle;

pub use idle::{idle_index, idle_name, is_idle_family, IDLE};

use crate::error::{Result, SheetError};
use crate::types::{CellKey, FrameGrid};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Animation names offered to the operator.
pub const PREDEFINED_ANIMATIONS: &[&str] = &[
    "idle",
    "walk",
    "listen",
    "fall",
    "jump",
    "land",
    "sleep",
    "sleep_transition",
];

/// Animations a complete sheet is expected to define.
pub const REQUIRED_ANIMATIONS: &[&str] = &[
    "idle",
    "walk",
    "listen",
    "fall",
    "jump",
    "sleep",
    "sleep_transition",
];

/// A named, ordered list of frames. Repeats are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    pub name: String,
    pub frames: Vec<CellKey>,
}

impl Animation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// All animations of a project, in creation order.
///
/// Names are unique, and the idle family is always `idle, idle-1, idle-2, ...`
/// with no gaps.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AnimationRegistry {
    animations: Vec<Animation>,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from stored sequences, e.g. a loaded config.
    ///
    /// Idle family members are renumbered by their numeric suffix, so a map
    /// holding `idle`, `idle-2` and `idle-10` comes back as `idle`, `idle-1`
    /// and `idle-2`.
    pub fn from_sequences<I, S>(sequences: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<CellKey>)>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for (name, frames) in sequences {
            let name = name.into();
            validate_name(&name)?;
            if registry.contains(&name) {
                return Err(SheetError::DuplicateName(name));
            }
            registry.animations.push(Animation { name, frames });
        }
        registry.renumber_idle_family();
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animation> + '_ {
        self.animations.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.animations.iter().map(|a| a.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Animation> {
        self.animations
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| SheetError::UnknownAnimation(name.to_string()))
    }

    /// Start a new, empty animation and return its actual name.
    ///
    /// Requests for any idle family name take the next free slot of the
    /// family instead of failing; other names fail with `DuplicateName` when
    /// already present.
    pub fn begin_animation(&mut self, name: &str) -> Result<String> {
        validate_name(name)?;
        let name = if is_idle_family(name) {
            self.next_idle_name()
        } else if self.contains(name) {
            return Err(SheetError::DuplicateName(name.to_string()));
        } else {
            name.to_string()
        };

        self.animations.push(Animation::new(name.clone()));
        Ok(name)
    }

    fn next_idle_name(&self) -> String {
        let mut index = 0;
        while self.contains(&idle_name(index)) {
            index += 1;
        }
        idle_name(index)
    }

    /// Names that [`begin_animation`](Self::begin_animation) would accept
    /// from the predefined list, with idle resolved to its next slot.
    pub fn available_presets(&self) -> Vec<String> {
        PREDEFINED_ANIMATIONS
            .iter()
            .filter_map(|&name| {
                if is_idle_family(name) {
                    Some(self.next_idle_name())
                } else if self.contains(name) {
                    None
                } else {
                    Some(name.to_string())
                }
            })
            .collect()
    }

    /// Required animations not defined yet.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_ANIMATIONS
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }

    /// Append frames that the animation does not already contain.
    ///
    /// Only the sequence as it was before the call is checked, so repeats
    /// inside `keys` are all appended. Returns the number of frames added.
    pub fn append_frames<I>(&mut self, name: &str, keys: I) -> Result<usize>
    where
        I: IntoIterator<Item = CellKey>,
    {
        let animation = self.get_mut(name)?;
        let existing: HashSet<CellKey> = animation.frames.iter().copied().collect();
        let before = animation.frames.len();
        animation
            .frames
            .extend(keys.into_iter().filter(|key| !existing.contains(key)));
        Ok(animation.frames.len() - before)
    }

    /// Append every cell of a pixel rectangle, row by row.
    pub fn select_frames(
        &mut self,
        name: &str,
        grid: &FrameGrid,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Result<usize> {
        self.append_frames(name, grid.range_of_cells(x1, y1, x2, y2))
    }

    /// Remove the frame at `index` and return it.
    pub fn remove_frame(&mut self, name: &str, index: usize) -> Result<CellKey> {
        let animation = self.get_mut(name)?;
        if index >= animation.frames.len() {
            return Err(SheetError::IndexOutOfRange {
                animation: name.to_string(),
                index,
                len: animation.frames.len(),
            });
        }
        Ok(animation.frames.remove(index))
    }

    /// Delete an animation. Deleting an idle family member renumbers the
    /// rest of the family.
    pub fn delete_animation(&mut self, name: &str) -> Result<Animation> {
        let index = self
            .animations
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| SheetError::UnknownAnimation(name.to_string()))?;
        let removed = self.animations.remove(index);

        if is_idle_family(name) {
            self.renumber_idle_family();
        }
        Ok(removed)
    }

    /// Rename an animation, keeping its frames.
    pub fn rename_animation(&mut self, from: &str, to: &str) -> Result<()> {
        validate_name(to)?;
        if from == to {
            return self.get_mut(from).map(|_| ());
        }
        if self.contains(to) {
            return Err(SheetError::DuplicateName(to.to_string()));
        }
        self.get_mut(from)?.name = to.to_string();

        if is_idle_family(from) || is_idle_family(to) {
            self.renumber_idle_family();
        }
        Ok(())
    }

    /// Restore the idle invariant: members are renamed to `idle, idle-1, ...`
    /// in order of their current index, frames unchanged.
    fn renumber_idle_family(&mut self) {
        let mut members: Vec<(u32, usize)> = self
            .animations
            .iter()
            .enumerate()
            .filter_map(|(pos, a)| idle_index(&a.name).map(|idx| (idx, pos)))
            .collect();
        members.sort_unstable();

        for (new_index, (old_index, pos)) in members.into_iter().enumerate() {
            let new_index = new_index as u32;
            if new_index != old_index {
                log::debug!(
                    "renaming {} to {}",
                    self.animations[pos].name,
                    idle_name(new_index)
                );
                self.animations[pos].name = idle_name(new_index);
            }
        }
    }

    /// Every cell referenced by any animation, in row-major order.
    pub fn used_cells(&self) -> BTreeSet<CellKey> {
        self.animations
            .iter()
            .flat_map(|a| a.frames.iter().copied())
            .collect()
    }

    /// Rewrite every frame through `remap`. Frames without an entry are dropped.
    pub fn apply_remap(&mut self, remap: &BTreeMap<CellKey, CellKey>) {
        for animation in &mut self.animations {
            let before = animation.frames.len();
            animation.frames = animation
                .frames
                .iter()
                .filter_map(|key| remap.get(key).copied())
                .collect();
            let dropped = before - animation.frames.len();
            if dropped > 0 {
                log::warn!(
                    "animation '{}' lost {} frame(s) with no image behind them",
                    animation.name,
                    dropped
                );
            }
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SheetError::InvalidAnimationName(name.to_string()));
    }
    Ok(())
}
