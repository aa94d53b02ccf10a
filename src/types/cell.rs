//! Grid cell addressing.

use crate::error::SheetError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One addressable grid square.
///
/// Ordering is row-major: keys compare by row first, then by column. The
/// packing pass relies on this ordering to lay out frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    pub row: u32,
    pub col: u32,
}

impl CellKey {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Key of the `index`-th band in a single-column atlas.
    pub fn band(index: u32) -> Self {
        Self { row: index, col: 0 }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

impl FromStr for CellKey {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SheetError::InvalidCellKey(s.to_string());
        let (row, col) = s.split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            row: parse_component(row).ok_or_else(invalid)?,
            col: parse_component(col).ok_or_else(invalid)?,
        })
    }
}

/// Parse a base-10 component with no sign, whitespace or leading zeros.
fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
