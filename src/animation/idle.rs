//! Naming of the auto-numbered "idle" animation family.
//!
//! Members are named `idle`, `idle-1`, `idle-2`, ... and are kept contiguous.

/// Base name of the family.
pub const IDLE: &str = "idle";

/// Position of a name within the idle family, or `None` for other names.
///
/// `idle` is 0 and `idle-N` is N for N >= 1 written without leading zeros.
pub fn idle_index(name: &str) -> Option<u32> {
    if name == IDLE {
        return Some(0);
    }
    let suffix = name.strip_prefix(IDLE)?.strip_prefix('-')?;
    if suffix.is_empty() || suffix.starts_with('0') || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Whether a name belongs to the idle family.
pub fn is_idle_family(name: &str) -> bool {
    idle_index(name).is_some()
}

/// Name of the idle family member at `index`.
pub fn idle_name(index: u32) -> String {
    if index == 0 {
        IDLE.to_string()
    } else {
        format!("{}-{}", IDLE, index)
    }
}
