//! Output formats.
//!
//! This module provides the configuration document and the ZIP bundle
//! that ships it together with the atlas and sounds.

pub mod bundle;
pub mod config;

pub use bundle::{bundle_to_bytes, write_bundle};
pub use config::SheetConfig;
