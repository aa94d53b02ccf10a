//! Loading sprite images from files and directories.

use super::SpriteImage;
use crate::error::{Result, SheetError};
use std::path::Path;

/// Load a single PNG file as a sprite named after the file.
pub fn load_sprite<P: AsRef<Path>>(path: P) -> Result<SpriteImage> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    SpriteImage::from_png_bytes(file_name(path), &data)
}

/// Load every PNG file in a directory, ordered by file name.
///
/// Entries that are not PNG images are skipped with a warning.
pub fn load_sprites_from_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<SpriteImage>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(SheetError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut sprites = Vec::new();
    for path in paths {
        let is_png = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if !is_png {
            log::warn!("Skipping {}: not a PNG file", path.display());
            continue;
        }

        match load_sprite(&path) {
            Ok(sprite) => sprites.push(sprite),
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    Ok(sprites)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
