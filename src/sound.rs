//! Sound assets bundled alongside the spritesheet.

use crate::error::{Result, SheetError};
use std::path::Path;

/// An MP3 file carried through to the exported bundle untouched.
#[derive(Debug, Clone)]
pub struct SoundAsset {
    pub name: String,
    pub data: Vec<u8>,
}

/// Sounds in the order they were added.
#[derive(Debug, Default, Clone)]
pub struct SoundStore {
    sounds: Vec<SoundAsset>,
}

impl SoundStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sound. Only `.mp3` files are accepted; a sound with the same
    /// name is replaced in place.
    pub fn add(&mut self, name: impl Into<String>, data: Vec<u8>) -> Result<()> {
        let name = name.into();
        ensure_mp3(&name)?;
        match self.sounds.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                log::debug!("replacing sound {}", name);
                existing.data = data;
            }
            None => self.sounds.push(SoundAsset { name, data }),
        }
        Ok(())
    }

    /// Read an MP3 file from disk.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        ensure_mp3(&name)?;
        let data = std::fs::read(path)?;
        self.add(name, data)
    }

    /// Remove the sound at `index`.
    pub fn remove(&mut self, index: usize) -> Option<SoundAsset> {
        (index < self.sounds.len()).then(|| self.sounds.remove(index))
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SoundAsset> + '_ {
        self.sounds.iter()
    }

    /// Asset names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.sounds.iter().map(|s| s.name.clone()).collect()
    }
}

fn ensure_mp3(name: &str) -> Result<()> {
    let is_mp3 = Path::new(name)
        .extension()
        .map(|e| e.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false);
    if !is_mp3 {
        return Err(SheetError::InvalidInputFormat(format!(
            "{} is not an MP3 sound",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_only_mp3() {
        let mut sounds = SoundStore::new();
        sounds.add("jump.mp3", vec![1, 2, 3]).unwrap();
        sounds.add("LAND.MP3", vec![]).unwrap();
        assert!(matches!(
            sounds.add("theme.ogg", vec![]),
            Err(SheetError::InvalidInputFormat(_))
        ));
        assert!(sounds.add("mp3", vec![]).is_err());
        assert_eq!(sounds.names(), vec!["jump.mp3", "LAND.MP3"]);
    }

    #[test]
    fn test_same_name_replaces() {
        let mut sounds = SoundStore::new();
        sounds.add("step.mp3", vec![1]).unwrap();
        sounds.add("jump.mp3", vec![2]).unwrap();
        sounds.add("step.mp3", vec![3]).unwrap();
        assert_eq!(sounds.names(), vec!["step.mp3", "jump.mp3"]);
        assert_eq!(sounds.iter().next().map(|s| s.data.clone()), Some(vec![3]));
    }

    #[test]
    fn test_remove() {
        let mut sounds = SoundStore::new();
        sounds.add("a.mp3", vec![]).unwrap();
        sounds.add("b.mp3", vec![]).unwrap();
        assert_eq!(sounds.remove(0).map(|s| s.name), Some("a.mp3".to_string()));
        assert!(sounds.remove(5).is_none());
        assert_eq!(sounds.names(), vec!["b.mp3"]);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("step.mp3");
        std::fs::write(&path, b"ID3fake").unwrap();

        let mut sounds = SoundStore::new();
        sounds.load(&path).unwrap();
        assert_eq!(sounds.iter().next().map(|s| s.data.as_slice()), Some(&b"ID3fake"[..]));

        assert!(matches!(
            sounds.load(dir.path().join("missing.wav")),
            Err(SheetError::InvalidInputFormat(_))
        ));
    }
}
