//! ZIP bundle with the atlas, its config and the sound assets.

use super::config::SheetConfig;
use crate::error::Result;
use crate::sound::SoundStore;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;

/// Write the bundle into `writer` and return it once the archive is finished.
///
/// The atlas is stored under `config.spritesheet`, the config under
/// `config_name`, and each sound under its own name.
pub fn write_bundle<W: Write + Seek>(
    writer: W,
    atlas_png: &[u8],
    config: &SheetConfig,
    config_name: &str,
    sounds: &SoundStore,
) -> Result<W> {
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut zip = zip::ZipWriter::new(writer);

    zip.start_file(config.spritesheet.as_str(), options)?;
    zip.write_all(atlas_png)?;

    zip.start_file(config_name, options)?;
    zip.write_all(config.to_json_pretty()?.as_bytes())?;

    for sound in sounds.iter() {
        zip.start_file(sound.name.as_str(), options)?;
        zip.write_all(&sound.data)?;
    }

    Ok(zip.finish()?)
}

/// Build the bundle in memory.
pub fn bundle_to_bytes(
    atlas_png: &[u8],
    config: &SheetConfig,
    config_name: &str,
    sounds: &SoundStore,
) -> Result<Vec<u8>> {
    let cursor = write_bundle(
        std::io::Cursor::new(Vec::new()),
        atlas_png,
        config,
        config_name,
        sounds,
    )?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Read;

    #[test]
    fn test_bundle_contents() {
        let config = SheetConfig {
            spritesheet: "spritesheet.png".to_string(),
            frame_width: 8,
            frame_height: 8,
            animations: BTreeMap::new(),
            sound: vec!["jump.mp3".to_string()],
        };
        let mut sounds = SoundStore::new();
        sounds.add("jump.mp3", b"ID3data".to_vec()).unwrap();

        let bytes = bundle_to_bytes(b"\x89PNGfake", &config, "config.json", &sounds).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();

        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["config.json", "jump.mp3", "spritesheet.png"]);

        let mut json = String::new();
        archive
            .by_name("config.json")
            .unwrap()
            .read_to_string(&mut json)
            .unwrap();
        assert_eq!(SheetConfig::from_json(&json).unwrap(), config);

        let mut sound = Vec::new();
        archive.by_name("jump.mp3").unwrap().read_to_end(&mut sound).unwrap();
        assert_eq!(sound, b"ID3data");
    }
}
