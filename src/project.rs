//! A spritesheet project: images, animations, sounds and the frame grid.
//!
//! [`Project`] owns every store and is the unit the packing transaction runs
//! over. `pack` takes `&mut self`, so no edit can interleave with a pack.

use crate::animation::AnimationRegistry;
use crate::atlas::{self, PackedAtlas};
use crate::error::{Result, SheetError};
use crate::export::{bundle_to_bytes, SheetConfig};
use crate::placement::{loader, PlacementStore, SpriteImage, DEFAULT_SNAP_THRESHOLD};
use crate::sound::SoundStore;
use crate::types::{CellKey, FrameGrid, ImageId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Project-wide settings.
#[derive(Debug, Clone)]
pub struct ProjectSettings {
    /// Initial frame width.
    pub frame_width: u32,
    /// Initial frame height.
    pub frame_height: u32,
    /// Distance in pixels at which dragged images snap to grid lines.
    pub snap_threshold: u32,
    /// File name of the atlas inside the bundle and in the config.
    pub atlas_name: String,
    /// File name of the config inside the bundle.
    pub config_name: String,
    /// Suggested file name for the bundle.
    pub bundle_name: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            frame_width: 32,
            frame_height: 32,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            atlas_name: "spritesheet.png".to_string(),
            config_name: "config.json".to_string(),
            bundle_name: "skin.zip".to_string(),
        }
    }
}

impl ProjectSettings {
    /// Use a specific frame size.
    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.frame_width = width;
        self.frame_height = height;
        self
    }

    /// Use a specific snap threshold.
    pub fn with_snap_threshold(mut self, threshold: u32) -> Self {
        self.snap_threshold = threshold;
        self
    }
}

/// All state of one spritesheet being assembled.
#[derive(Debug)]
pub struct Project {
    settings: ProjectSettings,
    grid: FrameGrid,
    images: PlacementStore,
    animations: AnimationRegistry,
    sounds: SoundStore,
    packed: Option<PackedAtlas>,
    packed_config: Option<SheetConfig>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            settings: ProjectSettings::default(),
            grid: FrameGrid::default(),
            images: PlacementStore::new(),
            animations: AnimationRegistry::new(),
            sounds: SoundStore::new(),
            packed: None,
            packed_config: None,
        }
    }
}

impl Project {
    /// Create an empty project.
    pub fn new(settings: ProjectSettings) -> Result<Self> {
        let grid = FrameGrid::new(settings.frame_width, settings.frame_height)?;
        Ok(Self {
            settings,
            grid,
            ..Self::default()
        })
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn grid(&self) -> &FrameGrid {
        &self.grid
    }

    pub fn images(&self) -> &PlacementStore {
        &self.images
    }

    pub fn animations(&self) -> &AnimationRegistry {
        &self.animations
    }

    pub fn animations_mut(&mut self) -> &mut AnimationRegistry {
        &mut self.animations
    }

    pub fn sounds(&self) -> &SoundStore {
        &self.sounds
    }

    pub fn sounds_mut(&mut self) -> &mut SoundStore {
        &mut self.sounds
    }

    /// Result of the last successful pack.
    pub fn packed(&self) -> Option<&PackedAtlas> {
        self.packed.as_ref()
    }

    /// Change the frame size. Images stay where they are.
    pub fn set_grid(&mut self, width: u32, height: u32) -> Result<()> {
        self.grid.resize(width, height)
    }

    /// Place an image, at `position` or below everything already placed.
    pub fn add_image(&mut self, image: SpriteImage, position: Option<(i32, i32)>) -> ImageId {
        self.images.place(image, position, &self.grid)
    }

    /// Decode PNG bytes and place the image at the next free position.
    pub fn add_image_bytes(&mut self, name: &str, data: &[u8]) -> Result<ImageId> {
        let image = SpriteImage::from_png_bytes(name, data)?;
        Ok(self.add_image(image, None))
    }

    pub fn remove_image(&mut self, id: ImageId) -> Result<SpriteImage> {
        self.images.remove(id)
    }

    /// Drag an image to a proposed position, snapping toward grid lines.
    pub fn move_image(&mut self, id: ImageId, raw_x: i32, raw_y: i32) -> Result<(i32, i32)> {
        self.images
            .move_image(id, &self.grid, raw_x, raw_y, self.settings.snap_threshold)
    }

    /// Stack every image at x = 0 with bottoms on grid lines.
    pub fn align_all(&mut self) {
        self.images.align_all(&self.grid);
    }

    /// Trim every image to its opaque rows, then shrink the frame height to
    /// the shortest trimmed image if that is smaller than the current height.
    pub fn crop_sprites(&mut self) -> Result<()> {
        if let Some(min_height) = self.images.trim_all() {
            if min_height < self.grid.height() {
                log::info!(
                    "frame height reduced from {} to {}",
                    self.grid.height(),
                    min_height
                );
                self.grid.set_height(min_height)?;
            }
        }
        Ok(())
    }

    /// Add a sound asset (MP3 only).
    pub fn add_sound(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        self.sounds.add(name, data)
    }

    /// Start a new animation; see [`AnimationRegistry::begin_animation`].
    pub fn begin_animation(&mut self, name: &str) -> Result<String> {
        self.animations.begin_animation(name)
    }

    /// Append the cells of a pixel rectangle to an animation.
    pub fn select_frames(&mut self, name: &str, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<usize> {
        self.animations.select_frames(name, &self.grid, x1, y1, x2, y2)
    }

    /// Pack every used cell into a single-column atlas and rewrite all
    /// animations onto the new band keys.
    ///
    /// Missing required animations are reported but do not stop the pack.
    /// On failure neither the animations nor the previous pack result change.
    pub fn pack(&mut self) -> Result<&PackedAtlas> {
        let missing = self.animations.missing_required();
        if !missing.is_empty() {
            log::warn!("Missing required animations: {}", missing.join(", "));
        }

        let packed = atlas::pack(&self.images, &mut self.animations, &self.grid)?;
        log::info!(
            "packed {} frames into a {}x{} spritesheet",
            packed.band_count(),
            packed.width,
            packed.height
        );
        self.packed_config = Some(self.config());
        Ok(self.packed.insert(packed))
    }

    /// Configuration document for the current state.
    pub fn config(&self) -> SheetConfig {
        SheetConfig::new(
            self.settings.atlas_name.clone(),
            &self.grid,
            &self.animations,
            self.sounds.names(),
        )
    }

    pub fn config_json(&self) -> Result<String> {
        self.config().to_json_pretty()
    }

    /// ZIP bundle of the last packed atlas, the config and the sounds.
    ///
    /// Frame size and animations come from the state captured by the last
    /// pack, so edits made after it never disagree with the bundled atlas.
    pub fn bundle(&self) -> Result<Vec<u8>> {
        let (packed, config) = match (&self.packed, &self.packed_config) {
            (Some(packed), Some(config)) => (packed, config),
            _ => return Err(SheetError::NotPacked),
        };
        let config = SheetConfig {
            sound: self.sounds.names(),
            ..config.clone()
        };
        bundle_to_bytes(
            &packed.to_png()?,
            &config,
            &self.settings.config_name,
            &self.sounds,
        )
    }

    /// Load a project description file; relative paths resolve against the
    /// file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P, settings: ProjectSettings) -> Result<Self> {
        let path = path.as_ref();
        let file: ProjectFile = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        file.into_project(base, settings)
    }
}

/// JSON description of a project's inputs.
///
/// ```json
/// {
///   "frame_width": 32,
///   "frame_height": 32,
///   "images": [{ "path": "walk.png" }, { "path": "jump.png", "x": 0, "y": 64 }],
///   "animations": { "walk": ["0:0", "0:1"] },
///   "sounds": ["step.mp3"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default = "default_frame_size")]
    pub frame_width: u32,
    #[serde(default = "default_frame_size")]
    pub frame_height: u32,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
    #[serde(default)]
    pub animations: BTreeMap<String, Vec<CellKey>>,
    #[serde(default)]
    pub sounds: Vec<PathBuf>,
}

/// One image (or a directory of images) in a project file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEntry {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

fn default_frame_size() -> u32 {
    32
}

impl ProjectFile {
    /// Load every referenced asset and build the project.
    pub fn into_project(self, base: &Path, settings: ProjectSettings) -> Result<Project> {
        let settings = settings.with_grid(self.frame_width, self.frame_height);
        let mut project = Project::new(settings)?;

        for entry in &self.images {
            let path = base.join(&entry.path);
            if path.is_dir() {
                for sprite in loader::load_sprites_from_dir(&path)? {
                    project.add_image(sprite, None);
                }
                continue;
            }

            let sprite = loader::load_sprite(&path)?;
            let position = match (entry.x, entry.y) {
                (None, None) => None,
                (x, y) => {
                    let (free_x, free_y) = project.images.next_free_position(&project.grid);
                    Some((x.unwrap_or(free_x), y.unwrap_or(free_y)))
                }
            };
            project.add_image(sprite, position);
        }

        project.animations = AnimationRegistry::from_sequences(self.animations)?;

        for sound in &self.sounds {
            project.sounds.load(base.join(sound))?;
        }

        log::info!(
            "loaded project: {} images, {} animations, {} sounds",
            project.images.len(),
            project.animations.len(),
            project.sounds.len()
        );
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::solid;

    fn keys(text: &[&str]) -> Vec<CellKey> {
        text.iter().map(|k| k.parse().unwrap()).collect()
    }

    fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbaImage::from_pixel(width, height, image::Rgba(color))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_pack_then_config() {
        let mut project = Project::default();
        project
            .add_image_bytes("walk.png", &png_bytes(64, 32, [9, 9, 9, 255]))
            .unwrap();
        project.add_sound("step.mp3", b"ID3".to_vec()).unwrap();

        let walk = project.begin_animation("walk").unwrap();
        project.select_frames(&walk, 0, 0, 63, 0).unwrap();
        let idle = project.begin_animation("idle").unwrap();
        project
            .animations_mut()
            .append_frames(&idle, keys(&["0:1", "9:9"]))
            .unwrap();

        let packed = project.pack().unwrap();
        assert_eq!((packed.width, packed.height), (32, 64));

        let config = project.config();
        assert_eq!(config.animations["walk"], keys(&["0:0", "1:0"]));
        assert_eq!(config.animations["idle"], keys(&["1:0"]));
        assert_eq!(config.sound, vec!["step.mp3"]);
        assert_eq!(config.spritesheet, "spritesheet.png");
    }

    #[test]
    fn test_rejects_non_png_images() {
        let mut project = Project::default();
        assert!(matches!(
            project.add_image_bytes("step.mp3", b"ID3 audio"),
            Err(SheetError::InvalidInputFormat(_))
        ));
        assert!(project.images().is_empty());
    }

    #[test]
    fn test_bundle_requires_pack() {
        let mut project = Project::default();
        assert!(matches!(project.bundle(), Err(SheetError::NotPacked)));

        project.add_image(solid("a", 32, 32, [1, 2, 3, 255]), None);
        project.begin_animation("idle").unwrap();
        project.select_frames("idle", 0, 0, 0, 0).unwrap();
        project.pack().unwrap();

        let bytes = project.bundle().unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_bundle_matches_last_pack_after_edits() {
        let mut project = Project::default();
        project
            .add_image_bytes("walk.png", &png_bytes(64, 64, [4, 4, 4, 255]))
            .unwrap();
        project.begin_animation("walk").unwrap();
        project.select_frames("walk", 0, 0, 63, 0).unwrap();
        project.pack().unwrap();

        project.set_grid(16, 16).unwrap();
        project
            .animations_mut()
            .append_frames("walk", keys(&["3:3"]))
            .unwrap();
        project.add_sound("step.mp3", b"ID3".to_vec()).unwrap();

        let bytes = project.bundle().unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut json = String::new();
        std::io::Read::read_to_string(&mut archive.by_name("config.json").unwrap(), &mut json)
            .unwrap();
        let config = SheetConfig::from_json(&json).unwrap();
        let mut png = Vec::new();
        std::io::Read::read_to_end(&mut archive.by_name("spritesheet.png").unwrap(), &mut png)
            .unwrap();
        let atlas = image::load_from_memory(&png).unwrap();

        assert_eq!((config.frame_width, config.frame_height), (32, 32));
        assert_eq!(config.frame_width, atlas.width());
        assert_eq!(config.animations["walk"], keys(&["0:0", "1:0"]));
        assert_eq!(config.sound, vec!["step.mp3"]);
        assert!(archive.by_name("step.mp3").is_ok());
    }

    #[test]
    fn test_bundle_with_re_added_sound() {
        let mut project = Project::default();
        project.add_image(solid("a", 32, 32, [1, 2, 3, 255]), None);
        project.begin_animation("idle").unwrap();
        project.select_frames("idle", 0, 0, 0, 0).unwrap();
        project.add_sound("step.mp3", b"ID3old".to_vec()).unwrap();
        project.add_sound("step.mp3", b"ID3new".to_vec()).unwrap();
        project.pack().unwrap();

        let bytes = project.bundle().unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 3);
        let mut sound = Vec::new();
        std::io::Read::read_to_end(&mut archive.by_name("step.mp3").unwrap(), &mut sound).unwrap();
        assert_eq!(sound, b"ID3new");
    }

    #[test]
    fn test_failed_pack_keeps_previous_result() {
        let mut project = Project::default();
        assert!(matches!(project.pack(), Err(SheetError::NoInput)));

        project.add_image(solid("a", 32, 32, [1, 2, 3, 255]), None);
        project.begin_animation("walk").unwrap();
        project.select_frames("walk", 0, 0, 0, 0).unwrap();
        project.pack().unwrap();

        project.begin_animation("jump").unwrap();
        project
            .animations_mut()
            .append_frames("jump", keys(&["4:4"]))
            .unwrap();
        project.animations_mut().delete_animation("walk").unwrap();
        assert!(matches!(project.pack(), Err(SheetError::EmptyPack)));

        assert_eq!(project.animations().get("jump").unwrap().frames, keys(&["4:4"]));
        assert_eq!(project.packed().map(|p| p.band_count()), Some(1));
    }

    #[test]
    fn test_crop_sprites_shrinks_frame_height() {
        let mut project = Project::default();
        let mut pixels = vec![0u8; 32 * 32 * 4];
        for y in 10..30 {
            pixels[(y * 32) * 4 + 3] = 255;
        }
        let id = project.add_image(SpriteImage::new("a", 32, 32, pixels).unwrap(), Some((0, 0)));
        project.add_image(solid("b", 32, 32, [5, 5, 5, 255]), None);

        project.crop_sprites().unwrap();
        assert_eq!(project.grid().height(), 20);
        assert_eq!(project.grid().width(), 32);
        assert_eq!(project.images().get(id).map(|i| (i.y, i.height)), Some((10, 20)));
    }

    #[test]
    fn test_move_uses_snap_threshold() {
        let mut project = Project::new(ProjectSettings::default().with_snap_threshold(2)).unwrap();
        let id = project.add_image(solid("a", 32, 32, [1, 1, 1, 255]), None);
        assert_eq!(project.move_image(id, 5, 33).unwrap(), (5, 32));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("walk.png"), png_bytes(64, 16, [1, 1, 1, 255])).unwrap();
        std::fs::write(dir.path().join("jump.png"), png_bytes(16, 16, [2, 2, 2, 255])).unwrap();
        std::fs::create_dir(dir.path().join("extra")).unwrap();
        std::fs::write(dir.path().join("extra/land.png"), png_bytes(16, 8, [3, 3, 3, 255])).unwrap();
        std::fs::write(dir.path().join("step.mp3"), b"ID3").unwrap();

        let json = r#"{
            "frame_width": 16,
            "frame_height": 16,
            "images": [
                { "path": "walk.png" },
                { "path": "jump.png", "x": 0, "y": 48 },
                { "path": "extra" }
            ],
            "animations": { "walk": ["0:0", "0:1", "0:2"], "jump": ["3:0"] },
            "sounds": ["step.mp3"]
        }"#;
        let project_path = dir.path().join("project.json");
        std::fs::write(&project_path, json).unwrap();

        let mut project = Project::from_file(&project_path, ProjectSettings::default()).unwrap();
        assert_eq!(project.grid(), &FrameGrid::new(16, 16).unwrap());
        assert_eq!(project.images().len(), 3);
        let positions: Vec<_> = project.images().iter().map(|(_, i)| (i.name.clone(), i.y)).collect();
        assert_eq!(
            positions,
            vec![
                ("walk.png".to_string(), 0),
                ("jump.png".to_string(), 48),
                ("land.png".to_string(), 64),
            ]
        );
        assert_eq!(project.sounds().names(), vec!["step.mp3"]);

        project.pack().unwrap();
        let config = project.config();
        assert_eq!(config.animations["jump"], keys(&["3:0"]));
        assert_eq!(config.animations["walk"], keys(&["0:0", "1:0", "2:0"]));
    }

    #[test]
    fn test_from_file_rejects_zero_grid() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("project.json");
        std::fs::write(&project_path, r#"{ "frame_width": 0 }"#).unwrap();
        assert!(matches!(
            Project::from_file(&project_path, ProjectSettings::default()),
            Err(SheetError::InvalidGrid { width: 0, height: 32 })
        ));
    }
}
