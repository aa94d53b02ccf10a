//! WASM bindings for spritesheet-builder.
//!
//! This module provides JavaScript-friendly APIs for a browser editor.

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

fn js_err(e: crate::SheetError) -> JsError {
    JsError::new(&e.to_string())
}

fn string_array<I, S>(items: I) -> js_sys::Array
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| JsValue::from_str(s.as_ref()))
        .collect()
}

/// An editable spritesheet project.
#[wasm_bindgen]
pub struct ProjectHandle {
    inner: crate::Project,
}

#[wasm_bindgen]
impl ProjectHandle {
    /// Create an empty project with the given frame size.
    #[wasm_bindgen(constructor)]
    pub fn new(frame_width: u32, frame_height: u32) -> Result<ProjectHandle, JsError> {
        let settings = crate::ProjectSettings::default().with_grid(frame_width, frame_height);
        let inner = crate::Project::new(settings).map_err(js_err)?;
        Ok(ProjectHandle { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn frame_width(&self) -> u32 {
        self.inner.grid().width()
    }

    #[wasm_bindgen(getter)]
    pub fn frame_height(&self) -> u32 {
        self.inner.grid().height()
    }

    /// Change the frame size.
    pub fn set_grid(&mut self, frame_width: u32, frame_height: u32) -> Result<(), JsError> {
        self.inner.set_grid(frame_width, frame_height).map_err(js_err)
    }

    /// Get the number of placed images.
    #[wasm_bindgen(getter)]
    pub fn image_count(&self) -> usize {
        self.inner.images().len()
    }

    /// Add a PNG image below the existing ones and return its id.
    pub fn add_image(&mut self, name: &str, data: &[u8]) -> Result<usize, JsError> {
        let id = self.inner.add_image_bytes(name, data).map_err(js_err)?;
        Ok(id.0)
    }

    pub fn remove_image(&mut self, id: usize) -> Result<(), JsError> {
        self.inner
            .remove_image(crate::ImageId(id))
            .map(|_| ())
            .map_err(js_err)
    }

    /// Id of the topmost image under a canvas point.
    pub fn image_at(&self, x: i32, y: i32) -> Option<usize> {
        self.inner.images().image_at(x, y).map(|id| id.0)
    }

    /// Drag an image; returns the snapped `[x, y]`.
    pub fn move_image(&mut self, id: usize, x: i32, y: i32) -> Result<Vec<i32>, JsError> {
        let (x, y) = self
            .inner
            .move_image(crate::ImageId(id), x, y)
            .map_err(js_err)?;
        Ok(vec![x, y])
    }

    pub fn align_all(&mut self) {
        self.inner.align_all();
    }

    pub fn crop_sprites(&mut self) -> Result<(), JsError> {
        self.inner.crop_sprites().map_err(js_err)
    }

    /// Add an MP3 sound to the bundle.
    pub fn add_sound(&mut self, name: &str, data: Vec<u8>) -> Result<(), JsError> {
        self.inner.add_sound(name, data).map_err(js_err)
    }

    pub fn remove_sound(&mut self, index: usize) -> bool {
        self.inner.sounds_mut().remove(index).is_some()
    }

    /// Start an animation; returns the name actually used.
    pub fn begin_animation(&mut self, name: &str) -> Result<String, JsError> {
        self.inner.begin_animation(name).map_err(js_err)
    }

    /// Append the cells of a dragged rectangle to an animation.
    pub fn select_frames(
        &mut self,
        name: &str,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Result<usize, JsError> {
        self.inner.select_frames(name, x1, y1, x2, y2).map_err(js_err)
    }

    pub fn remove_frame(&mut self, name: &str, index: usize) -> Result<(), JsError> {
        self.inner
            .animations_mut()
            .remove_frame(name, index)
            .map(|_| ())
            .map_err(js_err)
    }

    pub fn delete_animation(&mut self, name: &str) -> Result<(), JsError> {
        self.inner
            .animations_mut()
            .delete_animation(name)
            .map(|_| ())
            .map_err(js_err)
    }

    /// Animation names in creation order.
    pub fn animation_names(&self) -> js_sys::Array {
        string_array(self.inner.animations().names())
    }

    /// Frames of an animation as `"row:col"` strings.
    pub fn frames(&self, name: &str) -> Result<js_sys::Array, JsError> {
        let animation = self
            .inner
            .animations()
            .get(name)
            .ok_or_else(|| js_err(crate::SheetError::UnknownAnimation(name.to_string())))?;
        Ok(string_array(animation.frames.iter().map(|k| k.to_string())))
    }

    /// Predefined names that can be started now.
    pub fn available_presets(&self) -> js_sys::Array {
        string_array(self.inner.animations().available_presets())
    }

    /// Required animations not defined yet.
    pub fn missing_required(&self) -> js_sys::Array {
        string_array(self.inner.animations().missing_required())
    }

    /// Pack the spritesheet and remap every animation.
    pub fn pack(&mut self) -> Result<PackResult, JsError> {
        let packed = self.inner.pack().map_err(js_err)?;
        Ok(PackResult {
            png_data: packed.to_png().map_err(js_err)?,
            width: packed.width,
            height: packed.height,
            frame_count: packed.band_count(),
        })
    }

    /// The configuration document as JSON.
    pub fn config_json(&self) -> Result<String, JsError> {
        self.inner.config_json().map_err(js_err)
    }

    /// ZIP bundle of atlas, config and sounds. Requires a prior `pack`.
    pub fn bundle(&self) -> Result<Vec<u8>, JsError> {
        self.inner.bundle().map_err(js_err)
    }

    /// Suggested download name for the bundle.
    #[wasm_bindgen(getter)]
    pub fn bundle_name(&self) -> String {
        self.inner.settings().bundle_name.clone()
    }
}

/// Packed atlas returned to JavaScript.
#[wasm_bindgen]
pub struct PackResult {
    png_data: Vec<u8>,
    width: u32,
    height: u32,
    frame_count: usize,
}

#[wasm_bindgen]
impl PackResult {
    /// Get the PNG binary data.
    #[wasm_bindgen(getter)]
    pub fn png_data(&self) -> Vec<u8> {
        self.png_data.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of frames in the atlas.
    #[wasm_bindgen(getter)]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}

/// Cell keys covered by a pixel rectangle, for selection highlighting.
#[wasm_bindgen]
pub fn cells_in_rect(
    frame_width: u32,
    frame_height: u32,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
) -> Result<js_sys::Array, JsError> {
    let grid = crate::FrameGrid::new(frame_width, frame_height).map_err(js_err)?;
    Ok(string_array(
        grid.range_of_cells(x1, y1, x2, y2).iter().map(|k| k.to_string()),
    ))
}
