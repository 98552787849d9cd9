//! CPU-side backend: records draw calls and hands out texture handles
//!
//! `FrameRecorder` doubles as the per-frame batch the GPU renderer consumes;
//! `HeadlessTextures` lets the game run without any graphics at all.

use std::collections::HashMap;

use super::{Image, RenderContext, TextLabel, Texture, TextureId, TextureProvider};
use crate::error::AssetError;

/// Records the images drawn during one frame
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    time: f64,
    images: Vec<Image>,
}

impl FrameRecorder {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            images: Vec::new(),
        }
    }

    /// Start a new frame at `time`, dropping the previous frame's images
    pub fn begin(&mut self, time: f64) {
        self.time = time;
        self.images.clear();
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Images drawn with the given texture, in draw order
    pub fn images_with(&self, texture: TextureId) -> impl Iterator<Item = &Image> {
        self.images.iter().filter(move |i| i.texture.id == texture)
    }
}

impl RenderContext for FrameRecorder {
    fn time(&self) -> f64 {
        self.time
    }

    fn draw_image(&mut self, image: Image) {
        self.images.push(image);
    }
}

/// Average glyph advance: 3/5 of the font size
const GLYPH_ADVANCE: (f32, f32) = (3.0, 5.0);
/// Line height: 6/5 of the font size
const LINE_HEIGHT: (f32, f32) = (6.0, 5.0);

/// In-memory texture provider
///
/// Named textures get a fixed 1x1 size; text labels are sized from a
/// monospace approximation so layout code sees realistic dimensions.
#[derive(Debug, Default)]
pub struct HeadlessTextures {
    named: HashMap<String, Texture>,
    labels: Vec<String>,
    released: Vec<TextureId>,
    next_id: u32,
}

impl HeadlessTextures {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, width: u32, height: u32) -> Texture {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        Texture { id, width, height }
    }

    /// Texture previously returned for `name`
    pub fn named(&self, name: &str) -> Option<Texture> {
        self.named.get(name).copied()
    }

    /// Every text rasterized so far, oldest first
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Textures handed back through `release`
    pub fn released(&self) -> &[TextureId] {
        &self.released
    }
}

impl TextureProvider for HeadlessTextures {
    fn load(&mut self, name: &str) -> Result<Texture, AssetError> {
        if let Some(texture) = self.named.get(name) {
            return Ok(*texture);
        }
        let texture = self.allocate(1, 1);
        self.named.insert(name.to_string(), texture);
        Ok(texture)
    }

    fn text(&mut self, label: &TextLabel) -> Result<Texture, AssetError> {
        let chars = label.text.chars().count() as f32;
        let width = (chars * label.font_size * GLYPH_ADVANCE.0 / GLYPH_ADVANCE.1).ceil() as u32;
        let height = (label.font_size * LINE_HEIGHT.0 / LINE_HEIGHT.1).ceil() as u32;
        self.labels.push(label.text.clone());
        Ok(self.allocate(width.max(1), height.max(1)))
    }

    fn release(&mut self, texture: Texture) {
        if !self.named.values().any(|t| t.id == texture.id) {
            self.released.push(texture.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_recorder_begin_clears() {
        let mut frame = FrameRecorder::new(0.0);
        let mut textures = HeadlessTextures::new();
        let road = textures.load("road").unwrap();

        frame.draw_image(Image::new(Rect::new(0.0, 0.0, 1.0, 1.0), road));
        assert_eq!(frame.images().len(), 1);

        frame.begin(16.0);
        assert_eq!(frame.time(), 16.0);
        assert!(frame.images().is_empty());
    }

    #[test]
    fn test_named_textures_are_stable() {
        let mut textures = HeadlessTextures::new();
        let a = textures.load("player").unwrap();
        let b = textures.load("enemy").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(textures.load("player").unwrap(), a);
        assert_eq!(textures.named("enemy"), Some(b));
    }

    #[test]
    fn test_text_size() {
        let mut textures = HeadlessTextures::new();
        let label = TextLabel::new("GAME OVER", 20.0, [1.0; 4]);
        let texture = textures.text(&label).unwrap();
        assert_eq!(texture.width, 108); // 9 chars * 12
        assert_eq!(texture.height, 24);
        assert_eq!(textures.labels(), &["GAME OVER".to_string()]);
    }
}
