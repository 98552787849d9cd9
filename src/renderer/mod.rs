//! Image draw protocol and its backends
//!
//! The game only ever draws textured rectangles. It talks to a
//! [`RenderContext`] once per frame and gets its textures from a
//! [`TextureProvider`]; everything GPU-specific lives in `pipeline`.

pub mod headless;
pub mod pipeline;
pub mod vertex;

pub use headless::{FrameRecorder, HeadlessTextures};
pub use pipeline::{GpuTextures, ImageRenderer, PixelSource, RgbaImage};
pub use vertex::{TexturePoints, TexturedVertex, quad_vertices};

use crate::error::AssetError;
use crate::geometry::Rect;

/// Opaque handle to a texture owned by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// A texture handle together with its pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

/// One textured rectangle to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Image {
    pub frame: Rect,
    pub texture: Texture,
}

impl Image {
    pub fn new(frame: Rect, texture: Texture) -> Self {
        Self { frame, texture }
    }
}

/// A line of text to rasterize into a texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// RGBA, 0-1
    pub color: [f32; 4],
}

impl TextLabel {
    pub fn new(text: impl Into<String>, font_size: f32, color: [f32; 4]) -> Self {
        Self {
            text: text.into(),
            font_size,
            color,
        }
    }
}

/// Per-frame drawing handle
///
/// Images are composited back to front in call order.
pub trait RenderContext {
    /// Milliseconds since the host started, monotonic across frames
    fn time(&self) -> f64;

    fn draw_image(&mut self, image: Image);
}

/// Source of texture handles
pub trait TextureProvider {
    /// Look up a bundled texture by its logical name
    fn load(&mut self, name: &str) -> Result<Texture, AssetError>;

    /// Rasterize a text label into a new texture
    fn text(&mut self, label: &TextLabel) -> Result<Texture, AssetError>;

    /// Hand back a texture that will not be drawn again. Named textures are
    /// never released.
    fn release(&mut self, _texture: Texture) {}
}
