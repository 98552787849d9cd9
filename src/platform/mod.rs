//! Browser pixel sources
//!
//! Sprites come from `<img id="texture-NAME">` elements in the page; text is
//! rasterized with an offscreen 2D canvas. Both are read back as RGBA for
//! upload by the GPU texture store.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::error::AssetError;
use crate::renderer::{PixelSource, RgbaImage, TextLabel};

/// Font stack used for every label
const FONT_FAMILY: &str = "system-ui, -apple-system, sans-serif";
/// Line height as a multiple of the font size
const LINE_HEIGHT: f64 = 1.2;

/// Element id of the `<img>` holding a named texture
pub fn texture_element_id(name: &str) -> String {
    format!("texture-{name}")
}

/// CSS color for an RGBA 0-1 color
pub fn css_color([r, g, b, a]: [f32; 4]) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgba({}, {}, {}, {})", channel(r), channel(g), channel(b), a.clamp(0.0, 1.0))
}

/// Reads textures and text out of the DOM
pub struct WebPixelSource {
    document: Document,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebPixelSource {
    pub fn new(document: Document) -> Result<Self, AssetError> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| AssetError::Platform(format!("create canvas: {e:?}")))?
            .dyn_into()
            .map_err(|_| AssetError::Platform("element is not a canvas".into()))?;

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| AssetError::Platform(format!("2d context: {e:?}")))?
            .ok_or_else(|| AssetError::Platform("2d context unsupported".into()))?
            .dyn_into()
            .map_err(|_| AssetError::Platform("not a 2d context".into()))?;

        Ok(Self {
            document,
            canvas,
            ctx,
        })
    }

    /// Resize the scratch canvas (which also clears it and resets its state)
    fn prepare(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.ctx
            .clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
    }

    fn read_back(&self, width: u32, height: u32) -> Result<Vec<u8>, String> {
        let data = self
            .ctx
            .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
            .map_err(|e| format!("{e:?}"))?;
        Ok(data.data().0)
    }
}

impl PixelSource for WebPixelSource {
    fn image(&mut self, name: &str) -> Result<RgbaImage, AssetError> {
        let missing = || AssetError::Missing {
            name: name.to_string(),
        };
        let img: HtmlImageElement = self
            .document
            .get_element_by_id(&texture_element_id(name))
            .ok_or_else(missing)?
            .dyn_into()
            .map_err(|_| missing())?;

        if !img.complete() {
            return Err(AssetError::Decode {
                name: name.to_string(),
                reason: "image has not finished loading".into(),
            });
        }

        let (width, height) = (img.natural_width(), img.natural_height());
        self.prepare(width, height);
        self.ctx
            .draw_image_with_html_image_element(&img, 0.0, 0.0)
            .map_err(|e| AssetError::Decode {
                name: name.to_string(),
                reason: format!("{e:?}"),
            })?;
        let pixels = self.read_back(width, height).map_err(|reason| AssetError::Decode {
            name: name.to_string(),
            reason,
        })?;

        let image = RgbaImage {
            width,
            height,
            pixels,
        };
        image.validate(name)?;
        log::debug!("Read texture {name} ({width}x{height})");
        Ok(image)
    }

    fn text(&mut self, label: &TextLabel) -> Result<RgbaImage, AssetError> {
        let text_error = |reason: String| AssetError::Text {
            text: label.text.clone(),
            reason,
        };
        let font = format!("{}px {FONT_FAMILY}", label.font_size);

        // Measure with the font set, then size the canvas (which resets the font)
        self.ctx.set_font(&font);
        let metrics = self
            .ctx
            .measure_text(&label.text)
            .map_err(|e| text_error(format!("{e:?}")))?;
        let width = (metrics.width().ceil() as u32).max(1);
        let height = ((f64::from(label.font_size) * LINE_HEIGHT).ceil() as u32).max(1);

        self.prepare(width, height);
        self.ctx.set_font(&font);
        self.ctx.set_text_baseline("top");
        self.ctx.set_fill_style_str(&css_color(label.color));
        self.ctx
            .fill_text(&label.text, 0.0, 0.0)
            .map_err(|e| text_error(format!("{e:?}")))?;

        let pixels = self.read_back(width, height).map_err(text_error)?;
        let image = RgbaImage {
            width,
            height,
            pixels,
        };
        image.validate(&label.text)?;
        Ok(image)
    }
}
