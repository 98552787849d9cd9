//! The endlessly scrolling road

use glam::Vec2;

use crate::consts::{ROAD_BLOCK_RATIO, ROAD_BLOCKS_BUFFER};
use crate::geometry::Rect;
use crate::renderer::{Image, RenderContext, Texture};

/// Road strip tiled from the bottom of the screen upward
#[derive(Debug, Clone)]
pub struct Road {
    screen_size: Vec2,
    /// Scroll distance per drawn frame (points)
    pub speed: f32,
    offset: f32,
}

impl Road {
    pub fn new(screen_size: Vec2) -> Self {
        Self {
            screen_size,
            speed: 0.0,
            offset: 0.0,
        }
    }

    /// One tile: full screen width, a quarter of that high
    pub fn block_size(&self) -> Vec2 {
        Vec2::new(self.screen_size.x, self.screen_size.x * ROAD_BLOCK_RATIO)
    }

    /// Tiles needed to cover the screen while scrolling
    pub fn block_count(&self) -> usize {
        let block_height = self.block_size().y;
        (self.screen_size.y / block_height).ceil() as usize + ROAD_BLOCKS_BUFFER
    }

    /// Draw the tiles, then scroll by `speed`
    pub fn draw(&mut self, ctx: &mut dyn RenderContext, texture: Texture) {
        let block = self.block_size();

        for i in 0..self.block_count() {
            let y = self.screen_size.y - i as f32 * block.y + self.offset;
            let frame = Rect::new(0.0, y, block.x, block.y);
            ctx.draw_image(Image::new(frame, texture));
        }

        self.offset = if self.offset > block.y {
            0.0
        } else {
            self.offset + self.speed
        };
    }
}
