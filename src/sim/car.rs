//! Cars: the player's and the oncoming one

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::assets::Assets;
use crate::consts::{CAR_WIDTH_RATIO, ENEMY_ASPECT_RATIO, PLAYER_ASPECT_RATIO};
use crate::geometry::Rect;
use crate::renderer::{Image, RenderContext};

/// Which car this is; decides the sprite and its proportions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarKind {
    Player,
    Enemy,
}

impl CarKind {
    /// Sprite width divided by height
    pub const fn aspect_ratio(self) -> f32 {
        match self {
            CarKind::Player => PLAYER_ASPECT_RATIO,
            CarKind::Enemy => ENEMY_ASPECT_RATIO,
        }
    }
}

/// A car positioned by its center
#[derive(Debug, Clone)]
pub struct Car {
    kind: CarKind,
    screen_size: Vec2,
    pub center: Vec2,
    pub is_crashed: bool,
}

impl Car {
    pub fn new(kind: CarKind, screen_size: Vec2) -> Self {
        Self {
            kind,
            screen_size,
            center: Vec2::ZERO,
            is_crashed: false,
        }
    }

    /// A quarter of the screen wide, height from the sprite's aspect ratio
    pub fn size(&self) -> Vec2 {
        let width = self.screen_size.x * CAR_WIDTH_RATIO;
        Vec2::new(width, width / self.kind.aspect_ratio())
    }

    pub fn frame(&self) -> Rect {
        Rect::from_center(self.center, self.size())
    }

    /// Draw the car, or a fireball where it was once it has crashed
    pub fn draw(&self, ctx: &mut dyn RenderContext, assets: &Assets) {
        let texture = if self.is_crashed {
            assets.flame
        } else {
            assets.car(self.kind)
        };
        ctx.draw_image(Image::new(self.frame(), texture));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{FrameRecorder, HeadlessTextures};

    const SCREEN: Vec2 = Vec2::new(400.0, 800.0);

    #[test]
    fn test_frame_size_per_kind() {
        let player = Car::new(CarKind::Player, SCREEN);
        let enemy = Car::new(CarKind::Enemy, SCREEN);

        assert_eq!(player.size(), Vec2::new(100.0, 250.0));
        assert_eq!(enemy.size(), Vec2::new(100.0, 200.0));
    }

    #[test]
    fn test_frame_is_centered() {
        let mut car = Car::new(CarKind::Enemy, SCREEN);
        car.center = Vec2::new(100.0, 300.0);

        let frame = car.frame();
        assert_eq!(frame.origin, Vec2::new(50.0, 200.0));
        assert_eq!(frame.center(), car.center);
    }

    #[test]
    fn test_draw_picks_texture() {
        let mut textures = HeadlessTextures::new();
        let assets = Assets::load(&mut textures).unwrap();
        let mut car = Car::new(CarKind::Player, SCREEN);

        let mut frame = FrameRecorder::new(0.0);
        car.draw(&mut frame, &assets);
        assert_eq!(frame.images().len(), 1);
        assert_eq!(frame.images()[0].texture, assets.player);
        assert_eq!(frame.images()[0].frame, car.frame());

        car.is_crashed = true;
        frame.begin(16.0);
        car.draw(&mut frame, &assets);
        assert_eq!(frame.images()[0].texture, assets.flame);
    }
}
