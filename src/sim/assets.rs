//! Textures the game draws with, loaded once up front

use super::car::CarKind;
use crate::consts::{BANNER_FONT_SIZE, ORANGE, RED};
use crate::error::AssetError;
use crate::renderer::{TextLabel, Texture, TextureProvider};

/// Logical texture names
pub mod names {
    pub const ROAD: &str = "road";
    pub const PLAYER: &str = "player";
    pub const ENEMY: &str = "enemy";
    pub const FLAME: &str = "flame";
}

/// Every fixed texture the game uses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assets {
    pub road: Texture,
    pub player: Texture,
    pub enemy: Texture,
    /// Drawn in place of a crashed car
    pub flame: Texture,
    pub tap_to_start: Texture,
    pub game_over: Texture,
}

impl Assets {
    /// Load the sprites and rasterize the banners. Any failure is fatal.
    pub fn load<T: TextureProvider + ?Sized>(textures: &mut T) -> Result<Self, AssetError> {
        let tap_to_start = TextLabel::new("TAP TO START", BANNER_FONT_SIZE, ORANGE);
        let game_over = TextLabel::new("GAME OVER", BANNER_FONT_SIZE, RED);

        let assets = Self {
            road: textures.load(names::ROAD)?,
            player: textures.load(names::PLAYER)?,
            enemy: textures.load(names::ENEMY)?,
            flame: textures.load(names::FLAME)?,
            tap_to_start: textures.text(&tap_to_start)?,
            game_over: textures.text(&game_over)?,
        };
        log::info!("Assets loaded");
        Ok(assets)
    }

    /// Regular sprite for a car kind
    pub fn car(&self, kind: CarKind) -> Texture {
        match kind {
            CarKind::Player => self.player,
            CarKind::Enemy => self.enemy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::HeadlessTextures;

    #[test]
    fn test_load_and_lookup() {
        let mut textures = HeadlessTextures::new();
        let assets = Assets::load(&mut textures).unwrap();

        assert_eq!(assets.car(CarKind::Player), assets.player);
        assert_eq!(assets.car(CarKind::Enemy), assets.enemy);
        assert_eq!(textures.named(names::FLAME), Some(assets.flame));
        assert_eq!(textures.labels(), &["TAP TO START".to_string(), "GAME OVER".to_string()]);
    }
}
