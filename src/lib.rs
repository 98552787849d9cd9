//! Rock'n'Race - dodge the oncoming traffic on an endless road
//!
//! Core modules:
//! - `sim`: Game state machine, entities, intro animation, input gestures
//! - `geometry`: Rectangles and device-coordinate conversion
//! - `renderer`: Image draw protocol, WebGPU image pipeline, headless backend
//! - `platform`: Browser texture/text sources
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod geometry;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{AssetError, ConfigError, GameError, RenderError};
pub use geometry::Rect;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Car width as a fraction of the screen width
    pub const CAR_WIDTH_RATIO: f32 = 0.25;
    /// Width / height of the player's car sprite
    pub const PLAYER_ASPECT_RATIO: f32 = 0.4;
    /// Width / height of the oncoming car sprite
    pub const ENEMY_ASPECT_RATIO: f32 = 0.5;

    /// Road block height as a fraction of the screen width
    pub const ROAD_BLOCK_RATIO: f32 = 0.25;
    /// Extra road blocks drawn above the screen so scrolling never shows a gap
    pub const ROAD_BLOCKS_BUFFER: usize = 3;

    /// Lane centers, as fractions of the screen width measured back from the right edge
    pub const LEFT_LANE: f32 = 0.75;
    pub const RIGHT_LANE: f32 = 0.25;

    /// Player spawns with this fraction of its height above the bottom edge
    pub const PLAYER_SPAWN_HEIGHT: f32 = 0.7;

    /// Overlay text sizes (points)
    pub const BANNER_FONT_SIZE: f32 = 28.0;
    pub const SCORE_FONT_SIZE: f32 = 16.0;
    /// Score overlay position: left inset and distance from the bottom edge
    pub const SCORE_INSET_X: f32 = 30.0;
    pub const SCORE_INSET_BOTTOM: f32 = 40.0;

    /// Text colors (RGBA)
    pub const ORANGE: [f32; 4] = [1.0, 0.5, 0.0, 1.0];
    pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    /// Clear color behind the road
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
