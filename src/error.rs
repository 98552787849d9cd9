//! Error types
//!
//! Gameplay itself cannot fail; errors only come from loading assets,
//! reading tuning files, and bringing up the GPU.

use std::path::PathBuf;

/// A texture or text label the game needs could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("texture `{name}` not found")]
    Missing { name: String },

    #[error("texture `{name}` could not be decoded: {reason}")]
    Decode { name: String, reason: String },

    #[error("failed to rasterize text `{text}`: {reason}")]
    Text { text: String, reason: String },

    #[error("browser API unavailable: {0}")]
    Platform(String),
}

/// A game could not be set up.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("screen size must be positive and finite, got {width}x{height}")]
    ScreenSize { width: f32, height: f32 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Tuning could not be read or is out of range.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// GPU bring-up failed.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
