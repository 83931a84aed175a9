//! Error types for the presentation layer.

use thiserror::Error;

/// Fatal construction-time configuration problems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick rate and render rate must be positive (tick {tick_rate}, render {render_rate})")]
    ZeroRate { tick_rate: u32, render_rate: u32 },

    #[error("render rate {render_rate} is not a whole multiple of tick rate {tick_rate}")]
    UnevenCadence { tick_rate: u32, render_rate: u32 },

    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("screen is too small: block size {block_size}px, need at least {min}px")]
    ScreenTooSmall { block_size: u32, min: u32 },

    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Sprite atlas loading failures.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to decode atlas image: {0}")]
    Image(#[from] image::ImageError),

    #[error("atlas is {width}x{height}px, layout needs at least {min_width}x{min_height}px")]
    TooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    #[error("atlas loader went away before finishing")]
    LoaderGone,
}
