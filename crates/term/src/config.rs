//! Render configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::{Difficulty, DEFAULT_RENDER_RATE, DEFAULT_TICK_RATE};

/// Tick and render cadence.
///
/// The render rate must be a whole multiple of the tick rate so every tick
/// gets the same number of sub-frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCadence {
    tick_rate: u32,
    render_rate: u32,
}

impl Default for FrameCadence {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            render_rate: DEFAULT_RENDER_RATE,
        }
    }
}

impl FrameCadence {
    /// ```
    /// use tui_pacman_term::config::FrameCadence;
    ///
    /// assert_eq!(FrameCadence::new(5, 20).unwrap().subframes(), 4);
    /// assert!(FrameCadence::new(5, 22).is_err());
    /// ```
    pub fn new(tick_rate: u32, render_rate: u32) -> Result<Self, ConfigError> {
        if tick_rate == 0 || render_rate == 0 {
            return Err(ConfigError::ZeroRate {
                tick_rate,
                render_rate,
            });
        }
        if render_rate % tick_rate != 0 {
            return Err(ConfigError::UnevenCadence {
                tick_rate,
                render_rate,
            });
        }
        Ok(Self {
            tick_rate,
            render_rate,
        })
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn render_rate(&self) -> u32 {
        self.render_rate
    }

    /// Sub-frames per tick, always at least one.
    pub fn subframes(&self) -> u32 {
        self.render_rate / self.tick_rate
    }

    /// Wait before each sub-frame.
    pub fn render_interval(&self) -> Duration {
        Duration::from_secs(1) / self.render_rate
    }

    /// Interpolation fraction of sub-frame `s` (1-based).
    pub fn fraction(&self, s: u32) -> f32 {
        s as f32 / self.subframes() as f32
    }
}

/// Settings for the demo binary, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub cadence: FrameCadence,
    pub difficulty: Difficulty,
    /// PNG atlas; the built-in atlas is used when unset.
    pub atlas_path: Option<PathBuf>,
    /// Log file; logging is off when unset.
    pub log_path: Option<PathBuf>,
    pub tick_limit: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cadence: FrameCadence::default(),
            difficulty: Difficulty::Normal,
            atlas_path: None,
            log_path: None,
            tick_limit: None,
        }
    }
}

impl RenderConfig {
    /// Read `PACMAN_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let tick_rate = parse(&get, "PACMAN_TICK_RATE")?.unwrap_or(DEFAULT_TICK_RATE);
        let render_rate = parse(&get, "PACMAN_RENDER_RATE")?.unwrap_or(DEFAULT_RENDER_RATE);
        let cadence = FrameCadence::new(tick_rate, render_rate)?;

        let difficulty = match get("PACMAN_DIFFICULTY") {
            None => Difficulty::Normal,
            Some(s) => Difficulty::from_str(&s).ok_or(ConfigError::InvalidEnv {
                key: "PACMAN_DIFFICULTY",
                value: s,
            })?,
        };

        Ok(Self {
            cadence,
            difficulty,
            atlas_path: get("PACMAN_ATLAS_PATH").map(PathBuf::from),
            log_path: get("PACMAN_LOG_PATH").map(PathBuf::from),
            tick_limit: parse(&get, "PACMAN_TICK_LIMIT")?,
        })
    }
}

fn parse<T, G>(get: &G, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value }),
    }
}
