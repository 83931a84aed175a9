//! Sprite atlas addressing and asynchronous loading.
//!
//! The atlas is a single image of `SPRITE_SIZE` squares laid out on a fixed
//! grid: a 1px lead-in, then sprites separated by a 2px gap on both axes. The
//! offset formula is a contract with the image asset.
//!
//! Loading happens off the render path. [`AtlasLoader::spawn`] decodes the
//! image on a blocking task and hands back an [`AtlasHandle`]; painters call
//! [`AtlasHandle::poll_ready`] before every frame and skip sprite work until it
//! returns an atlas.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::error::AtlasError;
use crate::fb::Rgb;
use crate::surface::Rect;
use crate::types::{
    PursuerColor, ATLAS_GAP, ATLAS_LEAD_IN, FRIGHTENED_ROW, PLAYER_MOUTH_FRAMES, PLAYER_ROW,
    PURSUER_IDLE_COLUMN, SPRITE_SIZE,
};

/// Highest column the renderer addresses, plus one.
pub const ATLAS_COLUMNS: u32 = PURSUER_IDLE_COLUMN + 2;

/// Highest row the renderer addresses, plus one.
pub const ATLAS_ROWS: u32 = FRIGHTENED_ROW + 1;

/// Pixel offset of sprite `index` along one atlas axis.
///
/// ```
/// use tui_pacman_term::atlas::sprite_offset;
///
/// assert_eq!(sprite_offset(0), 1);
/// assert_eq!(sprite_offset(1), 17);
/// assert_eq!(sprite_offset(5), 81);
/// ```
#[inline]
pub const fn sprite_offset(index: u32) -> u32 {
    index * (SPRITE_SIZE + ATLAS_GAP) + ATLAS_LEAD_IN
}

/// Source rectangle of the sprite at `(row, col)`.
pub fn sprite_rect(row: u32, col: u32) -> Rect {
    Rect::new(
        sprite_offset(col) as i32,
        sprite_offset(row) as i32,
        SPRITE_SIZE,
        SPRITE_SIZE,
    )
}

/// Decoded sprite atlas.
#[derive(Debug, Clone)]
pub struct Atlas {
    image: RgbaImage,
}

impl Atlas {
    /// Minimum image size that holds every sprite the renderer addresses.
    pub const fn min_size() -> (u32, u32) {
        (
            sprite_offset(ATLAS_COLUMNS - 1) + SPRITE_SIZE,
            sprite_offset(ATLAS_ROWS - 1) + SPRITE_SIZE,
        )
    }

    pub fn from_image(image: RgbaImage) -> Result<Self, AtlasError> {
        let (min_width, min_height) = Self::min_size();
        if image.width() < min_width || image.height() < min_height {
            return Err(AtlasError::TooSmall {
                width: image.width(),
                height: image.height(),
                min_width,
                min_height,
            });
        }
        Ok(Self { image })
    }

    /// Decode an atlas image from disk. Blocking.
    pub fn load(path: &Path) -> Result<Self, AtlasError> {
        let image = image::open(path)?.to_rgba8();
        Self::from_image(image)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Colour at `(x, y)` unless it is out of range or fully transparent.
    pub fn opaque_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        let Rgba([r, g, b, a]) = *self.image.get_pixel_checked(x, y)?;
        (a > 0).then_some(Rgb::new(r, g, b))
    }

    /// Generated atlas following the standard layout.
    ///
    /// Used when no image asset is configured.
    pub fn procedural() -> Self {
        let (w, h) = Self::min_size();
        let mut image = RgbaImage::new(w + 1, h + 1);

        for col in 0..PLAYER_MOUTH_FRAMES {
            // Column 2 is the closed mouth.
            let half_angle = [45.0_f32, 20.0, 0.0][col as usize];
            draw_player(&mut image, sprite_rect(PLAYER_ROW, col), half_angle);
        }
        for color in PursuerColor::ALL {
            for col in 0..ATLAS_COLUMNS {
                let look = (col / 2 < 4).then_some(col / 2);
                draw_pursuer(
                    &mut image,
                    sprite_rect(color.atlas_row(), col),
                    pursuer_rgba(color),
                    look,
                    col % 2 == 1,
                );
            }
        }
        for col in 0..ATLAS_COLUMNS {
            draw_pursuer(
                &mut image,
                sprite_rect(FRIGHTENED_ROW, col),
                Rgba([33, 33, 255, 255]),
                None,
                col % 2 == 1,
            );
        }

        Self { image }
    }
}

fn pursuer_rgba(color: PursuerColor) -> Rgba<u8> {
    match color {
        PursuerColor::Red => Rgba([255, 0, 0, 255]),
        PursuerColor::Pink => Rgba([255, 184, 255, 255]),
        PursuerColor::Cyan => Rgba([0, 255, 255, 255]),
        PursuerColor::Orange => Rgba([255, 184, 82, 255]),
    }
}

fn sprite_pixels(rect: Rect) -> impl Iterator<Item = (u32, u32, f32, f32)> {
    let s = SPRITE_SIZE as f32;
    (0..SPRITE_SIZE).flat_map(move |py| {
        (0..SPRITE_SIZE).map(move |px| {
            let dx = px as f32 + 0.5 - s / 2.0;
            let dy = py as f32 + 0.5 - s / 2.0;
            (rect.x as u32 + px, rect.y as u32 + py, dx, dy)
        })
    })
}

fn draw_player(image: &mut RgbaImage, rect: Rect, half_angle: f32) {
    let r = SPRITE_SIZE as f32 / 2.0 - 0.5;
    for (x, y, dx, dy) in sprite_pixels(rect) {
        if dx * dx + dy * dy > r * r {
            continue;
        }
        // The base sprite faces right.
        if dx > 0.0 && dy.atan2(dx).abs().to_degrees() < half_angle {
            continue;
        }
        image.put_pixel(x, y, Rgba([255, 255, 0, 255]));
    }
}

fn draw_pursuer(image: &mut RgbaImage, rect: Rect, body: Rgba<u8>, look: Option<u32>, phase: bool) {
    let half = SPRITE_SIZE as f32 / 2.0;
    let r = half - 0.5;
    let (ly, lx) = match look {
        Some(0) => (0.0, 1.0),
        Some(1) => (1.0, 0.0),
        Some(2) => (0.0, -1.0),
        Some(3) => (-1.0, 0.0),
        _ => (0.0, 0.0),
    };
    for (x, y, dx, dy) in sprite_pixels(rect) {
        let dome = dy < 0.0 && dx * dx + dy * dy <= r * r;
        let skirt = dy >= 0.0 && dx.abs() <= r;
        // Ragged hem alternates between the two animation phases.
        let notch = dy > half - 2.0 && ((dx + half) as u32 / 2 % 2 == 0) != phase;
        if !(dome || skirt) || notch {
            continue;
        }
        let mut color = body;
        for ex in [-2.5_f32, 2.5] {
            let (ex, ey) = (dx - ex, dy + 1.5);
            if ex * ex + ey * ey <= 4.0 {
                color = Rgba([255, 255, 255, 255]);
            }
            let (px, py) = (ex - lx, ey - ly);
            if look.is_some() && px * px + py * py <= 1.0 {
                color = Rgba([0, 0, 160, 255]);
            }
        }
        image.put_pixel(x, y, color);
    }
}

enum HandleState {
    Pending(oneshot::Receiver<Result<Atlas, AtlasError>>),
    Ready(Atlas),
    Failed,
}

/// Future-backed handle to an atlas that may still be loading.
pub struct AtlasHandle {
    state: HandleState,
}

impl std::fmt::Debug for AtlasHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            HandleState::Pending(_) => "pending",
            HandleState::Ready(_) => "ready",
            HandleState::Failed => "failed",
        };
        f.debug_struct("AtlasHandle").field("state", &state).finish()
    }
}

impl AtlasHandle {
    /// A handle that is ready immediately.
    pub fn ready(atlas: Atlas) -> Self {
        Self {
            state: HandleState::Ready(atlas),
        }
    }

    /// A handle fed by the returned sender.
    pub fn pending() -> (oneshot::Sender<Result<Atlas, AtlasError>>, Self) {
        let (tx, rx) = oneshot::channel();
        (
            tx,
            Self {
                state: HandleState::Pending(rx),
            },
        )
    }

    /// Readiness check; never blocks.
    ///
    /// Returns the atlas once loading has finished. A failed load stays
    /// `None` for good.
    pub fn poll_ready(&mut self) -> Option<&Atlas> {
        if let HandleState::Pending(rx) = &mut self.state {
            match rx.try_recv() {
                Ok(result) => self.settle(result),
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => self.settle(Err(AtlasError::LoaderGone)),
            }
        }
        match &self.state {
            HandleState::Ready(atlas) => Some(atlas),
            _ => None,
        }
    }

    /// Wait for loading to finish.
    pub async fn wait(&mut self) -> Option<&Atlas> {
        if let HandleState::Pending(rx) = &mut self.state {
            let result = rx.await.unwrap_or(Err(AtlasError::LoaderGone));
            self.settle(result);
        }
        match &self.state {
            HandleState::Ready(atlas) => Some(atlas),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, HandleState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, HandleState::Failed)
    }

    fn settle(&mut self, result: Result<Atlas, AtlasError>) {
        self.state = match result {
            Ok(atlas) => {
                info!(width = atlas.width(), height = atlas.height(), "sprite atlas ready");
                HandleState::Ready(atlas)
            }
            Err(e) => {
                warn!(error = %e, "sprite atlas unavailable, sprites will not be drawn");
                HandleState::Failed
            }
        };
    }
}

/// Spawns atlas decoding on the tokio blocking pool.
pub struct AtlasLoader;

impl AtlasLoader {
    /// Start loading `path`. Must be called from within a tokio runtime.
    pub fn spawn(path: impl Into<PathBuf>) -> AtlasHandle {
        let path = path.into();
        let (tx, handle) = AtlasHandle::pending();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(Atlas::load(&path));
        });
        handle
    }
}
