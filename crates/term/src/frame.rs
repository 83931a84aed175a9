//! Frame orchestration.
//!
//! One tick is shown as `subframes` evenly spaced frames. The loop is single
//! threaded: it sleeps before each frame, repaints every moving entity at the
//! frame's fraction, presents, and only after the tick's last frame touches
//! the engine. Input and cancellation are looked at exclusively at that tick
//! boundary, so a half-interpolated frame is never left on screen.

use anyhow::Result;
use tracing::{debug, info};

use crate::atlas::AtlasHandle;
use crate::config::FrameCadence;
use crate::entities::EntityRenderer;
use crate::surface::Surface;
use crate::types::MovingEntity;
use tui_pacman_core::GameEngine;
use tui_pacman_input::PendingInput;

/// Pushes a finished frame somewhere visible.
pub trait Presenter<S> {
    fn present(&mut self, surface: &mut S) -> Result<()>;
}

impl<S, F> Presenter<S> for F
where
    F: FnMut(&mut S) -> Result<()>,
{
    fn present(&mut self, surface: &mut S) -> Result<()> {
        self(surface)
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    GameOver,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    /// Frames presented, including ones skipped while the atlas loaded.
    pub frames: u64,
    /// Frames that actually repainted entities.
    pub drawn_frames: u64,
    pub score: u32,
    pub lives: u8,
    pub outcome: Outcome,
}

/// Drives an engine and a surface at a fixed cadence.
pub struct FrameLoop<E, S, P> {
    engine: E,
    surface: S,
    presenter: P,
    renderer: EntityRenderer,
    atlas: AtlasHandle,
    cadence: FrameCadence,
    input: Option<PendingInput>,
}

impl<E, S, P> FrameLoop<E, S, P>
where
    E: GameEngine,
    S: Surface,
    P: Presenter<S>,
{
    pub fn new(
        engine: E,
        surface: S,
        presenter: P,
        renderer: EntityRenderer,
        atlas: AtlasHandle,
        cadence: FrameCadence,
    ) -> Self {
        Self {
            engine,
            surface,
            presenter,
            renderer,
            atlas,
            cadence,
            input: None,
        }
    }

    /// Read headings and quit requests from `input` at each tick boundary.
    pub fn with_input(mut self, input: PendingInput) -> Self {
        self.input = Some(input);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn renderer(&self) -> &EntityRenderer {
        &self.renderer
    }

    pub fn into_parts(self) -> (E, S, P) {
        (self.engine, self.surface, self.presenter)
    }

    /// Run until the engine reports game over or a quit is requested.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let subframes = self.cadence.subframes();
        let interval = self.cadence.render_interval();
        info!(
            tick_rate = self.cadence.tick_rate(),
            render_rate = self.cadence.render_rate(),
            subframes,
            "frame loop starting"
        );

        self.renderer.paint_field(&mut self.surface, self.engine.field());
        self.presenter.present(&mut self.surface)?;

        let mut summary = RunSummary {
            ticks: 0,
            frames: 0,
            drawn_frames: 0,
            score: self.engine.score(),
            lives: self.engine.lives_remaining(),
            outcome: Outcome::GameOver,
        };
        if self.engine.is_game_over() {
            return Ok(summary);
        }

        let mut pursuers: Vec<MovingEntity> = Vec::new();
        loop {
            let player = self.engine.player();
            pursuers.clear();
            pursuers.extend_from_slice(self.engine.pursuers());

            for s in 1..=subframes {
                tokio::time::sleep(interval).await;
                let report = self.renderer.render_entities(
                    &mut self.surface,
                    self.atlas.poll_ready(),
                    self.engine.field(),
                    &player,
                    &pursuers,
                    self.cadence.fraction(s),
                );
                self.presenter.present(&mut self.surface)?;
                summary.frames += 1;
                if report.drawn {
                    summary.drawn_frames += 1;
                }
            }

            if let Some(input) = &mut self.input {
                if input.quit_requested() {
                    info!(ticks = summary.ticks, "quit requested");
                    summary.outcome = Outcome::Quit;
                    break;
                }
                if let Some(code) = input.take_code() {
                    self.engine.set_heading(code);
                }
            }

            summary.ticks += 1;
            let over = self.engine.tick();
            debug!(
                tick = summary.ticks,
                score = self.engine.score(),
                lives = self.engine.lives_remaining(),
                "tick"
            );
            if over {
                summary.outcome = Outcome::GameOver;
                break;
            }
        }

        summary.score = self.engine.score();
        summary.lives = self.engine.lives_remaining();
        info!(?summary, "frame loop finished");
        Ok(summary)
    }
}
