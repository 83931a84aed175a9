//! Integration tests for the frame loop driving the demo level headlessly.
//!
//! Time is paused, so the render cadence is checked against tokio's virtual
//! clock rather than wall time.

use std::time::Duration;

use anyhow::Result;
use tui_pacman::core::GameEngine;
use tui_pacman::demo;
use tui_pacman::input::pending_input;
use tui_pacman::term::{
    Atlas, AtlasHandle, ConfigError, EntityRenderer, FrameCadence, FrameLoop, Layout, Outcome,
    PixelBuffer, Rect,
};
use tui_pacman::types::{Difficulty, Heading};

fn headless(
    limit: u64,
    cadence: FrameCadence,
) -> FrameLoop<impl GameEngine, PixelBuffer, impl FnMut(&mut PixelBuffer) -> Result<()>> {
    let engine = demo::engine(Difficulty::Normal, Some(limit)).unwrap();
    let layout = Layout::with_block_size(engine.width(), engine.height(), 6).unwrap();
    let (w, h) = layout.surface_size();
    let mut presented = 0u64;
    FrameLoop::new(
        engine,
        PixelBuffer::new(w, h),
        move |px: &mut PixelBuffer| -> Result<()> {
            presented += 1;
            // Every presented frame after the first only touched part of the screen.
            if let Some(damage) = px.take_damage() {
                if presented > 1 {
                    anyhow::ensure!(damage != Rect::new(0, 0, px.width(), px.height()));
                }
            }
            Ok(())
        },
        EntityRenderer::new(layout),
        AtlasHandle::ready(Atlas::procedural()),
        cadence,
    )
}

#[test]
fn cadence_must_divide_evenly() {
    assert_eq!(FrameCadence::new(5, 20).unwrap().subframes(), 4);
    assert_eq!(
        FrameCadence::new(5, 22).unwrap_err(),
        ConfigError::UnevenCadence {
            tick_rate: 5,
            render_rate: 22
        }
    );
}

#[tokio::test(start_paused = true)]
async fn demo_runs_to_tick_limit() {
    let mut lp = headless(10, FrameCadence::new(5, 20).unwrap());
    let start = tokio::time::Instant::now();
    let summary = lp.run().await.unwrap();

    assert_eq!(summary.outcome, Outcome::GameOver);
    assert_eq!(summary.ticks, 10);
    assert_eq!(summary.frames, 40);
    assert_eq!(summary.drawn_frames, 40);
    // Ten ticks at five per second.
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert!(start.elapsed() < Duration::from_millis(2100));
}

#[tokio::test(start_paused = true)]
async fn subframe_count_follows_cadence() {
    let mut lp = headless(4, FrameCadence::new(10, 30).unwrap());
    let summary = lp.run().await.unwrap();
    assert_eq!(summary.frames, 12);
    assert_eq!(lp.renderer().render_tick(), 12);
}

#[tokio::test(start_paused = true)]
async fn input_reaches_engine_at_tick_boundary() {
    let (writer, reader) = pending_input();
    writer.send_code("KeyA");
    let mut lp = headless(1, FrameCadence::default()).with_input(reader);
    let summary = lp.run().await.unwrap();

    assert_eq!(summary.ticks, 1);
    let player = lp.engine().player();
    assert_eq!(player.heading, Heading::Left);
    assert_eq!(player.cell, demo::PLAYER_START.step(Heading::Left).unwrap());
}

#[tokio::test(start_paused = true)]
async fn quit_stops_before_the_next_tick() {
    let (writer, reader) = pending_input();
    let mut lp = headless(1_000, FrameCadence::default()).with_input(reader);

    writer.send_code("ArrowRight");
    writer.request_quit();
    let summary = lp.run().await.unwrap();

    assert_eq!(summary.outcome, Outcome::Quit);
    assert_eq!(summary.ticks, 0);
    assert_eq!(summary.frames, 4);
    // The pending heading was never applied.
    assert_eq!(lp.engine().player().heading, Heading::None);
}
