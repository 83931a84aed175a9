//! Terminal Pac-Man runner (default binary).
//!
//! Plays the built-in demo level with a scripted engine. Rendering goes
//! through the sub-frame renderer into a pixel buffer that is flushed to the
//! terminal as half-block cells.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};

use tui_pacman::core::GameEngine;
use tui_pacman::input::{key_code, pending_input, should_quit, InputWriter};
use tui_pacman::term::{
    Atlas, AtlasHandle, AtlasLoader, EntityRenderer, FrameLoop, Layout, Outcome, PixelBuffer,
    RenderConfig, TerminalRenderer,
};
use tui_pacman::{demo, logging};

/// How long the input thread blocks before checking whether the game is gone.
const INPUT_POLL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let config = RenderConfig::from_env()?;
    let _log_guard = logging::init_logging(config.log_path.as_deref())?;
    info!(?config, "starting");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let engine = demo::engine(config.difficulty, config.tick_limit)?;
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    // Half blocks give two pixel rows per terminal row.
    let layout = Layout::new(engine.width(), engine.height(), cols as u32, rows as u32 * 2)?;
    let (w, h) = layout.surface_size();

    let atlas = match &config.atlas_path {
        Some(path) => {
            let _rt = runtime.enter();
            AtlasLoader::spawn(path.clone())
        }
        None => AtlasHandle::ready(Atlas::procedural()),
    };

    let (writer, reader) = pending_input();
    let input_thread = spawn_input_thread(writer)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let mut frame_loop = FrameLoop::new(
        engine,
        PixelBuffer::new(w, h),
        term,
        EntityRenderer::new(layout),
        atlas,
        config.cadence,
    )
    .with_input(reader);
    let result = runtime.block_on(frame_loop.run());

    // Always try to restore terminal state. Dropping the loop also closes
    // the input slot, which stops the input thread.
    let (_, _, mut term) = frame_loop.into_parts();
    let _ = term.exit();
    let _ = input_thread.join();

    let summary = result?;
    let outcome = match summary.outcome {
        Outcome::GameOver => "game over",
        Outcome::Quit => "quit",
    };
    println!(
        "{outcome}: score {}, lives {}, {} ticks",
        summary.score, summary.lives, summary.ticks
    );
    Ok(())
}

fn spawn_input_thread(writer: InputWriter) -> Result<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            while !writer.is_closed() {
                match event::poll(INPUT_POLL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        warn!(error = %e, "input poll failed");
                        writer.request_quit();
                        break;
                    }
                }
                match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if should_quit(key) {
                            writer.request_quit();
                            break;
                        }
                        if let Some(code) = key_code(key) {
                            writer.send_code(code);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "input read failed");
                        writer.request_quit();
                        break;
                    }
                }
            }
        })?;
    Ok(handle)
}
