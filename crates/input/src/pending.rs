//! Last-write-wins input slot.
//!
//! Key presses arrive on their own thread at any time. Only the most recent
//! code matters at the next tick boundary, so there is no queue: a newer code
//! overwrites an unread older one.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Slot {
    code: Option<&'static str>,
    seq: u64,
    quit: bool,
}

/// Create a connected writer/reader pair.
pub fn pending_input() -> (InputWriter, PendingInput) {
    let (tx, rx) = watch::channel(Slot::default());
    (InputWriter { tx }, PendingInput { rx, seen: 0 })
}

/// Producer side, owned by the input thread.
#[derive(Debug, Clone)]
pub struct InputWriter {
    tx: watch::Sender<Slot>,
}

impl InputWriter {
    /// Replace the pending code.
    pub fn send_code(&self, code: &'static str) {
        self.tx.send_modify(|slot| {
            slot.code = Some(code);
            slot.seq += 1;
        });
    }

    /// Ask the frame loop to stop at the next tick boundary.
    pub fn request_quit(&self) {
        self.tx.send_modify(|slot| slot.quit = true);
    }

    /// Whether the frame loop has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side, owned by the frame loop.
#[derive(Debug)]
pub struct PendingInput {
    rx: watch::Receiver<Slot>,
    seen: u64,
}

impl PendingInput {
    /// Take the most recent code, if one arrived since the last call.
    pub fn take_code(&mut self) -> Option<&'static str> {
        if !self.rx.has_changed().unwrap_or(false) {
            return None;
        }
        let slot = *self.rx.borrow_and_update();
        // A quit request also marks the slot changed; only a new press counts.
        if slot.seq == self.seen {
            return None;
        }
        self.seen = slot.seq;
        slot.code
    }

    pub fn quit_requested(&self) -> bool {
        self.rx.borrow().quit
    }
}
