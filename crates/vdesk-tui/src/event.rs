//! Terminal event handling.
//!
//! Captures keyboard and resize events from the terminal and turns quiet
//! periods into ticks, so the dashboard can refresh on a schedule.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};

/// Default interval between ticks, in milliseconds.
pub const TICK_RATE_MS: u64 = 250;

/// Terminal input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A key was pressed.
    Key(crossterm::event::KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// No input arrived within the tick interval.
    Tick,
}

/// Blocking source of [`TerminalEvent`]s backed by `crossterm`.
#[derive(Debug, Clone, Copy)]
pub struct EventSource {
    tick_rate: Duration,
}

impl EventSource {
    /// Creates a source that ticks every `tick_rate`.
    #[must_use]
    pub const fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Waits for the next event, or a tick if none arrives in time.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be polled or read.
    pub fn next(&self) -> io::Result<TerminalEvent> {
        if !event::poll(self.tick_rate)? {
            return Ok(TerminalEvent::Tick);
        }
        Ok(match event::read()? {
            Event::Key(key) => TerminalEvent::Key(key),
            Event::Resize(w, h) => TerminalEvent::Resize(w, h),
            _ => TerminalEvent::Tick,
        })
    }
}
