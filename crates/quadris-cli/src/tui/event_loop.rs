use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event as CrosstermEvent};

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Game logic update timing; carries the time since the previous tick.
    Tick(Duration),
    /// Screen render timing.
    Render,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(CrosstermEvent),
}

/// Event loop state management.
///
/// Multiplexes tick deadlines and terminal input with poll timeouts, and
/// renders whenever a prior event dirtied the screen. Ticks report the
/// measured time since the previous tick rather than a nominal interval,
/// so time-based game logic stays accurate under load.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Duration,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub(super) fn new() -> Self {
        Self {
            tick_interval: Duration::from_millis(16),
            last_tick: Instant::now(),
            dirty: true, // Initial render is required on startup
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Duration) {
        self.tick_interval = interval;
    }

    /// Returns the next event.
    ///
    /// Blocks until the next tick is due or a crossterm event occurs.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            let since_tick = now.duration_since(self.last_tick);
            if since_tick >= self.tick_interval {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick(since_tick));
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if !event::poll(self.tick_interval - since_tick)? {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }
}
