use std::{io, time::Duration};

use crossterm::event::Event;
use ratatui::Frame;

use self::event_loop::{EventLoop, TuiEvent};

mod event_loop;

/// Trait for TUI applications executed by [`Runtime::run`].
pub trait App {
    /// Initializes the application. Use this to configure the tick rate.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Draws the screen (called on each render event).
    fn draw(&self, frame: &mut Frame);

    /// Advances application time by the measured elapsed duration.
    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration);
}

/// TUI application runtime.
///
/// Owns the event loop and executes applications that implement the
/// [`App`] trait.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    /// Creates a new runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate (Hz, ticks per second).
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.events
            .set_tick_interval(Duration::from_secs_f64(1.0 / rate));
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - tick: calls `app.update()` with the elapsed time
    ///    - render: calls `app.draw()`
    ///    - terminal event: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick(elapsed) => app.update(&mut self, elapsed),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }
}
