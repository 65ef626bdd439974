use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use quadris_engine::{Direction, GameEvent, GameSession, PieceSeed, SessionPhase};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    tui::{App, Runtime},
    view::widgets::SessionDisplay,
};

const TICK_RATE: f64 = 60.0;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence (32 hex characters); random when omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Hide the drop-position preview
    #[clap(long, default_value_t = false)]
    no_ghost: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let mut app = PlayApp::new(arg);
    Runtime::new().run(&mut app)?;
    Ok(())
}

#[derive(Debug)]
struct PlayApp {
    session: GameSession,
    show_ghost: bool,
    status: String,
    is_exiting: bool,
}

impl PlayApp {
    fn new(arg: &PlayArg) -> Self {
        let session = match arg.seed {
            Some(seed) => GameSession::with_seed(seed),
            None => GameSession::new(),
        };
        let status = format!("Seed {}", session.seed());
        Self {
            session,
            show_ghost: !arg.no_ghost,
            status,
            is_exiting: false,
        }
    }

    fn drain_events(&mut self) {
        for event in self.session.take_events() {
            self.status = match event {
                GameEvent::LinesCleared { lines: 1, points } => {
                    format!("1 line cleared, +{points}")
                }
                GameEvent::LinesCleared { lines, points } => {
                    format!("{lines} lines cleared, +{points}")
                }
                GameEvent::GameOver { score } => format!("Game over, final score {score}"),
            };
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(TICK_RATE);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        let phase = self.session.phase();
        let is_running = phase.is_running();

        if let Some(key) = event.as_key_event() {
            match key.code {
                KeyCode::Left if is_running => _ = self.session.move_piece(Direction::Left),
                KeyCode::Right if is_running => _ = self.session.move_piece(Direction::Right),
                KeyCode::Down if is_running => _ = self.session.move_piece(Direction::Down),
                KeyCode::Up if is_running => self.session.rotate(),
                KeyCode::Char(' ') if is_running => self.session.hard_drop(),
                KeyCode::Char('c') if is_running => _ = self.session.hold(),
                KeyCode::Char('p') if is_running || phase.is_paused() => {
                    self.session.toggle_pause();
                }
                KeyCode::Enter if phase.is_idle() => self.session.start(),
                KeyCode::Char('r') if !phase.is_idle() => self.session.restart(),
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            }
        }
        self.drain_events();
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session, self.show_ghost);
        let help_text = match self.session.phase() {
            SessionPhase::Idle => "Controls: Enter (Start) | Q (Quit)",
            SessionPhase::Running => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | Space (Hard Drop) | C (Hold) | P (Pause) | R (Restart) | Q (Quit)"
            }
            SessionPhase::Paused => "Controls: P (Resume) | R (Restart) | Q (Quit)",
            SessionPhase::GameOver => "Controls: R (Restart) | Q (Quit)",
        };
        let status_text = Text::from(self.status.as_str()).centered();
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(22),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(status_text, status_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        self.session.tick(elapsed);
        self.drain_events();
    }
}
