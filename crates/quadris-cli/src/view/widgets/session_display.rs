use quadris_engine::{GameSession, SessionPhase};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block as BlockWidget, Clear, Padding, Widget},
};

use super::{BoardDisplay, PieceDisplay, StatsDisplay, color, style};

/// Composes the whole game screen: HOLD and STATS on the left, the board
/// in the center, NEXT on the right, plus a phase popup over the board.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    show_ghost: bool,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession, show_ghost: bool) -> Self {
        Self {
            session,
            show_ghost,
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block_padding = Padding::symmetric(1, 0);
        let border_color = match self.session.phase() {
            SessionPhase::Idle => color::CYAN,
            SessionPhase::Running => color::WHITE,
            SessionPhase::Paused => color::YELLOW,
            SessionPhase::GameOver => color::RED,
        };

        let game_board = {
            let widget = BoardDisplay::new(self.session.render_board()).block(
                BlockWidget::bordered()
                    .border_style(border_color)
                    .style(style::DEFAULT),
            );
            match self.session.drop_position() {
                Some(ghost) if self.show_ghost => widget.ghost(ghost),
                _ => widget,
            }
        };
        let hold_panel = {
            let panel = PieceDisplay::new().block(
                BlockWidget::bordered()
                    .title(Line::from("HOLD").centered())
                    .padding(block_padding)
                    .border_style(border_color)
                    .style(style::DEFAULT),
            );
            match self.session.held_piece() {
                Some(kind) => panel.piece(kind),
                None => panel,
            }
        };
        let next_panel = {
            let panel = PieceDisplay::new().block(
                BlockWidget::bordered()
                    .title(Line::from("NEXT").centered())
                    .padding(block_padding)
                    .border_style(border_color)
                    .style(style::DEFAULT),
            );
            match self.session.next_piece() {
                Some(kind) => panel.piece(kind),
                None => panel,
            }
        };
        let stats_panel = StatsDisplay::new(self.session).block(
            BlockWidget::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_color)
                .style(style::DEFAULT),
        );

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), stats_panel.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(stats_panel.height()),
        ])
        .spacing(1)
        .areas(left_column);

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        stats_panel.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        let popup = match self.session.phase() {
            SessionPhase::Idle => Some((
                "PRESS ENTER",
                Style::new().fg(color::BLACK).bg(color::CYAN),
            )),
            SessionPhase::Running => None,
            SessionPhase::Paused => Some((
                "PAUSED",
                Style::new().fg(color::BLACK).bg(color::YELLOW),
            )),
            SessionPhase::GameOver => Some((
                "GAME OVER!!",
                Style::new().fg(color::WHITE).bg(color::RED),
            )),
        };

        if let Some((text, style)) = popup {
            let block = BlockWidget::new().style(style);
            let text = Text::styled(text, style).centered();
            let area = board_area.centered(
                Constraint::Length(game_board_width),
                Constraint::Length(3),
            );
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
