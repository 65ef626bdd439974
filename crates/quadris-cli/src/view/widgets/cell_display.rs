use quadris_engine::{Cell, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::{color, style, token_color};

/// Paints one board cell as a two-column block.
#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: Cell, show_dots: bool) -> Self {
        match cell {
            Cell::Empty if show_dots => Self::new(style::EMPTY_DOT, "."),
            Cell::Empty => Self::new(style::DEFAULT, ""),
            Cell::Filled(kind) => Self::new(kind_style(kind), ""),
        }
    }

    /// Outline used for the drop-position preview.
    pub fn ghost(color_token: &str) -> Self {
        Self::new(
            Style::new().fg(token_color(color_token)).bg(color::BLACK),
            "[]",
        )
    }
}

/// Solid style in the kind's catalog color.
fn kind_style(kind: PieceKind) -> Style {
    let color = token_color(kind.color());
    Style::new().fg(color).bg(color)
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the symbol cells
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
