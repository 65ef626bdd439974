use ratatui::{layout::Rect, style::Color, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, piece_display::*, session_display::*, stats_display::*,
};

mod board_display;
mod cell_display;
mod piece_display;
mod session_display;
mod stats_display;

mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

mod style {
    use ratatui::style::{Color, Style};

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
}

/// Resolves a `#rrggbb` color token from the shape catalog to a terminal
/// color.
fn token_color(token: &str) -> Color {
    fn channel(token: &str, at: usize) -> u8 {
        u8::from_str_radix(&token[at..at + 2], 16).unwrap_or(0)
    }

    if token.len() == 7 && token.starts_with('#') {
        Color::Rgb(channel(token, 1), channel(token, 3), channel(token, 5))
    } else {
        Color::White
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
