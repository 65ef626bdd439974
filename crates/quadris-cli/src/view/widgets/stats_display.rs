use quadris_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Text},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

/// Renders the score panel.
pub struct StatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        18 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap() + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    LabelValue(&'static str, &'static dyn Fn(&GameSession) -> String),
}

const ROWS: &[Row] = &[
    Row::LabelValue("SCORE:", &|session| session.stats().score().to_string()),
    Row::LabelValue("LEVEL:", &|session| session.stats().level().to_string()),
    Row::LabelValue("LINES:", &|session| {
        session.stats().total_cleared_lines().to_string()
    }),
    Row::LabelValue("PIECES:", &|session| {
        session.stats().completed_pieces().to_string()
    }),
    Row::LabelValue("SPEED:", &|session| {
        format!("{} ms", session.drop_interval().as_millis())
    }),
    Row::Empty,
    Row::LabelValue("SINGLES:", &|session| {
        session.stats().line_cleared_counter()[1].to_string()
    }),
    Row::LabelValue("DOUBLES:", &|session| {
        session.stats().line_cleared_counter()[2].to_string()
    }),
    Row::LabelValue("TRIPLES:", &|session| {
        session.stats().line_cleared_counter()[3].to_string()
    }),
    Row::LabelValue("QUADS:", &|session| {
        session.stats().line_cleared_counter()[4].to_string()
    }),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let lines: Vec<Line> = ROWS
            .iter()
            .map(|row| match row {
                Row::Empty => Line::default(),
                Row::LabelValue(label, value) => {
                    Line::from(format!("{label:<9}{:>9}", value(self.session)))
                }
            })
            .collect();
        Text::from(lines).render(area, buf);
    }
}
