use std::ops::Range;

use quadris_engine::{Cell, PieceKind, ShapeMatrix};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::CellDisplay;

/// Renders a single piece kind, centered in a fixed 4×2 panel.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl Default for PieceDisplay<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(kind) = self.piece else {
            return;
        };
        let matrix = kind.matrix();
        let (cols, rows) = occupied_bounds(&matrix);
        let width = u16::try_from(cols.len()).unwrap();
        let height = u16::try_from(rows.len()).unwrap();

        let piece_area = area.centered(
            Constraint::Length(width * CellDisplay::width()),
            Constraint::Length(height * CellDisplay::height()),
        );

        let col_constraints = (0..width).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..height).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied_cell = CellDisplay::from_cell(Cell::Filled(kind), false);
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                if matrix.is_occupied(cols.start + x, rows.start + y) {
                    Widget::render(&occupied_cell, grid_cell, buf);
                }
            }
        }
    }
}

/// Bounding box of the occupied cells, as `(columns, rows)` ranges.
fn occupied_bounds(matrix: &ShapeMatrix) -> (Range<usize>, Range<usize>) {
    let mut cols = matrix.width()..0;
    let mut rows = matrix.height()..0;
    for (x, y) in matrix.occupied_cells() {
        cols.start = cols.start.min(x);
        cols.end = cols.end.max(x + 1);
        rows.start = rows.start.min(y);
        rows.end = rows.end.max(y + 1);
    }
    (cols, rows)
}
