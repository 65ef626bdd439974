use quadris_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, FallingPiece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::CellDisplay;

/// Renders a display board, with an optional drop-position preview
/// painted into its empty cells.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: Board,
    ghost: Option<FallingPiece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            ghost: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: FallingPiece) -> Self {
        Self {
            ghost: Some(piece),
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
        u16::try_from(BOARD_WIDTH).unwrap() * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(BOARD_HEIGHT).unwrap() * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let ghost_cells: Vec<(usize, usize)> = self.ghost.as_ref().map_or_else(Vec::new, |ghost| {
            ghost
                .occupied_cells()
                .filter_map(|(x, y)| Some((usize::try_from(x).ok()?, usize::try_from(y).ok()?)))
                .collect()
        });

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..BOARD_HEIGHT).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_rows = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                let cell = self.board.cell(x, y);
                let display = match &self.ghost {
                    Some(ghost) if cell.is_empty() && ghost_cells.contains(&(x, y)) => {
                        CellDisplay::ghost(ghost.color())
                    }
                    _ => CellDisplay::from_cell(cell, true),
                };
                Widget::render(&display, grid_cell, buf);
            }
        }
    }
}
