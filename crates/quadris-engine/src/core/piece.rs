use super::{
    board::BOARD_WIDTH,
    shape::{PieceKind, ShapeMatrix},
};

/// Movement command for the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// Grid delta `(dx, dy)` for one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// Grid offset of a piece matrix's top-left cell.
///
/// Coordinates are signed: empty matrix columns make small negative `x`
/// legal, and `y` below zero describes cells above the visible board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Horizontally centered spawn offset at the top edge.
    #[expect(clippy::cast_possible_truncation)]
    pub const SPAWN: Self = Self::new(BOARD_WIDTH as i32 / 2 - 1, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    const fn shifted(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The piece currently falling on the board.
///
/// Pieces are immutable. Movement and rotation return new instances; the
/// session commits a candidate only after the board validates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallingPiece {
    kind: PieceKind,
    matrix: ShapeMatrix,
    position: Position,
    rotation: u8,
}

impl FallingPiece {
    /// Creates a piece of the given kind at the spawn position.
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        Self::at(kind, Position::SPAWN)
    }

    /// Creates a piece of the given kind at an arbitrary position, in
    /// spawn orientation.
    #[must_use]
    pub fn at(kind: PieceKind, position: Position) -> Self {
        Self {
            kind,
            matrix: kind.matrix(),
            position,
            rotation: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> &'static str {
        self.kind.color()
    }

    #[must_use]
    pub fn matrix(&self) -> &ShapeMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Rotation index, 0 through 3.
    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Returns this piece moved one step in the given direction.
    #[must_use]
    pub fn shifted(&self, direction: Direction) -> Self {
        Self {
            kind: self.kind,
            matrix: self.matrix.clone(),
            position: self.position.shifted(direction),
            rotation: self.rotation,
        }
    }

    /// Returns this piece rotated 90° clockwise in place.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            kind: self.kind,
            matrix: self.matrix.rotated_clockwise(),
            position: self.position,
            rotation: (self.rotation + 1) % 4,
        }
    }

    /// Iterates over the piece's occupied cells in board coordinates.
    #[expect(clippy::cast_possible_truncation)]
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.matrix
            .occupied_cells()
            .map(move |(dx, dy)| (self.position.x + dx as i32, self.position.y + dy as i32))
    }
}
