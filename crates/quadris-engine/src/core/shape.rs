use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Largest bounding box any shape matrix uses (the I piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Uniform selection among the 7 piece kinds.
///
/// Every kind is drawn independently with equal probability. There is no
/// bag system, so droughts and repeats are possible.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::T,
            3 => PieceKind::S,
            4 => PieceKind::Z,
            5 => PieceKind::J,
            _ => PieceKind::L,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds, in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the canonical shape matrix for this kind (spawn orientation).
    #[must_use]
    pub fn matrix(self) -> ShapeMatrix {
        ShapeMatrix::from_pattern(SHAPE_PATTERNS[self as usize])
    }

    /// Returns the color token associated with this kind.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            PieceKind::I => "#00f5ff",
            PieceKind::O => "#ffed00",
            PieceKind::T => "#a000f0",
            PieceKind::S => "#00f000",
            PieceKind::Z => "#f00000",
            PieceKind::J => "#0000f0",
            PieceKind::L => "#ff8000",
        }
    }
}

/// Rectangular grid of occupied cells in a piece's local frame.
///
/// Rows all have equal length. The matrix is rotated as data rather than
/// looked up from precomputed tables, so a rotated piece carries its own
/// orientation with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMatrix {
    rows: ArrayVec<ArrayVec<bool, MAX_SHAPE_SIZE>, MAX_SHAPE_SIZE>,
}

impl ShapeMatrix {
    fn from_pattern(pattern: &[&[u8]]) -> Self {
        let rows = pattern
            .iter()
            .map(|row| row.iter().map(|&cell| cell != 0).collect())
            .collect();
        Self { rows }
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, ArrayVec::len)
    }

    /// Whether the local cell at `(x, y)` is occupied.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.rows.get(y).is_some_and(|row| row.get(x) == Some(&true))
    }

    /// Iterates over the occupied local cells as `(x, y)` pairs.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, &cell)| cell.then_some((x, y)))
        })
    }

    /// Returns this matrix rotated 90° clockwise.
    ///
    /// An R×C input becomes a C×R output with
    /// `out[x][R - 1 - y] = in[y][x]`. Applying the rotation four times
    /// yields the original matrix.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let height = self.height();
        let width = self.width();
        let mut rows: ArrayVec<ArrayVec<bool, MAX_SHAPE_SIZE>, MAX_SHAPE_SIZE> = (0..width)
            .map(|_| (0..height).map(|_| false).collect())
            .collect();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                rows[x][height - 1 - y] = cell;
            }
        }
        Self { rows }
    }
}

const SHAPE_PATTERNS: [&[&[u8]]; PieceKind::LEN] = [
    // I-piece
    &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
    // O-piece
    &[&[1, 1], &[1, 1]],
    // T-piece
    &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
    // S-piece
    &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
    // Z-piece
    &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
    // J-piece
    &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
    // L-piece
    &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
];
