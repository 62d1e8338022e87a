//! Pieces module - tetromino shape matrices, colors and the rotation transform
//!
//! Every shape is a square matrix (2x2 for O, 4x4 for I, 3x3 for the rest) stored as a
//! row-major bitmask inside a fixed 4x4 frame. Rotation turns the matrix 90° within its
//! own size, so four clockwise turns give back the original bits.

use arrayvec::ArrayVec;
use rand::Rng;

use crate::types::{Color, PieceKind, Rotation};

/// Side of the frame every shape fits in
pub const FRAME: usize = 4;

/// Offset of a filled cell from the piece anchor, as (col, row)
pub type CellOffset = (i8, i8);

/// Filled cells of a shape (a 4x4 frame holds at most 16)
pub type ShapeCells = ArrayVec<CellOffset, 16>;

/// Offsets tried, in order, when a rotation does not fit in place:
/// none, one left, one right, one up.
pub const ROTATION_KICKS: [(i8, i8); 4] = [(0, 0), (-1, 0), (1, 0), (0, -1)];

/// A square 0/1 shape matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    bits: u16,
}

const fn matrix<const N: usize>(rows: [[u8; N]; N]) -> Shape {
    let mut bits = 0u16;
    let mut row = 0;
    while row < N {
        let mut col = 0;
        while col < N {
            if rows[row][col] != 0 {
                bits |= 1 << (row * FRAME + col);
            }
            col += 1;
        }
        row += 1;
    }
    Shape {
        size: N as u8,
        bits,
    }
}

const I_SHAPE: Shape = matrix([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]);
const O_SHAPE: Shape = matrix([[1, 1], [1, 1]]);
const T_SHAPE: Shape = matrix([[0, 1, 0], [1, 1, 1], [0, 0, 0]]);
const S_SHAPE: Shape = matrix([[0, 1, 1], [1, 1, 0], [0, 0, 0]]);
const Z_SHAPE: Shape = matrix([[1, 1, 0], [0, 1, 1], [0, 0, 0]]);
const J_SHAPE: Shape = matrix([[1, 0, 0], [1, 1, 1], [0, 0, 0]]);
const L_SHAPE: Shape = matrix([[0, 0, 1], [1, 1, 1], [0, 0, 0]]);

impl Shape {
    /// Build a shape from 0/1 rows.
    ///
    /// Returns `None` unless the rows form a square of side 1 to 4.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Option<Self> {
        let size = rows.len();
        if size == 0 || size > FRAME {
            return None;
        }

        let mut bits = 0u16;
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return None;
            }
            for (col, &value) in values.iter().enumerate() {
                if value != 0 {
                    bits |= 1 << (row * FRAME + col);
                }
            }
        }

        Some(Self {
            size: size as u8,
            bits,
        })
    }

    /// Side length of the matrix
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Whether the cell at (row, col) is filled; false outside the matrix
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.size() && col < self.size() && self.bits & (1 << (row * FRAME + col)) != 0
    }

    /// Number of filled cells
    pub fn cell_count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Filled cells as (col, row) offsets, in row-major order
    pub fn cells(&self) -> ShapeCells {
        let mut cells = ShapeCells::new();
        for row in 0..self.size() {
            for col in 0..self.size() {
                if self.is_filled(row, col) {
                    cells.push((col as i8, row as i8));
                }
            }
        }
        cells
    }

    /// The matrix as 0/1 rows
    pub fn rows(&self) -> Vec<Vec<u8>> {
        (0..self.size())
            .map(|row| {
                (0..self.size())
                    .map(|col| u8::from(self.is_filled(row, col)))
                    .collect()
            })
            .collect()
    }
}

/// Base shape of a piece kind
pub fn shape_of(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::Z => Z_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
    }
}

/// Display color of a piece kind
pub fn color_of(kind: PieceKind) -> Color {
    kind.color()
}

/// Rotate a shape 90°.
///
/// Clockwise transposes and then reverses each row; counter-clockwise reverses each
/// row and then transposes.
pub fn rotate(shape: Shape, clockwise: bool) -> Shape {
    let n = shape.size();
    let mut bits = 0u16;
    for row in 0..n {
        for col in 0..n {
            let filled = if clockwise {
                shape.is_filled(n - 1 - col, row)
            } else {
                shape.is_filled(col, n - 1 - row)
            };
            if filled {
                bits |= 1 << (row * FRAME + col);
            }
        }
    }
    Shape {
        size: shape.size,
        bits,
    }
}

/// Pick one of the seven kinds uniformly
pub fn random_kind<R: Rng + ?Sized>(rng: &mut R) -> PieceKind {
    PieceKind::ALL[rng.gen_range(0..PieceKind::ALL.len())]
}

/// A piece instance: kind, current shape and board anchor (top-left of its matrix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a piece in its base orientation at (x, y)
    pub fn new(kind: PieceKind, x: i8, y: i8) -> Self {
        Self {
            kind,
            shape: shape_of(kind),
            rotation: Rotation::North,
            x,
            y,
        }
    }

    pub fn color(&self) -> Color {
        color_of(self.kind)
    }

    /// Board coordinates (x, y) of every filled cell
    pub fn blocks(&self) -> ShapeCells {
        self.shape
            .cells()
            .into_iter()
            .map(|(col, row)| (self.x + col, self.y + row))
            .collect()
    }

    /// Rotate in place. The O piece never turns and keeps rotation index 0.
    pub fn rotate(&mut self, clockwise: bool) {
        if self.kind == PieceKind::O {
            return;
        }
        self.shape = rotate(self.shape, clockwise);
        self.rotation = if clockwise {
            self.rotation.rotate_cw()
        } else {
            self.rotation.rotate_ccw()
        };
    }

    pub fn rotated(&self, clockwise: bool) -> Self {
        let mut piece = *self;
        piece.rotate(clockwise);
        piece
    }

    /// The same piece moved by (dx, dy); `None` if the anchor leaves the `i8` range
    pub fn shifted(&self, dx: i8, dy: i8) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            ..*self
        })
    }
}
