use serde::Serialize;

use crate::pieces::{shape_of, Piece};
use crate::types::{Color, PieceKind, Phase, Rotation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub color: Color,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Board coordinates (x, y) of the piece's cells
    pub blocks: Vec<(i8, i8)>,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            color: value.color(),
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            blocks: value.blocks().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextSnapshot {
    pub kind: PieceKind,
    pub color: Color,
    pub shape: Vec<Vec<u8>>,
}

impl From<PieceKind> for NextSnapshot {
    fn from(kind: PieceKind) -> Self {
        Self {
            kind,
            color: kind.color(),
            shape: shape_of(kind).rows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Rows top to bottom; `None` is an empty cell
    pub grid: Vec<Vec<Option<Color>>>,
    pub current: Option<ActiveSnapshot>,
    pub next: NextSnapshot,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub game_over: bool,
    pub phase: Phase,
}

impl GameSnapshot {
    /// Color at (x, y) including the active piece, as a renderer would draw it
    pub fn color_at(&self, x: i8, y: i8) -> Option<Color> {
        if let Some(active) = &self.current {
            if active.blocks.contains(&(x, y)) {
                return Some(active.color);
            }
        }
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        self.grid.get(y)?.get(x).copied().flatten()
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }
}
