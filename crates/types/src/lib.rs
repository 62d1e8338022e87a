//! Core types module - shared data structures and constants
//!
//! This crate defines the plain data types shared by the engine and its callers.
//! Everything here is a value type with no behavior beyond parsing and formatting,
//! so a rendering or transport layer can depend on it without pulling in the engine.
//!
//! # Board Dimensions
//!
//! The default playfield is 10 columns by 20 rows. Other sizes are allowed as long as
//! both dimensions stay within [`MIN_BOARD_DIMENSION`]..=[`MAX_BOARD_DIMENSION`].
//!
//! - **Width**: columns indexed 0..width, left to right
//! - **Height**: rows indexed 0..height, top to bottom
//! - **Spawn anchor**: (width / 2 - 1, 0), pulled left when the piece's matrix would
//!   not fit inside the right wall
//!
//! # Scoring
//!
//! | Lines | Base points |
//! |-------|-------------|
//! | 1 | 40 |
//! | 2 | 100 |
//! | 3 | 300 |
//! | 4 | 1200 |
//!
//! Base points are multiplied by the level in effect before the clear. The level
//! starts at 1 and rises by one every [`LINES_PER_LEVEL`] cleared lines.
//!
//! # Examples
//!
//! ```
//! use tetris_board_types::{Command, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.color().to_string(), "#A000F0");
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

/// Default board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Default board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Smallest allowed board dimension (the I piece's 4x4 frame must fit)
pub const MIN_BOARD_DIMENSION: u8 = 4;

/// Largest allowed board dimension
pub const MAX_BOARD_DIMENSION: u8 = 64;

/// Base points for clearing 1, 2, 3 and 4 lines at once.
///
/// Clears of more than four rows use the last entry.
pub const LINE_SCORES: [u32; 4] = [40, 100, 300, 1200];

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Level of a fresh session
pub const STARTING_LEVEL: u32 = 1;

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_board_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to uppercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    /// Display color of this kind
    pub fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::rgb(0x00, 0xF0, 0xF0),
            PieceKind::O => Color::rgb(0xF0, 0xF0, 0x00),
            PieceKind::T => Color::rgb(0xA0, 0x00, 0xF0),
            PieceKind::S => Color::rgb(0x00, 0xF0, 0x00),
            PieceKind::Z => Color::rgb(0xF0, 0x00, 0x00),
            PieceKind::J => Color::rgb(0x00, 0x00, 0xF0),
            PieceKind::L => Color::rgb(0xF0, 0xA0, 0x00),
        }
    }
}

/// An RGB display color.
///
/// Formats and serializes as a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Rotation states of a piece
///
/// - **North**: Spawn orientation (0° rotation)
/// - **East**: Rotated 90° clockwise
/// - **South**: Rotated 180°
/// - **West**: Rotated 90° counter-clockwise (270° clockwise)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_board_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation index, 0 (North) through 3 (West)
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Discrete commands a caller can issue to a session
///
/// These cover every mutating operation of the engine, so a transport layer can
/// forward text commands without knowing the engine API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Promote the next piece to the board
    Spawn,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down
    SoftDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Move piece down until it rests, without locking
    HardDrop,
    /// Settle the piece into the grid
    Lock,
    /// One gravity step: move down, or lock and spawn when resting
    Tick,
    /// Start over on an empty board (allowed after game over)
    Restart,
}

impl Command {
    /// Parse a command from string (case-insensitive)
    ///
    /// Accepts the camelCase names returned by [`Command::as_str`] and short aliases.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_board_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("left"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("rotate"), Some(Command::RotateCw));
    /// assert_eq!(Command::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spawn" => Some(Command::Spawn),
            "moveleft" | "left" => Some(Command::MoveLeft),
            "moveright" | "right" => Some(Command::MoveRight),
            "softdrop" | "down" => Some(Command::SoftDrop),
            "rotatecw" | "rotate" => Some(Command::RotateCw),
            "rotateccw" => Some(Command::RotateCcw),
            "harddrop" | "drop" => Some(Command::HardDrop),
            "lock" => Some(Command::Lock),
            "tick" => Some(Command::Tick),
            "restart" => Some(Command::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Spawn => "spawn",
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::RotateCw => "rotateCw",
            Command::RotateCcw => "rotateCcw",
            Command::HardDrop => "hardDrop",
            Command::Lock => "lock",
            Command::Tick => "tick",
            Command::Restart => "restart",
        }
    }
}

/// Why a command was rejected.
///
/// A rejected command leaves the session unchanged, except `SpawnBlocked`, which ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandError {
    /// The command needs an active piece and there is none
    NoActivePiece,
    /// The move or rotation would leave the board or overlap settled cells
    Blocked,
    /// The session has ended
    GameOver,
    /// The spawn position collided; the session is now over
    SpawnBlocked,
    /// A spawn was requested while a piece is still active
    PieceActive,
}

impl CommandError {
    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandError::NoActivePiece => "no_active_piece",
            CommandError::Blocked => "blocked",
            CommandError::GameOver => "game_over",
            CommandError::SpawnBlocked => "spawn_blocked",
            CommandError::PieceActive => "piece_active",
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CommandError::NoActivePiece => "no active piece",
            CommandError::Blocked => "position is blocked",
            CommandError::GameOver => "game is over",
            CommandError::SpawnBlocked => "spawn position is blocked",
            CommandError::PieceActive => "a piece is already active",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for CommandError {}

/// Result of locking a piece into the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LockOutcome {
    /// Cells written into the grid
    pub cells_written: u32,
    /// Cells above the visible board that were discarded
    pub cells_dropped: u32,
    /// Rows cleared by this lock
    pub lines_cleared: u32,
    /// Points awarded for those rows
    pub score_awarded: u32,
}

/// Result of one gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityOutcome {
    /// The piece fell one row
    Moved,
    /// The piece was resting; it locked and the next piece spawned
    Locked(LockOutcome),
    /// The piece locked but the next spawn collided; the session is over
    ToppedOut(LockOutcome),
}

/// Result of a successfully applied [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Spawn, move or rotation took effect
    Applied,
    /// Hard drop moved the piece down this many rows
    Dropped(u32),
    /// The piece was locked
    Locked(LockOutcome),
    /// A gravity step ran
    Gravity(GravityOutcome),
    /// The session was reset
    Restarted,
}

/// Where a session is in its lifecycle
///
/// `AwaitingSpawn → Active → (AwaitingSpawn | GameOver)`; `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingSpawn,
    Active,
    GameOver,
}

/// Final totals of a finished session, ready to hand to score persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a piece of that kind (and its color)
pub type Cell = Option<PieceKind>;
