//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the board and piece rules of a falling-block game. It has no timers,
//! no rendering and no I/O: callers send discrete commands and read back an immutable
//! [`GameSnapshot`] to draw.
//!
//! - **Deterministic**: a seeded [`RandomSource`] or a fixed [`PieceSequence`] reproduces a game
//! - **Testable**: all randomness enters through the [`PieceSource`] trait
//! - **Portable**: a renderer, a network server or a bot can drive the same session
//!
//! # Module Structure
//!
//! - [`board`]: fixed-size grid with collision checks and line clearing
//! - [`pieces`]: the seven tetromino matrices, their colors and the rotation transform
//! - [`session`]: one game's active piece, next piece, score, lines, level and lifecycle
//! - [`scoring`]: classic line-clear points and level progression
//! - [`snapshot`]: serializable, read-only view of a session
//! - [`source`]: where piece kinds come from
//! - [`config`]: board size and seed, with environment overrides
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: each of the seven kinds is equally likely on every draw
//! - **Simple kicks**: a rotation that does not fit is retried one column left, one
//!   column right, then one row up
//! - **Explicit locking**: hard drop only moves the piece; locking is its own command
//! - **Scoring**: 40 / 100 / 300 / 1200 times the level, a level every ten lines
//!
//! # Example
//!
//! ```
//! use tetris_board_core::{GameSession, PieceSequence};
//! use tetris_board_core::types::PieceKind;
//!
//! let mut game = GameSession::new(PieceSequence::repeat(PieceKind::O));
//! game.spawn().unwrap();
//!
//! game.move_right().unwrap();
//! game.rotate().unwrap();
//! assert_eq!(game.hard_drop(), Ok(18));
//!
//! let outcome = game.lock().unwrap();
//! assert_eq!(outcome.cells_written, 4);
//! assert_eq!(game.snapshot().grid[19][5], Some(PieceKind::O.color()));
//! ```

pub mod board;
pub mod config;
pub mod pieces;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod source;

pub use tetris_board_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{ConfigError, EngineConfig};
pub use pieces::{color_of, random_kind, rotate, shape_of, Piece, Shape, ROTATION_KICKS};
pub use scoring::{calculate_level, calculate_line_score};
pub use session::GameSession;
pub use snapshot::{ActiveSnapshot, GameSnapshot, NextSnapshot};
pub use source::{PieceSequence, PieceSource, RandomSource};
