//! Tetris board engine (workspace facade crate).
//!
//! The rules live in `tetris_board_core` and the shared vocabulary in `tetris_board_types`;
//! this package re-exports both as `tetris_board::{core, types}` and ships the headless
//! command runner binary.

pub use tetris_board_core as core;
pub use tetris_board_types as types;
