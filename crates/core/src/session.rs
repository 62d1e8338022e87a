//! Game session module - one game's grid, pieces, counters and lifecycle
//!
//! The session applies discrete commands synchronously. It has no timers: callers decide
//! when gravity runs ([`GameSession::gravity_step`]) and read [`GameSession::snapshot`]
//! after each command. Every mutating call returns a `Result`; an `Err` leaves the
//! session untouched, except [`CommandError::SpawnBlocked`], which ends the game.

use tracing::{debug, info, warn};

use crate::board::Board;
use crate::config::{ConfigError, EngineConfig};
use crate::pieces::{shape_of, Piece, ROTATION_KICKS};
use crate::scoring::{calculate_level, calculate_line_score};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, NextSnapshot};
use crate::source::{PieceSource, RandomSource};
use crate::types::*;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameSession<S = RandomSource> {
    board: Board,
    current: Option<Piece>,
    next: PieceKind,
    source: S,
    score: u32,
    lines: u32,
    level: u32,
    game_over: bool,
}

impl GameSession<RandomSource> {
    /// Create a 10x20 game with a seeded random piece sequence
    pub fn seeded(seed: u64) -> Self {
        Self::new(RandomSource::seeded(seed))
    }

    /// Create a game from configuration; without a seed the pieces come from OS entropy
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        let source = match config.seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        };
        Self::with_config(config, source)
    }
}

impl<S: PieceSource> GameSession<S> {
    /// Create a 10x20 game drawing pieces from `source`
    pub fn new(source: S) -> Self {
        Self::from_board(Board::new(), source)
    }

    pub fn with_config(config: &EngineConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::with_size(config.width, config.height)?;
        Ok(Self::from_board(board, source))
    }

    /// Start a game over an existing grid
    pub fn from_board(board: Board, mut source: S) -> Self {
        let next = source.next_kind();
        Self {
            board,
            current: None,
            next,
            source,
            score: 0,
            lines: 0,
            level: STARTING_LEVEL,
            game_over: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if self.current.is_some() {
            Phase::Active
        } else {
            Phase::AwaitingSpawn
        }
    }

    /// Anchor a new piece of `kind` appears at: centered column, top row.
    ///
    /// On narrow boards the anchor moves left so the piece's matrix stays inside the
    /// right wall.
    pub fn spawn_anchor(&self, kind: PieceKind) -> (i8, i8) {
        let width = self.board.width() as usize;
        let centered = width / 2 - 1;
        let fits = width.saturating_sub(shape_of(kind).size());
        (centered.min(fits) as i8, 0)
    }

    fn ensure_running(&self) -> Result<(), CommandError> {
        if self.game_over {
            return Err(CommandError::GameOver);
        }
        Ok(())
    }

    /// Promote the next piece to the board and draw a new next piece.
    ///
    /// A collision at the spawn anchor ends the game.
    pub fn spawn(&mut self) -> Result<(), CommandError> {
        self.ensure_running()?;
        if self.current.is_some() {
            return Err(CommandError::PieceActive);
        }

        let (x, y) = self.spawn_anchor(self.next);
        let piece = Piece::new(self.next, x, y);
        self.next = self.source.next_kind();

        if !self.is_valid_position(&piece, 0, 0) {
            self.game_over = true;
            info!(
                kind = piece.kind.as_str(),
                score = self.score,
                lines = self.lines,
                level = self.level,
                "spawn blocked, game over"
            );
            return Err(CommandError::SpawnBlocked);
        }

        debug!(kind = piece.kind.as_str(), x, y, next = self.next.as_str(), "spawned piece");
        self.current = Some(piece);
        Ok(())
    }

    /// Whether `piece` moved by (dx, dy) fits on the board
    pub fn is_valid_position(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        self.board.can_place(
            &piece.shape,
            i16::from(piece.x) + i16::from(dx),
            i16::from(piece.y) + i16::from(dy),
        )
    }

    /// Try to move the current piece
    pub fn move_piece(&mut self, dx: i8, dy: i8) -> Result<(), CommandError> {
        self.ensure_running()?;
        let piece = self.current.ok_or(CommandError::NoActivePiece)?;

        let moved = piece.shifted(dx, dy).ok_or(CommandError::Blocked)?;
        if !self.is_valid_position(&moved, 0, 0) {
            return Err(CommandError::Blocked);
        }

        self.current = Some(moved);
        Ok(())
    }

    pub fn move_left(&mut self) -> Result<(), CommandError> {
        self.move_piece(-1, 0)
    }

    pub fn move_right(&mut self) -> Result<(), CommandError> {
        self.move_piece(1, 0)
    }

    pub fn soft_drop(&mut self) -> Result<(), CommandError> {
        self.move_piece(0, 1)
    }

    /// Rotate the current piece clockwise, kicking if needed
    pub fn rotate(&mut self) -> Result<(), CommandError> {
        self.rotate_with(true)
    }

    /// Rotate the current piece counter-clockwise, kicking if needed
    pub fn rotate_ccw(&mut self) -> Result<(), CommandError> {
        self.rotate_with(false)
    }

    fn rotate_with(&mut self, clockwise: bool) -> Result<(), CommandError> {
        self.ensure_running()?;
        let piece = self.current.ok_or(CommandError::NoActivePiece)?;
        let rotated = piece.rotated(clockwise);

        for &(dx, dy) in ROTATION_KICKS.iter() {
            let Some(candidate) = rotated.shifted(dx, dy) else {
                continue;
            };
            if self.is_valid_position(&candidate, 0, 0) {
                self.current = Some(candidate);
                return Ok(());
            }
        }

        Err(CommandError::Blocked)
    }

    /// Move the current piece down until it rests. Returns the rows moved; does not lock.
    pub fn hard_drop(&mut self) -> Result<u32, CommandError> {
        self.ensure_running()?;
        if self.current.is_none() {
            return Err(CommandError::NoActivePiece);
        }

        let mut rows = 0;
        while self.move_piece(0, 1).is_ok() {
            rows += 1;
        }
        Ok(rows)
    }

    /// Lock the current piece onto the board and handle line clears
    pub fn lock(&mut self) -> Result<LockOutcome, CommandError> {
        self.ensure_running()?;
        let piece = self.current.take().ok_or(CommandError::NoActivePiece)?;

        let (cells_written, cells_dropped) = self.board.write_piece(&piece);
        if cells_dropped > 0 {
            warn!(
                kind = piece.kind.as_str(),
                x = piece.x,
                y = piece.y,
                cells_dropped,
                "locked piece above the board, cells discarded"
            );
        }

        let (lines_cleared, score_awarded) = self.clear_scored_lines();
        debug!(
            kind = piece.kind.as_str(),
            x = piece.x,
            y = piece.y,
            lines_cleared,
            "locked piece"
        );

        Ok(LockOutcome {
            cells_written,
            cells_dropped,
            lines_cleared,
            score_awarded,
        })
    }

    /// Remove every full row, award points and update the level. Returns the rows cleared.
    pub fn clear_lines(&mut self) -> u32 {
        if self.game_over {
            return 0;
        }
        self.clear_scored_lines().0
    }

    fn clear_scored_lines(&mut self) -> (u32, u32) {
        let cleared = self.board.clear_full_rows();
        if cleared.is_empty() {
            return (0, 0);
        }

        let count = cleared.len() as u32;
        let points = calculate_line_score(cleared.len(), self.level);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(count);
        self.level = calculate_level(self.lines);

        debug!(
            rows = ?cleared,
            points,
            total_lines = self.lines,
            level = self.level,
            "cleared lines"
        );
        (count, points)
    }

    /// One gravity step: fall a row, or lock and spawn the next piece when resting
    pub fn gravity_step(&mut self) -> Result<GravityOutcome, CommandError> {
        match self.move_piece(0, 1) {
            Ok(()) => return Ok(GravityOutcome::Moved),
            Err(CommandError::Blocked) => {}
            Err(err) => return Err(err),
        }

        let locked = self.lock()?;
        match self.spawn() {
            Ok(()) => Ok(GravityOutcome::Locked(locked)),
            Err(CommandError::SpawnBlocked) => Ok(GravityOutcome::ToppedOut(locked)),
            Err(err) => Err(err),
        }
    }

    /// Apply a command
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome, CommandError> {
        match command {
            Command::Spawn => self.spawn().map(|()| CommandOutcome::Applied),
            Command::MoveLeft => self.move_left().map(|()| CommandOutcome::Applied),
            Command::MoveRight => self.move_right().map(|()| CommandOutcome::Applied),
            Command::SoftDrop => self.soft_drop().map(|()| CommandOutcome::Applied),
            Command::RotateCw => self.rotate().map(|()| CommandOutcome::Applied),
            Command::RotateCcw => self.rotate_ccw().map(|()| CommandOutcome::Applied),
            Command::HardDrop => self.hard_drop().map(CommandOutcome::Dropped),
            Command::Lock => self.lock().map(CommandOutcome::Locked),
            Command::Tick => self.gravity_step().map(CommandOutcome::Gravity),
            Command::Restart => {
                self.reset();
                Ok(CommandOutcome::Restarted)
            }
        }
    }

    /// Start a new game on the same board size and piece source.
    ///
    /// The grid is emptied and the counters return to their starting values. The next
    /// piece already drawn is kept.
    pub fn reset(&mut self) {
        self.board.clear();
        self.current = None;
        self.score = 0;
        self.lines = 0;
        self.level = STARTING_LEVEL;
        self.game_over = false;
        info!(next = self.next.as_str(), "session reset");
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            width: self.board.width(),
            height: self.board.height(),
            grid: self
                .board
                .rows()
                .map(|row| row.iter().map(|cell| cell.map(|kind| kind.color())).collect())
                .collect(),
            current: self.current.map(ActiveSnapshot::from),
            next: NextSnapshot::from(self.next),
            score: self.score,
            lines: self.lines,
            level: self.level,
            game_over: self.game_over,
            phase: self.phase(),
        }
    }

    /// Final totals once the game is over
    pub fn final_report(&self) -> Option<ScoreReport> {
        self.game_over.then_some(ScoreReport {
            score: self.score,
            lines: self.lines,
            level: self.level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PieceSequence;

    fn session_of(kind: PieceKind) -> GameSession<PieceSequence> {
        GameSession::new(PieceSequence::repeat(kind))
    }

    fn fill_row_except(session: &mut GameSession<PieceSequence>, y: i8, gaps: &[i8]) {
        for x in 0..session.board.width() as i8 {
            if !gaps.contains(&x) {
                session.board.set(x, y, Some(PieceKind::Z));
            }
        }
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::seeded(12345);

        assert!(!session.game_over());
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.lines(), 0);
        assert!(session.current().is_none());
        assert_eq!(session.phase(), Phase::AwaitingSpawn);
        assert_eq!(session.board().occupied_count(), 0);
    }

    #[test]
    fn test_seeded_sessions_match() {
        let mut a = GameSession::seeded(7);
        let mut b = GameSession::seeded(7);
        for _ in 0..20 {
            assert_eq!(a.next_kind(), b.next_kind());
            a.spawn().unwrap();
            b.spawn().unwrap();
            a.current = None;
            b.current = None;
        }
    }

    #[test]
    fn test_spawn_promotes_next() {
        let mut session = GameSession::new(
            PieceSequence::new([PieceKind::T, PieceKind::L, PieceKind::S]).unwrap(),
        );
        assert_eq!(session.next_kind(), PieceKind::T);

        session.spawn().unwrap();
        let piece = session.current().unwrap();
        assert_eq!(piece.kind, PieceKind::T);
        assert_eq!((piece.x, piece.y), (4, 0));
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(session.next_kind(), PieceKind::L);
        assert_eq!(session.phase(), Phase::Active);
    }

    #[test]
    fn test_spawn_anchor_follows_width() {
        let config = EngineConfig {
            width: 6,
            height: 8,
            seed: None,
        };
        let session = GameSession::with_config(&config, PieceSequence::repeat(PieceKind::O)).unwrap();
        for kind in PieceKind::ALL {
            assert_eq!(session.spawn_anchor(kind), (2, 0), "{:?}", kind);
        }
    }

    #[test]
    fn test_spawn_anchor_keeps_i_inside_narrow_board() {
        let config = EngineConfig {
            width: MIN_BOARD_DIMENSION,
            height: 8,
            seed: None,
        };
        let session = GameSession::with_config(&config, PieceSequence::repeat(PieceKind::I)).unwrap();
        assert_eq!(session.spawn_anchor(PieceKind::I), (0, 0));
        assert_eq!(session.spawn_anchor(PieceKind::T), (1, 0));
        assert_eq!(session.spawn_anchor(PieceKind::O), (1, 0));
    }

    #[test]
    fn test_every_kind_spawns_on_smallest_board() {
        for kind in PieceKind::ALL {
            let board = Board::with_size(MIN_BOARD_DIMENSION, MIN_BOARD_DIMENSION).unwrap();
            let mut session = GameSession::from_board(board, PieceSequence::repeat(kind));

            assert_eq!(session.spawn(), Ok(()), "{:?}", kind);
            assert!(!session.game_over());
            let piece = session.current().unwrap();
            assert!(
                piece.blocks().iter().all(|&(x, _)| (0..MIN_BOARD_DIMENSION as i8).contains(&x)),
                "{:?}",
                kind
            );
        }
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut session = session_of(PieceKind::T);
        session.score = 300;
        session.lines = 12;
        session.level = 2;
        session.board.set(5, 0, Some(PieceKind::I));
        assert_eq!(session.spawn(), Err(CommandError::SpawnBlocked));

        assert_eq!(session.apply(Command::Restart), Ok(CommandOutcome::Restarted));
        assert!(!session.game_over());
        assert_eq!(session.phase(), Phase::AwaitingSpawn);
        assert_eq!((session.score(), session.lines(), session.level()), (0, 0, 1));
        assert_eq!(session.board().occupied_count(), 0);
        assert!(session.final_report().is_none());
        assert!(session.spawn().is_ok());
    }

    #[test]
    fn test_spawn_while_active_is_rejected() {
        let mut session = session_of(PieceKind::T);
        session.spawn().unwrap();
        let before = session.current();
        assert_eq!(session.spawn(), Err(CommandError::PieceActive));
        assert_eq!(session.current(), before);
    }

    #[test]
    fn test_move_without_piece() {
        let mut session = session_of(PieceKind::T);
        assert_eq!(session.move_left(), Err(CommandError::NoActivePiece));
        assert_eq!(session.rotate(), Err(CommandError::NoActivePiece));
        assert_eq!(session.hard_drop(), Err(CommandError::NoActivePiece));
        assert_eq!(session.lock(), Err(CommandError::NoActivePiece));
        assert_eq!(session.gravity_step(), Err(CommandError::NoActivePiece));
    }

    #[test]
    fn test_try_move() {
        let mut session = session_of(PieceKind::T);
        session.spawn().unwrap();
        let initial_x = session.current().unwrap().x;

        assert!(session.move_right().is_ok());
        assert_eq!(session.current().unwrap().x, initial_x + 1);

        assert!(session.move_left().is_ok());
        assert_eq!(session.current().unwrap().x, initial_x);

        // The T's top cell is already on row 0, so moving up leaves the board top;
        // that is allowed because rows above the board are open.
        assert!(session.move_piece(0, -1).is_ok());
    }

    #[test]
    fn test_move_stops_at_walls() {
        let mut session = session_of(PieceKind::T);
        session.spawn().unwrap();

        let mut moved = 0;
        while session.move_left().is_ok() {
            moved += 1;
        }
        // Spawn at x=4, T occupies columns 0..3 of its matrix
        assert_eq!(moved, 4);
        assert_eq!(session.current().unwrap().x, 0);

        let mut moved = 0;
        while session.move_right().is_ok() {
            moved += 1;
        }
        assert_eq!(moved, 7);
        assert_eq!(session.current().unwrap().x, 7);
    }

    #[test]
    fn test_blocked_move_leaves_state() {
        let mut session = session_of(PieceKind::O);
        session.spawn().unwrap();
        session.board.set(6, 0, Some(PieceKind::I));
        let before = session.current();
        // O sits in columns 4-5; column 6 is taken
        assert_eq!(session.move_right(), Err(CommandError::Blocked));
        assert_eq!(session.current(), before);
    }

    #[test]
    fn test_rotate_in_open_space() {
        let mut session = session_of(PieceKind::T);
        session.spawn().unwrap();
        session.soft_drop().unwrap();

        assert!(session.rotate().is_ok());
        let piece = session.current().unwrap();
        assert_eq!(piece.rotation, Rotation::East);
        assert_eq!((piece.x, piece.y), (4, 1));

        assert!(session.rotate_ccw().is_ok());
        let piece = session.current().unwrap();
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(piece.shape, shape_of(PieceKind::T));
    }

    #[test]
    fn test_rotate_o_is_noop_success() {
        let mut session = session_of(PieceKind::O);
        session.spawn().unwrap();
        let before = session.current();
        assert!(session.rotate().is_ok());
        assert_eq!(session.current(), before);
    }

    #[test]
    fn test_rotate_kicks_off_left_wall() {
        let mut session = session_of(PieceKind::T);
        session.spawn().unwrap();
        session.soft_drop().unwrap();
        session.rotate().unwrap(); // East: cells in matrix columns 1 and 2
        while session.move_left().is_ok() {}
        assert_eq!(session.current().unwrap().x, -1);

        // South needs matrix column 0, which is off the board at x=-1
        session.rotate().unwrap();
        let piece = session.current().unwrap();
        assert_eq!(piece.rotation, Rotation::South);
        assert_eq!((piece.x, piece.y), (0, 1));
    }

    #[test]
    fn test_rotate_kicks_up_from_floor() {
        let mut session = session_of(PieceKind::I);
        session.spawn().unwrap();
        session.hard_drop().unwrap();
        // Horizontal I rests on the floor with its matrix anchored at y=18
        assert_eq!(session.current().unwrap().y, 18);

        // Vertical I would reach row 21; even the upward kick still hits the floor
        assert_eq!(session.rotate(), Err(CommandError::Blocked));
        let piece = session.current().unwrap();
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(piece.shape, shape_of(PieceKind::I));
        assert_eq!(piece.y, 18);
    }

    #[test]
    fn test_rotate_uses_upward_kick() {
        let mut session = session_of(PieceKind::T);
        session.spawn().unwrap();
        session.hard_drop().unwrap();
        // North T resting on the floor: anchor y=18, bottom matrix row (y=20) empty
        assert_eq!(session.current().unwrap().y, 18);

        // East needs row 20 in place and after the sideways kicks
        session.rotate().unwrap();
        let piece = session.current().unwrap();
        assert_eq!(piece.rotation, Rotation::East);
        assert_eq!((piece.x, piece.y), (4, 17));
    }

    #[test]
    fn test_hard_drop_does_not_lock() {
        let mut session = session_of(PieceKind::O);
        session.spawn().unwrap();

        let rows = session.hard_drop().unwrap();
        assert_eq!(rows, 18);
        assert!(session.current().is_some());
        assert_eq!(session.board().occupied_count(), 0);

        assert_eq!(session.hard_drop(), Ok(0));
    }

    #[test]
    fn test_lock_writes_cells() {
        let mut session = session_of(PieceKind::O);
        session.spawn().unwrap();
        session.hard_drop().unwrap();

        let outcome = session.lock().unwrap();
        assert_eq!(outcome.cells_written, 4);
        assert_eq!(outcome.cells_dropped, 0);
        assert_eq!(outcome.lines_cleared, 0);
        assert!(session.current().is_none());
        assert_eq!(session.phase(), Phase::AwaitingSpawn);
        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(session.board().get(x, y), Some(Some(PieceKind::O)));
        }
    }

    #[test]
    fn test_lock_drops_cells_above_board() {
        let mut session = session_of(PieceKind::I);
        session.spawn().unwrap();
        session.rotate().unwrap();
        // Vertical I at anchor y=0 covers rows 0..4; lift it two rows
        session.move_piece(0, -1).unwrap();
        session.move_piece(0, -1).unwrap();

        let outcome = session.lock().unwrap();
        assert_eq!(outcome.cells_written, 2);
        assert_eq!(outcome.cells_dropped, 2);
        assert_eq!(session.board().occupied_count(), 2);
    }

    #[test]
    fn test_lock_clears_line_and_scores() {
        let mut session = session_of(PieceKind::I);
        fill_row_except(&mut session, 19, &[3, 4, 5, 6]);
        session.spawn().unwrap();
        session.move_left().unwrap();
        session.hard_drop().unwrap();

        let outcome = session.lock().unwrap();
        assert_eq!(outcome.lines_cleared, 1);
        assert_eq!(outcome.score_awarded, 40);
        assert_eq!(session.score(), 40);
        assert_eq!(session.lines(), 1);
        assert_eq!(session.board().occupied_count(), 0);
    }

    #[test]
    fn test_clear_lines_uses_level_before_clear() {
        let mut session = session_of(PieceKind::T);
        session.lines = 9;
        session.level = 1;
        fill_row_except(&mut session, 19, &[]);
        fill_row_except(&mut session, 18, &[]);

        assert_eq!(session.clear_lines(), 2);
        assert_eq!(session.score(), 100);
        assert_eq!(session.lines(), 11);
        assert_eq!(session.level(), 2);
    }

    #[test]
    fn test_spawn_blocked_ends_game() {
        let mut session = session_of(PieceKind::T);
        session.board.set(5, 0, Some(PieceKind::I));

        assert_eq!(session.spawn(), Err(CommandError::SpawnBlocked));
        assert!(session.game_over());
        assert!(session.current().is_none());
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.spawn(), Err(CommandError::GameOver));
        assert_eq!(session.clear_lines(), 0);
    }

    #[test]
    fn test_gravity_step_moves_then_locks() {
        let mut session = GameSession::new(
            PieceSequence::new([PieceKind::O, PieceKind::T]).unwrap(),
        );
        session.spawn().unwrap();

        for _ in 0..18 {
            assert_eq!(session.gravity_step(), Ok(GravityOutcome::Moved));
        }
        match session.gravity_step() {
            Ok(GravityOutcome::Locked(outcome)) => assert_eq!(outcome.cells_written, 4),
            other => panic!("expected lock, got {:?}", other),
        }
        assert_eq!(session.current().unwrap().kind, PieceKind::T);
    }

    #[test]
    fn test_gravity_step_tops_out() {
        let mut session = session_of(PieceKind::O);
        // Column stack right under the spawn rows
        for y in 2..20 {
            session.board.set(4, y, Some(PieceKind::J));
        }
        session.spawn().unwrap();

        match session.gravity_step() {
            Ok(GravityOutcome::ToppedOut(outcome)) => assert_eq!(outcome.cells_written, 4),
            other => panic!("expected top out, got {:?}", other),
        }
        assert!(session.game_over());
        assert_eq!(session.final_report().unwrap().score, 0);
    }

    #[test]
    fn test_apply_dispatch() {
        let mut session = session_of(PieceKind::O);
        assert_eq!(session.apply(Command::Spawn), Ok(CommandOutcome::Applied));
        assert_eq!(session.apply(Command::MoveRight), Ok(CommandOutcome::Applied));
        assert_eq!(session.apply(Command::HardDrop), Ok(CommandOutcome::Dropped(18)));
        assert!(matches!(
            session.apply(Command::Lock),
            Ok(CommandOutcome::Locked(LockOutcome { cells_written: 4, .. }))
        ));
        assert_eq!(session.apply(Command::Lock), Err(CommandError::NoActivePiece));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = GameSession::new(
            PieceSequence::new([PieceKind::S, PieceKind::J]).unwrap(),
        );
        session.board.set(0, 19, Some(PieceKind::L));
        session.spawn().unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.width, 10);
        assert_eq!(snap.grid.len(), 20);
        assert_eq!(snap.grid[19][0], Some(PieceKind::L.color()));
        let current = snap.current.as_ref().unwrap();
        assert_eq!(current.kind, PieceKind::S);
        assert_eq!(current.blocks, vec![(5, 0), (6, 0), (4, 1), (5, 1)]);
        assert_eq!(snap.next.kind, PieceKind::J);
        assert_eq!(snap.next.shape, shape_of(PieceKind::J).rows());
        assert_eq!(snap.color_at(5, 0), Some(PieceKind::S.color()));
        assert_eq!(snap.color_at(0, 19), Some(PieceKind::L.color()));
        assert_eq!(snap.color_at(-1, 0), None);
        assert_eq!(snap.phase, Phase::Active);
        assert!(snap.playable());

        // Reading twice gives the same projection
        assert_eq!(session.snapshot(), snap);
    }

    #[test]
    fn test_final_report_only_after_game_over() {
        let mut session = session_of(PieceKind::T);
        assert!(session.final_report().is_none());
        session.score = 340;
        session.lines = 4;
        session.board.set(5, 0, Some(PieceKind::I));
        assert_eq!(session.spawn(), Err(CommandError::SpawnBlocked));
        assert_eq!(
            session.final_report(),
            Some(ScoreReport {
                score: 340,
                lines: 4,
                level: 1
            })
        );
    }
}
