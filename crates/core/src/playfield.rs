//! Playfield module - the Tetris piece/board simulation
//!
//! Ties together the board, the active piece, the 7-bag queue and scoring.
//! Every operation is synchronous and deterministic for a given seed:
//!
//! - moves and rotations that do not fit are rejected and leave state untouched
//! - a downward step that does not fit locks the piece immediately
//! - locking merges, clears full rows, scores, levels up and spawns the next piece
//! - a blocked spawn ends the game; that is the only terminal state

use crate::board::Board;
use crate::pieces::{cells_at, get_shape, try_rotate, PieceShape, SPAWN_POSITION};
use crate::rng::PieceQueue;
use crate::scoring::{calculate_level, calculate_line_score, drop_interval_ms};
use crate::snapshot::{ActiveSnapshot, TetrisSnapshot};
use crate::types::{PieceKind, Rotation};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// A piece at the spawn position and rotation
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_POSITION.0,
            y: SPAWN_POSITION.1,
        }
    }

    /// Mino offsets for the current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board cells
    pub fn cells(&self) -> PieceShape {
        cells_at(self.kind, self.rotation, self.x, self.y)
    }

    pub fn is_valid(&self, board: &Board) -> bool {
        board.can_place(&self.cells())
    }

    fn offset(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// What happened when a piece locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    pub kind: PieceKind,
    pub lines_cleared: u8,
    pub points: u32,
    pub level_up: bool,
    pub game_over: bool,
}

/// Outcome of one downward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No active piece (not started or game over).
    Idle,
    Moved,
    Locked(LockReport),
}

/// Board, active piece and session counters.
#[derive(Debug, Clone)]
pub struct Playfield {
    board: Board,
    active: Option<Tetromino>,
    queue: PieceQueue,
    start_level: u32,
    score: u32,
    level: u32,
    lines: u32,
    pieces: u32,
    started: bool,
    game_over: bool,
}

impl Playfield {
    /// An empty, not yet started playfield.
    pub fn new(seed: u32) -> Self {
        Self {
            board: Board::new(),
            active: None,
            queue: PieceQueue::new(seed),
            start_level: 0,
            score: 0,
            level: 0,
            lines: 0,
            pieces: 0,
            started: false,
            game_over: false,
        }
    }

    /// Reset the session and spawn the first piece.
    ///
    /// The piece queue keeps running so consecutive games differ; construct a
    /// new playfield to replay a seed from the start.
    pub fn start_at_level(&mut self, level: u32) {
        self.board.clear();
        self.active = None;
        self.start_level = level;
        self.score = 0;
        self.level = level;
        self.lines = 0;
        self.pieces = 0;
        self.game_over = false;
        self.started = true;
        self.spawn_next();
    }

    /// Draw the next piece from the queue and place it at spawn.
    pub fn spawn_next(&mut self) -> bool {
        let kind = self.queue.draw();
        self.spawn(kind)
    }

    /// Place a specific piece at spawn, replacing any active piece.
    ///
    /// A blocked spawn ends the game and returns false.
    pub fn spawn(&mut self, kind: PieceKind) -> bool {
        let piece = Tetromino::new(kind);
        if !piece.is_valid(&self.board) {
            self.active = None;
            if !self.game_over {
                tracing::debug!(piece = kind.as_str(), score = self.score, "spawn blocked, game over");
            }
            self.game_over = true;
            return false;
        }
        self.started = true;
        self.active = Some(piece);
        self.pieces = self.pieces.wrapping_add(1);
        true
    }

    /// Shift the active piece sideways. Rejected moves return false.
    pub fn try_shift(&mut self, dx: i8) -> bool {
        self.try_move(dx, 0)
    }

    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let moved = active.offset(dx, dy);
        if !moved.is_valid(&self.board) {
            return false;
        }
        self.active = Some(moved);
        true
    }

    /// Rotate with wall kicks. On failure the piece is left exactly as it was.
    pub fn try_rotate(&mut self, clockwise: bool) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let board = &self.board;
        let Some((rotation, (dx, dy))) = try_rotate(
            active.kind,
            active.rotation,
            active.x,
            active.y,
            clockwise,
            |x, y| board.is_valid(x, y),
        ) else {
            return false;
        };
        self.active = Some(Tetromino {
            rotation,
            x: active.x + dx,
            y: active.y + dy,
            ..active
        });
        true
    }

    /// Move down one row, or lock if the row below is blocked.
    ///
    /// Gravity ticks and soft drops both go through here.
    pub fn soft_drop(&mut self) -> Step {
        if self.active.is_none() {
            return Step::Idle;
        }
        if self.try_move(0, 1) {
            return Step::Moved;
        }
        match self.lock() {
            Some(report) => Step::Locked(report),
            None => Step::Idle,
        }
    }

    /// Drop straight down and lock. Identical to soft-dropping until the piece locks.
    pub fn hard_drop(&mut self) -> Option<LockReport> {
        loop {
            match self.soft_drop() {
                Step::Moved => continue,
                Step::Locked(report) => return Some(report),
                Step::Idle => return None,
            }
        }
    }

    /// Merge the active piece, clear rows, score, and spawn the next piece.
    pub fn lock(&mut self) -> Option<LockReport> {
        let active = self.active.take()?;
        if !self.board.merge(&active.cells(), active.kind) {
            tracing::debug!(piece = active.kind.as_str(), score = self.score, "lock overlaps stack, game over");
            self.game_over = true;
            return Some(LockReport {
                kind: active.kind,
                lines_cleared: 0,
                points: 0,
                level_up: false,
                game_over: true,
            });
        }

        let lines_cleared = self.board.clear_full_rows().len();
        let points = calculate_line_score(lines_cleared, self.level);
        let previous_level = self.level;

        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(lines_cleared as u32);
        self.level = calculate_level(self.start_level, self.lines);

        let spawned = self.spawn_next();

        Some(LockReport {
            kind: active.kind,
            lines_cleared: lines_cleared as u8,
            points,
            level_up: self.level > previous_level,
            game_over: !spawned,
        })
    }

    /// Remove the bottom row and shift everything down. Awards nothing.
    ///
    /// An active piece that now overlaps the shifted stack moves to the
    /// nearest row where it fits, trying one row down first. If no row fits
    /// the game ends.
    pub fn clear_bottom_line(&mut self) {
        let bottom = self.board.height() as usize - 1;
        self.board.remove_row(bottom);
        let Some(active) = self.active else {
            return;
        };
        if active.is_valid(&self.board) {
            return;
        }
        let height = self.board.height() as i8;
        let refit = (1..=height).find_map(|d| {
            [d, -d]
                .into_iter()
                .map(|dy| active.offset(0, dy))
                .find(|p| p.is_valid(&self.board))
        });
        match refit {
            Some(piece) => self.active = Some(piece),
            None => {
                tracing::debug!(piece = active.kind.as_str(), "no room after bottom clear, game over");
                self.active = None;
                self.game_over = true;
            }
        }
    }

    /// Row the active piece would land on.
    pub fn ghost_y(&self) -> Option<i8> {
        let mut ghost = self.active?;
        while ghost.offset(0, 1).is_valid(&self.board) {
            ghost.y += 1;
        }
        Some(ghost.y)
    }

    /// Milliseconds between gravity steps at the current level.
    pub fn gravity_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for scripted setups. Keeping the active piece
    /// clear of written cells is the caller's job.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn next_kind(&self) -> PieceKind {
        self.queue.peek()
    }

    pub fn seed(&self) -> u32 {
        self.queue.seed()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn start_level(&self) -> u32 {
        self.start_level
    }

    /// Pieces spawned since the last start.
    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn snapshot_into(&self, out: &mut TetrisSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.board_hash = TetrisSnapshot::hash_board(&out.board);
        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = self.next_kind();
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> TetrisSnapshot {
        let mut s = TetrisSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
