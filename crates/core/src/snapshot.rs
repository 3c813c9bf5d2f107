use crate::playfield::Tetromino;
use crate::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

/// Board cell codes, row-major; 0 is empty, otherwise [`PieceKind::code`].
pub type BoardGrid = [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

/// Read-only view of a Tetris session for renderers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TetrisSnapshot {
    pub board: BoardGrid,
    pub board_hash: u64,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub paused: bool,
    pub game_over: bool,
    pub score: u32,
    pub best_score: u32,
    pub level: u32,
    pub lines: u32,
}

impl TetrisSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// FNV-1a over the grid; equal boards always hash equal.
    pub fn hash_board(board: &BoardGrid) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in board.iter().flatten() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash
    }

    /// Occupied cells in one row.
    pub fn row_fill(&self, y: usize) -> usize {
        self.board
            .get(y)
            .map(|row| row.iter().filter(|&&c| c != 0).count())
            .unwrap_or(0)
    }
}

impl Default for TetrisSnapshot {
    fn default() -> Self {
        let board = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        Self {
            board,
            board_hash: Self::hash_board(&board),
            active: None,
            ghost_y: None,
            next: PieceKind::I,
            paused: false,
            game_over: false,
            score: 0,
            best_score: 0,
            level: 0,
            lines: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_changes_with_a_single_cell() {
        let mut a = TetrisSnapshot::default();
        let empty = a.board_hash;
        a.board[19][0] = PieceKind::T.code();
        assert_ne!(TetrisSnapshot::hash_board(&a.board), empty);
        a.board[19][0] = 0;
        assert_eq!(TetrisSnapshot::hash_board(&a.board), empty);
    }

    #[test]
    fn clear_restores_default() {
        let mut s = TetrisSnapshot {
            score: 100,
            paused: true,
            ..TetrisSnapshot::default()
        };
        assert!(!s.playable());
        s.clear();
        assert_eq!(s, TetrisSnapshot::default());
    }
}
