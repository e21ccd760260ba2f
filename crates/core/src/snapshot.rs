use crate::dealer::{DealBatch, DealPiece};
use block_breeze_types::{BOARD_CELLS, DEAL_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    /// Catalog index of the shape
    pub shape: u8,
    /// RGB tint token
    pub token: u32,
    pub placed: bool,
}

impl From<&DealPiece> for PieceSnapshot {
    fn from(piece: &DealPiece) -> Self {
        Self {
            shape: piece.shape.index() as u8,
            token: piece.token.rgb(),
            placed: piece.placed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Flat row-major board, 0 = empty, otherwise the occupying RGB token
    pub board: [u32; BOARD_CELLS],
    pub batch: [Option<PieceSnapshot>; DEAL_SIZE],
    pub score: u32,
    pub best: u32,
    pub streak_tenths: u32,
    pub placements: u32,
    pub lines: u32,
    pub episode_id: u32,
    pub seed: u32,
    pub started: bool,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [0u32; BOARD_CELLS];
        self.batch = [None; DEAL_SIZE];
        self.score = 0;
        self.best = 0;
        self.streak_tenths = 0;
        self.placements = 0;
        self.lines = 0;
        self.episode_id = 0;
        self.seed = 0;
        self.started = false;
        self.game_over = false;
    }

    pub fn playable(&self) -> bool {
        self.started && !self.game_over
    }

    pub(crate) fn set_batch(&mut self, batch: Option<&DealBatch>) {
        self.batch = [None; DEAL_SIZE];
        if let Some(batch) = batch {
            for (slot, piece) in batch.pieces().iter().enumerate() {
                self.batch[slot] = Some(PieceSnapshot::from(piece));
            }
        }
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [0u32; BOARD_CELLS],
            batch: [None; DEAL_SIZE],
            score: 0,
            best: 0,
            streak_tenths: 0,
            placements: 0,
            lines: 0,
            episode_id: 0,
            seed: 0,
            started: false,
            game_over: false,
        };
        s.clear();
        s
    }
}
