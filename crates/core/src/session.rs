//! Game session orchestration
//!
//! `GameSession` owns every piece of mutable game state: the board, the
//! current deal batch, score, best score, streak, and the RNG. It sequences
//! the full placement pipeline (validate, stamp, clear, rescore, re-deal or
//! terminate) and emits a `PlacementReport` for each committed placement so
//! hosts can render feedback without re-deriving it.

use crate::board::Board;
use crate::dealer::{deal_fair, DealBatch};
use crate::rng::SimpleRng;
use crate::scoring::{bump_streak, clear_score, praise_phrase, reset_streak, streak_multiplier};
use crate::snapshot::GameSnapshot;
use block_breeze_types::PlacementReport;

/// Why a placement intent was rejected.
///
/// Rejections are routine (remote hosts probe freely) and never mutate the
/// session; callers surface the message and carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    /// Session not started yet, or the game is over
    NotPlayable,
    /// Slot index outside the current batch
    SlotOutOfRange,
    /// The piece in that slot has already been placed
    AlreadyPlaced,
    /// The shape does not fit at the requested anchor
    DoesNotFit,
}

impl PlaceError {
    /// Stable machine-readable code for wire protocols
    pub fn code(&self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::SlotOutOfRange | PlaceError::AlreadyPlaced | PlaceError::DoesNotFit => {
                "invalid_place"
            }
        }
    }

    /// Human-readable reason
    pub fn message(&self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "session is not accepting placements",
            PlaceError::SlotOutOfRange => "slot index outside the current batch",
            PlaceError::AlreadyPlaced => "piece in that slot is already placed",
            PlaceError::DoesNotFit => "shape does not fit at that position",
        }
    }
}

/// A full single-player session: one board, one deal batch at a time.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    batch: Option<DealBatch>,
    rng: SimpleRng,
    score: u32,
    best: u32,
    streak_tenths: u32,
    placements: u32,
    lines: u32,
    episode_id: u32,
    last_event: Option<PlacementReport>,
    started: bool,
    game_over: bool,
}

impl GameSession {
    /// Create a fresh session. Nothing is dealt until `start` is called.
    pub fn new(seed: u32) -> Self {
        GameSession {
            board: Board::new(),
            batch: None,
            rng: SimpleRng::new(seed),
            score: 0,
            best: 0,
            streak_tenths: reset_streak(),
            placements: 0,
            lines: 0,
            episode_id: 0,
            last_event: None,
            started: false,
            game_over: false,
        }
    }

    /// Seed the best score from persisted state before play begins.
    /// Never lowers an already higher value.
    pub fn set_best(&mut self, best: u32) {
        self.best = self.best.max(best);
    }

    /// Start the session and deal the first batch. Idempotent: calling
    /// `start` on a running session does nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.refresh_batch();
    }

    /// Deal a fresh batch, flipping to game over when the dealer cannot
    /// find three jointly placeable shapes.
    fn refresh_batch(&mut self) -> bool {
        match deal_fair(&self.board, &mut self.rng) {
            Some(batch) => {
                self.batch = Some(batch);
                true
            }
            None => {
                self.batch = None;
                self.game_over = true;
                false
            }
        }
    }

    /// Validate and commit a placement intent.
    ///
    /// On success the board is stamped, full rows and columns are cleared,
    /// score and streak are updated, and either a fresh batch is dealt
    /// (when this placement completed the batch) or the remaining pieces
    /// are checked for a stuck position. On rejection the session is left
    /// exactly as it was.
    pub fn place(&mut self, slot: usize, row: u8, col: u8) -> Result<PlacementReport, PlaceError> {
        if !self.started || self.game_over {
            return Err(PlaceError::NotPlayable);
        }
        let piece = {
            let batch = match self.batch.as_ref() {
                Some(batch) => batch,
                None => return Err(PlaceError::NotPlayable),
            };
            match batch.piece(slot) {
                Some(piece) => *piece,
                None => return Err(PlaceError::SlotOutOfRange),
            }
        };
        if piece.placed {
            return Err(PlaceError::AlreadyPlaced);
        }
        if !self.board.fits(piece.shape.shape(), row, col) {
            return Err(PlaceError::DoesNotFit);
        }

        // Commit: stamp the shape, then resolve clears and scoring
        self.board = self.board.place(piece.shape.shape(), row, col, piece.token);
        if let Some(batch) = self.batch.as_mut() {
            batch.mark_placed(slot);
        }
        self.placements = self.placements.saturating_add(1);

        let full_rows = self.board.full_rows();
        let full_cols = self.board.full_cols();
        let lines_cleared = (full_rows.len() + full_cols.len()) as u32;

        let mut cleared_cells = 0;
        let mut score_delta = 0;
        let mut praise = None;
        if lines_cleared > 0 {
            let (cleared_board, count) = self.board.clear_cells(&full_rows, &full_cols);
            self.board = cleared_board;
            cleared_cells = count;
            score_delta = clear_score(cleared_cells, lines_cleared, self.streak_tenths);
            self.score = self.score.saturating_add(score_delta);
            self.streak_tenths = bump_streak(self.streak_tenths);
            self.lines = self.lines.saturating_add(lines_cleared);
            if self.score > self.best {
                self.best = self.score;
            }
            praise = Some(praise_phrase(lines_cleared, &mut self.rng));
        } else {
            self.streak_tenths = reset_streak();
        }

        // Batch complete: deal again. Otherwise check whether any of the
        // remaining pieces still fits somewhere.
        let mut batch_refreshed = false;
        let all_placed = self.batch.as_ref().map_or(false, DealBatch::all_placed);
        if all_placed {
            batch_refreshed = self.refresh_batch();
        } else if let Some(batch) = self.batch.as_ref() {
            if !batch.any_unplaced_fits(&self.board) {
                self.game_over = true;
            }
        }

        let report = PlacementReport {
            cleared_cells,
            lines_cleared,
            score_delta,
            new_score: self.score,
            new_best: self.best,
            praise,
            batch_refreshed,
            board_exhausted: self.game_over,
        };
        self.last_event = Some(report);
        Ok(report)
    }

    /// Reset for a new game. The best score survives, the episode counter
    /// advances, and the RNG keeps rolling so replays stay fresh.
    pub fn restart(&mut self) {
        self.board.clear();
        self.batch = None;
        self.score = 0;
        self.streak_tenths = reset_streak();
        self.placements = 0;
        self.lines = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.last_event = None;
        self.game_over = false;
        self.started = true;
        self.refresh_batch();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn batch(&self) -> Option<&DealBatch> {
        self.batch.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn streak_tenths(&self) -> u32 {
        self.streak_tenths
    }

    /// Current streak multiplier for display purposes
    pub fn multiplier(&self) -> f32 {
        streak_multiplier(self.streak_tenths)
    }

    pub fn placements(&self) -> u32 {
        self.placements
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn playable(&self) -> bool {
        self.started && !self.game_over
    }

    /// Take the most recent placement report, clearing it.
    /// Hosts poll this to drive one-shot feedback like praise lines.
    pub fn take_last_event(&mut self) -> Option<PlacementReport> {
        self.last_event.take()
    }

    /// Fill a reusable snapshot with the current state
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_token_grid(&mut out.board);
        out.set_batch(self.batch.as_ref());
        out.score = self.score;
        out.best = self.best;
        out.streak_tenths = self.streak_tenths;
        out.placements = self.placements;
        out.lines = self.lines;
        out.episode_id = self.episode_id;
        out.seed = self.rng.state();
        out.started = self.started;
        out.game_over = self.game_over;
    }

    /// Convenience wrapper around `snapshot_into`
    pub fn snapshot(&self) -> GameSnapshot {
        let mut out = GameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub fn force_batch(&mut self, batch: DealBatch) {
        self.batch = Some(batch);
    }
}

impl Default for GameSession {
    fn default() -> Self {
        GameSession::new(1)
    }
}
