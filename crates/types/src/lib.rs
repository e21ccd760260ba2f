//! Shared types and constants for the block puzzle engine
//!
//! Pure data structures with no external dependencies, usable in any context
//! (core logic, session hosts, the network adapter).
//!
//! # Board and deal dimensions
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BOARD_SIZE` | 8 | Edge length of the square board |
//! | `BOARD_CELLS` | 64 | Total cell count |
//! | `DEAL_SIZE` | 3 | Pieces per fair deal |
//! | `DEAL_ATTEMPTS` | 120 | Sampling bound of the fair-deal search |
//! | `MAX_SHAPE_DIM` | 4 | Upper bound on shape rows and columns |
//!
//! # Scoring
//!
//! A clearing placement scores `(cells * CELL_POINTS + (lines - 1) *
//! EXTRA_LINE_BONUS) * streak`, where the streak multiplier starts at 1.0 and
//! grows by 0.1 per consecutive clearing placement. The multiplier is carried
//! as integer tenths (`STREAK_BASE_TENTHS` = 10 means 1.0); the score base is
//! always a multiple of 10, so the tenths scaling divides out exactly.

/// Board edge length (the board is square)
pub const BOARD_SIZE: u8 = 8;

/// Total number of board cells
pub const BOARD_CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// Number of pieces in one dealt batch
pub const DEAL_SIZE: usize = 3;

/// Sampling bound of the fair-deal generator; exhausting it is the
/// authoritative game-over signal
pub const DEAL_ATTEMPTS: u32 = 120;

/// Maximum rows/columns of a catalog shape's bounding box
pub const MAX_SHAPE_DIM: u8 = 4;

/// Points per cleared cell
pub const CELL_POINTS: u32 = 10;

/// Bonus per line beyond the first in a single clearing placement
pub const EXTRA_LINE_BONUS: u32 = 50;

/// Streak multiplier start value, in tenths (10 == 1.0)
pub const STREAK_BASE_TENTHS: u32 = 10;

/// Streak multiplier increment per clearing placement, in tenths
pub const STREAK_STEP_TENTHS: u32 = 1;

/// Piece tint palette (opaque RGB); every dealt piece gets one at random
pub const PIECE_PALETTE: [u32; 7] = [
    0xf44336, 0xff9800, 0xfdd835, 0x4caf50, 0x00bcd4, 0x3f51b5, 0x9c27b0,
];

/// Fixed key under which the persisted best score is stored
pub const BEST_SCORE_KEY: &str = "blockbreeze_best";

/// Praise phrases by celebration tier (index 0 = 1 line, index 3 = 4+ lines)
pub const PRAISE_TIERS: [&[&str]; 4] = [
    &["Good", "Nice", "OK!", "Yes!", "Keep it up!"],
    &["Great", "Rippin' it!", "Cool", "YAY!"],
    &["WOW!", "UBAH!", "Awesome!", "Peak!", "Rocking it!", "WHOAH!"],
    &["Spectacular!", "Excellent!", "Perfect!", "Flawless!", "YO YO YO!", "WOOT!!1!"],
];

/// Opaque color token marking an occupied board cell.
///
/// Tokens are plain RGB values; the only structural requirement is that they
/// are non-zero, so 0 stays free to mean "empty" in flattened encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorToken(u32);

impl ColorToken {
    /// Wrap an RGB value. Zero is rejected because flattened board encodings
    /// reserve it for empty cells.
    pub const fn new(rgb: u32) -> Self {
        assert!(rgb != 0, "color token must be non-zero");
        ColorToken(rgb)
    }

    /// Palette entry by index (wraps around)
    pub const fn palette(index: usize) -> Self {
        ColorToken::new(PIECE_PALETTE[index % PIECE_PALETTE.len()])
    }

    /// The raw RGB value
    pub const fn rgb(self) -> u32 {
        self.0
    }
}

/// Cell on the board (None = empty, Some = occupied by the token's piece)
pub type Cell = Option<ColorToken>;

/// Anchor position of a shape's top-left bounding-box corner on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub row: u8,
    pub col: u8,
}

impl Placement {
    pub const fn new(row: u8, col: u8) -> Self {
        Placement { row, col }
    }
}

/// Outcome of one committed placement, as reported to hosts.
///
/// `cleared_cells`/`lines_cleared`/`score_delta` are zero for a non-clearing
/// placement. `batch_refreshed` is set when the placement completed the batch
/// and a fresh fair deal replaced it. `board_exhausted` is the game-over
/// signal: either the fresh deal failed, or no unplaced batch entry fits
/// anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementReport {
    pub cleared_cells: u32,
    pub lines_cleared: u32,
    pub score_delta: u32,
    pub new_score: u32,
    pub new_best: u32,
    pub praise: Option<&'static str>,
    pub batch_refreshed: bool,
    pub board_exhausted: bool,
}

impl PlacementReport {
    /// Whether this placement cleared at least one line
    pub fn cleared(&self) -> bool {
        self.lines_cleared > 0
    }
}
