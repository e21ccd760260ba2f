//! Scoring module - line-clear points and the streak multiplier
//!
//! A clearing placement scores `(cleared_cells * 10 + (lines - 1) * 50) *
//! multiplier`, rounded. The multiplier starts at 1.0, grows by 0.1 per
//! consecutive clearing placement and resets on a placement that clears
//! nothing.
//!
//! The multiplier is carried as integer tenths (10 == 1.0). The score base
//! is always a multiple of 10 (cells contribute tens, the line bonus
//! fifties), so `base * tenths / 10` divides exactly and reproduces the
//! float-and-round model with no float at all.

use crate::rng::RandomSource;
use block_breeze_types::{
    CELL_POINTS, EXTRA_LINE_BONUS, PRAISE_TIERS, STREAK_BASE_TENTHS, STREAK_STEP_TENTHS,
};

/// Points for a clearing placement.
/// `lines_cleared` of 0 scores nothing regardless of the other inputs.
pub fn clear_score(cleared_cells: u32, lines_cleared: u32, streak_tenths: u32) -> u32 {
    if lines_cleared == 0 {
        return 0;
    }
    let base = cleared_cells
        .saturating_mul(CELL_POINTS)
        .saturating_add((lines_cleared - 1).saturating_mul(EXTRA_LINE_BONUS));
    base.saturating_mul(streak_tenths) / 10
}

/// Streak value after a clearing placement
pub fn bump_streak(streak_tenths: u32) -> u32 {
    streak_tenths.saturating_add(STREAK_STEP_TENTHS)
}

/// Streak value after a placement that cleared nothing
pub fn reset_streak() -> u32 {
    STREAK_BASE_TENTHS
}

/// The multiplier as the float hosts display (tenths / 10)
pub fn streak_multiplier(streak_tenths: u32) -> f32 {
    streak_tenths as f32 / 10.0
}

/// Celebration tier for a clearing placement, bucketed to 1..=4
pub fn celebration_tier(lines_cleared: u32) -> u32 {
    lines_cleared.clamp(1, 4)
}

/// Praise phrase for a clearing placement, drawn from its tier's table
pub fn praise_phrase(lines_cleared: u32, rng: &mut impl RandomSource) -> &'static str {
    let table = PRAISE_TIERS[(celebration_tier(lines_cleared) - 1) as usize];
    table[rng.next_range(table.len() as u32) as usize]
}
