//! Random-policy selfplay runner.
//!
//! Plays complete games by repeatedly placing a randomly chosen unplaced
//! batch piece at a randomly chosen legal anchor. Useful for soaking the
//! dealer and watching score distributions across many episodes.
//!
//! Usage: `selfplay [games]` (default 10). Seed with `BREEZE_SEED`.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use block_breeze::core::{enumerate_placements, GameSession, RandomSource, SimpleRng};
use block_breeze::types::Placement;

fn seed_from_env() -> u32 {
    if let Ok(raw) = std::env::var("BREEZE_SEED") {
        if let Ok(seed) = raw.parse::<u32>() {
            return seed;
        }
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(0x5eed)
}

/// Pick a random (slot, anchor) among all unplaced pieces that fit.
fn pick_move(session: &GameSession, rng: &mut SimpleRng) -> Option<(usize, Placement)> {
    let batch = session.batch()?;

    let mut candidates: Vec<(usize, Placement)> = Vec::new();
    for (slot, piece) in batch.pieces().iter().enumerate() {
        if piece.placed {
            continue;
        }
        for spot in enumerate_placements(session.board(), piece.shape.shape()) {
            candidates.push((slot, spot));
        }
    }

    if candidates.is_empty() {
        return None;
    }
    let pick = rng.next_range(candidates.len() as u32) as usize;
    Some(candidates[pick])
}

fn main() -> Result<()> {
    let games: u32 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    let seed = seed_from_env();
    println!("[Selfplay] {} games, base seed {}", games, seed);

    let mut policy_rng = SimpleRng::new(seed ^ 0x9e3779b9);
    let mut best = 0u32;
    let mut total_score = 0u64;
    let mut total_placements = 0u64;

    for game in 0..games {
        let mut session = GameSession::new(seed.wrapping_add(game));
        session.set_best(best);
        session.start();

        while session.playable() {
            let Some((slot, spot)) = pick_move(&session, &mut policy_rng) else {
                break;
            };
            // Anchors come from the legality scan, so this cannot be rejected.
            if session.place(slot, spot.row, spot.col).is_err() {
                break;
            }
        }

        println!(
            "[Selfplay] game {}: score {}, placements {}, lines {}",
            game + 1,
            session.score(),
            session.placements(),
            session.lines()
        );

        best = best.max(session.best());
        total_score += u64::from(session.score());
        total_placements += u64::from(session.placements());
    }

    if games > 0 {
        println!(
            "[Selfplay] done: best {}, avg score {}, avg placements {}",
            best,
            total_score / u64::from(games),
            total_placements / u64::from(games)
        );
    }
    Ok(())
}
