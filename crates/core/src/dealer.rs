//! Fair-deal generator - sampling plus joint-feasibility backtracking
//!
//! A deal is fair when its three shapes can all be placed on the current
//! board in *some* order, each placement's footprint constraining the next.
//! The generator samples trios uniformly from the catalog (bounded at
//! [`DEAL_ATTEMPTS`]), rejects samples whose shapes do not even fit
//! individually, then runs an exact backtracking search per trio. Running
//! out of attempts is the board-exhaustion signal that ends the game; it is
//! an expected terminal state, not an error.
//!
//! The search recurses over (remaining shapes, board snapshot), always
//! expanding the shape with the fewest legal placements first. Boards are
//! `Copy`, so every branch probes its own snapshot and there is no rollback.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::placement::{enumerate_placements, fits_anywhere};
use crate::rng::RandomSource;
use crate::shapes::{random_shape, ShapeId};
use block_breeze_types::{ColorToken, Placement, BOARD_CELLS, DEAL_ATTEMPTS, DEAL_SIZE, PIECE_PALETTE};

/// Occupancy marker stamped while probing branches; real palette tokens are
/// assigned only after a trio passes the search.
const PROBE_TOKEN: ColorToken = ColorToken::new(0x808080);

/// One dealt piece: a catalog shape, its tint, and whether it has been
/// placed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealPiece {
    pub shape: ShapeId,
    pub token: ColorToken,
    pub placed: bool,
}

/// A fair deal of exactly [`DEAL_SIZE`] pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealBatch {
    pieces: [DealPiece; DEAL_SIZE],
}

impl DealBatch {
    pub(crate) fn new(shapes: [ShapeId; DEAL_SIZE], tokens: [ColorToken; DEAL_SIZE]) -> Self {
        Self {
            pieces: std::array::from_fn(|slot| DealPiece {
                shape: shapes[slot],
                token: tokens[slot],
                placed: false,
            }),
        }
    }

    /// All pieces in slot order
    pub fn pieces(&self) -> &[DealPiece] {
        &self.pieces
    }

    /// Piece at `slot`, or None past the batch
    pub fn piece(&self, slot: usize) -> Option<&DealPiece> {
        self.pieces.get(slot)
    }

    /// Slots that have not been placed yet
    pub fn unplaced(&self) -> impl Iterator<Item = (usize, &DealPiece)> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, piece)| !piece.placed)
    }

    /// Whether every piece has been placed
    pub fn all_placed(&self) -> bool {
        self.pieces.iter().all(|piece| piece.placed)
    }

    /// Whether any unplaced piece still fits somewhere on the board.
    /// False for a fully placed batch.
    pub fn any_unplaced_fits(&self, board: &Board) -> bool {
        self.unplaced()
            .any(|(_, piece)| fits_anywhere(board, piece.shape.shape()))
    }

    pub(crate) fn mark_placed(&mut self, slot: usize) {
        if let Some(piece) = self.pieces.get_mut(slot) {
            piece.placed = true;
        }
    }
}

/// The order and anchors under which a trio was proven placeable
pub type Assignment = ArrayVec<(ShapeId, Placement), DEAL_SIZE>;

/// Exact joint-feasibility search.
///
/// Returns the winning assignment (placement order chosen by the search) if
/// the shapes can all be placed sequentially on `board`, or None if the
/// search space is exhausted. Feeding the assignment back through
/// `fits`/`place` in order always succeeds; tests rely on that.
/// `shapes` holds at most [`DEAL_SIZE`] entries.
pub fn find_joint_placement(board: &Board, shapes: &[ShapeId]) -> Option<Assignment> {
    let remaining: ArrayVec<ShapeId, DEAL_SIZE> = shapes.iter().copied().collect();
    let mut assignment = Assignment::new();
    if search(*board, &remaining, &mut assignment) {
        Some(assignment)
    } else {
        None
    }
}

/// One level of the backtracking search. `picks` accumulates the assignment
/// along the current branch and is unwound on failure.
fn search(
    board: Board,
    remaining: &ArrayVec<ShapeId, DEAL_SIZE>,
    picks: &mut Assignment,
) -> bool {
    if remaining.is_empty() {
        return true;
    }

    // Placement lists for every remaining shape on this snapshot. Any shape
    // with nowhere to go kills the branch outright; otherwise expand the
    // most constrained shape to keep the branching factor down.
    let mut best_slot = 0usize;
    let mut best_spots: Option<ArrayVec<Placement, BOARD_CELLS>> = None;
    for (slot, id) in remaining.iter().enumerate() {
        let spots = enumerate_placements(&board, id.shape());
        if spots.is_empty() {
            return false;
        }
        let tighter = match &best_spots {
            None => true,
            Some(current) => spots.len() < current.len(),
        };
        if tighter {
            best_slot = slot;
            best_spots = Some(spots);
        }
    }
    let spots = match best_spots {
        Some(spots) => spots,
        None => return false,
    };

    let mut rest = remaining.clone();
    let id = rest.remove(best_slot);
    for anchor in spots {
        let probed = board.place(id.shape(), anchor.row, anchor.col, PROBE_TOKEN);
        picks.push((id, anchor));
        if search(probed, &rest, picks) {
            return true;
        }
        picks.pop();
    }
    false
}

/// Produce a fair deal for the current board, or None when the sampling
/// bound is exhausted (board exhaustion, the game-over signal).
pub fn deal_fair(board: &Board, rng: &mut impl RandomSource) -> Option<DealBatch> {
    for _ in 0..DEAL_ATTEMPTS {
        let shapes = [
            random_shape(rng),
            random_shape(rng),
            random_shape(rng),
        ];

        // Cheap prefilter: every shape must fit somewhere on its own before
        // the joint search is worth running.
        if !shapes
            .iter()
            .all(|id| fits_anywhere(board, id.shape()))
        {
            continue;
        }

        if find_joint_placement(board, &shapes).is_some() {
            let tokens = [
                random_token(rng),
                random_token(rng),
                random_token(rng),
            ];
            return Some(DealBatch::new(shapes, tokens));
        }
    }
    None
}

/// Uniform palette draw for a dealt piece's tint
fn random_token(rng: &mut impl RandomSource) -> ColorToken {
    ColorToken::palette(rng.next_range(PIECE_PALETTE.len() as u32) as usize)
}
