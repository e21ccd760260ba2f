//! Placement engine - legal anchor enumeration
//!
//! Scans the full anchor grid in row-major order and keeps every position
//! where the shape fits. The ordering is part of the contract: the fair-deal
//! search tries placements in enumeration order, so a fixed board and shape
//! always produce the same candidate sequence.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::shapes::Shape;
use block_breeze_types::{Placement, BOARD_CELLS, BOARD_SIZE};

/// All legal anchors for the shape on this board, row-major.
pub fn enumerate_placements(board: &Board, shape: &Shape) -> ArrayVec<Placement, BOARD_CELLS> {
    let mut placements = ArrayVec::new();
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            if board.fits(shape, row, col) {
                placements.push(Placement::new(row, col));
            }
        }
    }
    placements
}

/// Whether the shape fits at at least one anchor. Early-returning form of
/// [`enumerate_placements`] for the prefilter and stuck-batch checks.
pub fn fits_anywhere(board: &Board, shape: &Shape) -> bool {
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            if board.fits(shape, row, col) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RandomSource, SimpleRng};
    use crate::shapes::CATALOG;
    use block_breeze_types::ColorToken;

    #[test]
    fn test_empty_board_anchor_counts() {
        let board = Board::new();
        for shape in CATALOG.iter() {
            let expected =
                (8 - shape.rows() as usize + 1) * (8 - shape.cols() as usize + 1);
            assert_eq!(
                enumerate_placements(&board, shape).len(),
                expected,
                "{}x{} shape",
                shape.rows(),
                shape.cols()
            );
        }
    }

    #[test]
    fn test_enumeration_matches_fits_exactly() {
        // Random half-filled board, then cross-check every anchor of every
        // catalog shape against fits().
        let mut rng = SimpleRng::new(20240817);
        let mut board = Board::new();
        for row in 0..8 {
            for col in 0..8 {
                if rng.next_range(2) == 0 {
                    board.set(row, col, Some(ColorToken::palette(0)));
                }
            }
        }

        for shape in CATALOG.iter() {
            let placements = enumerate_placements(&board, shape);
            for row in 0..8u8 {
                for col in 0..8u8 {
                    let listed = placements.contains(&Placement::new(row, col));
                    assert_eq!(
                        listed,
                        board.fits(shape, row, col),
                        "anchor ({}, {})",
                        row,
                        col
                    );
                }
            }
            assert_eq!(fits_anywhere(&board, shape), !placements.is_empty());
        }
    }

    #[test]
    fn test_enumeration_is_row_major() {
        let board = Board::new();
        let placements = enumerate_placements(&board, &CATALOG[5]);
        for pair in placements.windows(2) {
            assert!((pair[0].row, pair[0].col) < (pair[1].row, pair[1].col));
        }
        assert_eq!(placements[0], Placement::new(0, 0));
    }

    #[test]
    fn test_single_hole_admits_only_the_dot() {
        let mut board = Board::new();
        for row in 0..8 {
            for col in 0..8 {
                board.set(row, col, Some(ColorToken::palette(1)));
            }
        }
        board.set(4, 4, None);

        let dot = &CATALOG[0];
        assert_eq!(
            enumerate_placements(&board, dot).as_slice(),
            &[Placement::new(4, 4)]
        );
        for shape in CATALOG.iter().filter(|s| s.area() > 1) {
            assert!(!fits_anywhere(&board, shape));
        }
    }
}
