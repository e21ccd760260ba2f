//! Shape catalog tests - geometry facts the rest of the game leans on

use block_breeze::core::{catalog, enumerate_placements, fits_anywhere, Board, ShapeId};
use block_breeze::types::{BOARD_SIZE, MAX_SHAPE_DIM};

#[test]
fn test_every_shape_fits_an_empty_board() {
    let board = Board::new();
    for (index, shape) in catalog().iter().enumerate() {
        assert!(
            fits_anywhere(&board, shape),
            "catalog entry {} does not fit an empty board",
            index
        );
        assert!(board.fits(shape, 0, 0), "catalog entry {} rejected at origin", index);
    }
}

#[test]
fn test_anchor_count_follows_the_bounding_box() {
    // On an empty board a shape fits wherever its box does, so the number of
    // anchors is fully determined by the box dimensions.
    let board = Board::new();
    for (index, shape) in catalog().iter().enumerate() {
        let anchors = enumerate_placements(&board, shape);
        let expected =
            (BOARD_SIZE - shape.rows() + 1) as usize * (BOARD_SIZE - shape.cols() + 1) as usize;
        assert_eq!(anchors.len(), expected, "catalog entry {}", index);
    }
}

#[test]
fn test_bounding_boxes_within_limits() {
    for (index, shape) in catalog().iter().enumerate() {
        assert!(shape.rows() <= MAX_SHAPE_DIM, "catalog entry {}", index);
        assert!(shape.cols() <= MAX_SHAPE_DIM, "catalog entry {}", index);
        assert!((1..=5).contains(&shape.area()), "catalog entry {}", index);
    }
}

#[test]
fn test_occupied_matches_the_cell_list() {
    for shape in catalog() {
        let mut count = 0;
        for row in 0..shape.rows() {
            for col in 0..shape.cols() {
                if shape.occupied(row, col) {
                    count += 1;
                    assert!(shape.cells().contains(&(row, col)));
                }
            }
        }
        assert_eq!(count, shape.area());
    }
}

#[test]
fn test_shape_id_round_trip() {
    for index in 0..catalog().len() {
        let id = ShapeId::new(index).expect("valid catalog index");
        assert_eq!(id.index(), index);
        assert_eq!(id.shape(), &catalog()[index]);
    }
    assert!(ShapeId::new(catalog().len()).is_none());
}
