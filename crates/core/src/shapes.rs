//! Shape catalog - the fixed set of placeable polyominoes
//!
//! The catalog is a static list of 17 shapes, monomino up to the two 5-cell
//! corner pieces. Every listed orientation is its own entry; no rotation or
//! normalization is ever derived at runtime, so an orientation that is not
//! listed cannot be dealt.
//!
//! Shapes are stored as a bounding box plus the occupied cells as
//! `(row, col)` offsets from the top-left corner. The flat offset list is
//! what the board operations iterate over; the bounding box is what anchors
//! and placement bounds are computed from.

use crate::rng::RandomSource;
use block_breeze_types::MAX_SHAPE_DIM;

/// An immutable polyomino shape.
///
/// `rows`/`cols` describe the tight bounding box (each at most
/// [`MAX_SHAPE_DIM`]); `cells` lists every occupied offset within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: &'static [(u8, u8)],
}

impl Shape {
    /// Bounding-box height in cells
    pub const fn rows(&self) -> u8 {
        self.rows
    }

    /// Bounding-box width in cells
    pub const fn cols(&self) -> u8 {
        self.cols
    }

    /// Occupied cells as (row, col) offsets from the top-left corner
    pub const fn cells(&self) -> &'static [(u8, u8)] {
        self.cells
    }

    /// Number of occupied cells
    pub const fn area(&self) -> usize {
        self.cells.len()
    }

    /// Whether the matrix cell at (row, col) is occupied
    pub fn occupied(&self, row: u8, col: u8) -> bool {
        self.cells.iter().any(|&(r, c)| r == row && c == col)
    }
}

/// Number of catalog entries
pub const CATALOG_SIZE: usize = 17;

/// The dealable shapes, in the fixed catalog order.
///
/// Mirror-image and rotated forms appear as separate entries where the game
/// offers them; absent forms (e.g. a vertical S) simply do not exist.
pub const CATALOG: [Shape; CATALOG_SIZE] = [
    // dot
    Shape { rows: 1, cols: 1, cells: &[(0, 0)] },
    // dominoes
    Shape { rows: 1, cols: 2, cells: &[(0, 0), (0, 1)] },
    Shape { rows: 2, cols: 1, cells: &[(0, 0), (1, 0)] },
    // straight triominoes
    Shape { rows: 1, cols: 3, cells: &[(0, 0), (0, 1), (0, 2)] },
    Shape { rows: 3, cols: 1, cells: &[(0, 0), (1, 0), (2, 0)] },
    // square
    Shape { rows: 2, cols: 2, cells: &[(0, 0), (0, 1), (1, 0), (1, 1)] },
    // tall corner pieces
    Shape { rows: 3, cols: 2, cells: &[(0, 0), (1, 0), (2, 0), (2, 1)] },
    Shape { rows: 3, cols: 2, cells: &[(0, 1), (1, 1), (2, 0), (2, 1)] },
    // zigzags
    Shape { rows: 2, cols: 3, cells: &[(0, 0), (0, 1), (1, 1), (1, 2)] },
    Shape { rows: 2, cols: 3, cells: &[(0, 1), (0, 2), (1, 0), (1, 1)] },
    // tee
    Shape { rows: 2, cols: 3, cells: &[(0, 0), (0, 1), (0, 2), (1, 1)] },
    // straight fours
    Shape { rows: 1, cols: 4, cells: &[(0, 0), (0, 1), (0, 2), (0, 3)] },
    Shape { rows: 4, cols: 1, cells: &[(0, 0), (1, 0), (2, 0), (3, 0)] },
    // lying corner pieces
    Shape { rows: 2, cols: 3, cells: &[(0, 0), (0, 1), (0, 2), (1, 0)] },
    Shape { rows: 2, cols: 3, cells: &[(0, 0), (0, 1), (0, 2), (1, 2)] },
    // five-cell blocks
    Shape { rows: 3, cols: 2, cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)] },
    Shape { rows: 3, cols: 2, cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 1)] },
];

/// Identifier of a catalog entry.
///
/// The catalog is indexed rather than named because orientations are distinct
/// entries, not rotations of a named base shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(u8);

impl ShapeId {
    /// Wrap a catalog index. Returns None for indices past the catalog.
    pub fn new(index: usize) -> Option<Self> {
        if index < CATALOG_SIZE {
            Some(ShapeId(index as u8))
        } else {
            None
        }
    }

    /// The raw catalog index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The shape this id refers to
    pub fn shape(self) -> &'static Shape {
        &CATALOG[self.0 as usize]
    }
}

/// All catalog entries
pub fn catalog() -> &'static [Shape] {
    &CATALOG
}

/// Independent uniform draw from the catalog
pub fn random_shape(rng: &mut impl RandomSource) -> ShapeId {
    ShapeId(rng.next_range(CATALOG_SIZE as u32) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size() {
        assert_eq!(CATALOG.len(), CATALOG_SIZE);
        assert_eq!(catalog().len(), CATALOG_SIZE);
    }

    #[test]
    fn test_shapes_fit_their_bounding_boxes() {
        for (i, shape) in CATALOG.iter().enumerate() {
            assert!(shape.rows() >= 1 && shape.rows() <= MAX_SHAPE_DIM, "shape {}", i);
            assert!(shape.cols() >= 1 && shape.cols() <= MAX_SHAPE_DIM, "shape {}", i);
            assert!(!shape.cells().is_empty(), "shape {} has no cells", i);
            for &(r, c) in shape.cells() {
                assert!(r < shape.rows() && c < shape.cols(), "shape {} cell out of box", i);
            }
        }
    }

    #[test]
    fn test_bounding_boxes_are_tight() {
        // Every shape must touch all four edges of its box, otherwise the
        // anchor math would leave phantom margins.
        for (i, shape) in CATALOG.iter().enumerate() {
            assert!(shape.cells().iter().any(|&(r, _)| r == 0), "shape {}", i);
            assert!(shape.cells().iter().any(|&(_, c)| c == 0), "shape {}", i);
            assert!(
                shape.cells().iter().any(|&(r, _)| r == shape.rows() - 1),
                "shape {}",
                i
            );
            assert!(
                shape.cells().iter().any(|&(_, c)| c == shape.cols() - 1),
                "shape {}",
                i
            );
        }
    }

    #[test]
    fn test_no_duplicate_cells() {
        for (i, shape) in CATALOG.iter().enumerate() {
            let cells = shape.cells();
            for (a, cell) in cells.iter().enumerate() {
                assert!(
                    !cells[a + 1..].contains(cell),
                    "shape {} lists cell {:?} twice",
                    i,
                    cell
                );
            }
        }
    }

    #[test]
    fn test_no_duplicate_shapes() {
        for (a, first) in CATALOG.iter().enumerate() {
            for (b, second) in CATALOG.iter().enumerate().skip(a + 1) {
                assert!(
                    first != second,
                    "catalog entries {} and {} are identical",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_monomino_and_square() {
        let dot = &CATALOG[0];
        assert_eq!((dot.rows(), dot.cols(), dot.area()), (1, 1, 1));
        assert!(dot.occupied(0, 0));

        let square = &CATALOG[5];
        assert_eq!((square.rows(), square.cols(), square.area()), (2, 2, 4));
        for r in 0..2 {
            for c in 0..2 {
                assert!(square.occupied(r, c));
            }
        }
    }

    #[test]
    fn test_areas_by_entry() {
        let areas: Vec<usize> = CATALOG.iter().map(|s| s.area()).collect();
        assert_eq!(
            areas,
            vec![1, 2, 2, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 5, 5]
        );
    }

    #[test]
    fn test_shape_id_bounds() {
        assert!(ShapeId::new(0).is_some());
        assert!(ShapeId::new(CATALOG_SIZE - 1).is_some());
        assert!(ShapeId::new(CATALOG_SIZE).is_none());

        let id = ShapeId::new(5).unwrap();
        assert_eq!(id.index(), 5);
        assert_eq!(id.shape(), &CATALOG[5]);
    }

    #[test]
    fn test_random_shape_covers_the_catalog() {
        let mut rng = crate::rng::SimpleRng::new(99);
        let mut seen = [false; CATALOG_SIZE];
        for _ in 0..2000 {
            seen[random_shape(&mut rng).index()] = true;
        }
        assert!(seen.iter().all(|&s| s), "some catalog entry never drawn");
    }
}
