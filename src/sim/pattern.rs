//! Blast patterns
//!
//! Maps a detonating bubble to the cells that receive an explosion and the
//! explosion kind at each. Geometry is built from two primitives:
//! - rings: every cell at an exact Chebyshev distance from the origin
//! - arms: orthogonal runs of cells heading away from the origin
//!
//! Out-of-bounds cells are dropped and each cell is emitted at most once; the
//! first primitive to claim a cell decides its kind.

use super::board::{Board, Cell};
use super::entity::{Bubble, BubbleKind, ExplosionKind};

/// One explosion to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blast {
    pub cell: Cell,
    pub kind: ExplosionKind,
}

/// Cells at ring distance exactly `radius`, row by row
pub fn ring(origin: Cell, radius: i32) -> Vec<Cell> {
    let mut cells = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx.abs().max(dy.abs()) == radius {
                cells.push(origin.offset(dx, dy));
            }
        }
    }
    cells
}

/// Orthogonal arm cells at distances `start..=end` from the origin, ordered
/// by distance then W, E, N, S
pub fn arms(origin: Cell, start: i32, end: i32) -> Vec<Cell> {
    let mut cells = Vec::new();
    for d in start..=end {
        cells.push(origin.offset(-d, 0));
        cells.push(origin.offset(d, 0));
        cells.push(origin.offset(0, -d));
        cells.push(origin.offset(0, d));
    }
    cells
}

struct PatternBuilder<'a> {
    board: &'a Board,
    blasts: Vec<Blast>,
}

impl<'a> PatternBuilder<'a> {
    fn new(board: &'a Board) -> Self {
        Self {
            board,
            blasts: Vec::new(),
        }
    }

    fn emit(&mut self, cells: impl IntoIterator<Item = Cell>, kind: ExplosionKind) {
        for cell in cells {
            if !self.board.in_bounds(cell) || self.blasts.iter().any(|b| b.cell == cell) {
                continue;
            }
            self.blasts.push(Blast { cell, kind });
        }
    }
}

/// Explosions produced by `bubble` detonating at `origin`
pub fn blast_pattern(board: &Board, origin: Cell, bubble: &Bubble) -> Vec<Blast> {
    let mut out = PatternBuilder::new(board);
    match bubble.kind {
        BubbleKind::Blue => {
            let reach = if bubble.attack_boosted { 3 } else { 2 };
            for r in 0..=reach {
                out.emit(ring(origin, r), ExplosionKind::Plain);
            }
        }
        BubbleKind::Red if bubble.attack_boosted => {
            out.emit(ring(origin, 1), ExplosionKind::Red);
            out.emit(arms(origin, 1, 2), ExplosionKind::Plain);
        }
        BubbleKind::Red => {
            for r in 0..=1 {
                out.emit(ring(origin, r), ExplosionKind::Red);
            }
            out.emit(arms(origin, 2, 2), ExplosionKind::Plain);
        }
        BubbleKind::Black => {
            out.emit(ring(origin, 1), ExplosionKind::Black);
        }
        BubbleKind::Green => {
            out.emit(board.row(origin.y), ExplosionKind::Plain);
            out.emit(board.column(origin.x), ExplosionKind::Plain);
        }
        BubbleKind::Purple => {
            let boxed: Vec<Cell> = ring(origin, 1)
                .into_iter()
                .filter(|c| board.in_bounds(*c) && board.has_box(*c))
                .collect();
            out.emit(boxed, ExplosionKind::Red);
        }
    }
    out.blasts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::BoxMaterial;
    use proptest::prelude::*;

    fn bubble(kind: BubbleKind, attack_boosted: bool) -> Bubble {
        Bubble {
            kind,
            attack_boosted,
        }
    }

    fn kinds_at(blasts: &[Blast], cell: Cell) -> Vec<ExplosionKind> {
        blasts.iter().filter(|b| b.cell == cell).map(|b| b.kind).collect()
    }

    #[test]
    fn test_ring_sizes() {
        let o = Cell::new(0, 0);
        assert_eq!(ring(o, 0), vec![o]);
        assert_eq!(ring(o, 1).len(), 8);
        assert_eq!(ring(o, 2).len(), 16);
        assert!(ring(o, 3).iter().all(|c| c.ring_distance(o) == 3));
    }

    #[test]
    fn test_blue_fills_square() {
        let board = Board::new(20, 20, 40.0);
        let o = Cell::new(10, 10);
        let blasts = blast_pattern(&board, o, &bubble(BubbleKind::Blue, false));
        assert_eq!(blasts.len(), 25);
        assert!(blasts.iter().all(|b| b.kind == ExplosionKind::Plain));
        assert_eq!(blasts[0].cell, o);

        let boosted = blast_pattern(&board, o, &bubble(BubbleKind::Blue, true));
        assert_eq!(boosted.len(), 49);
    }

    #[test]
    fn test_blue_is_clipped_at_corner() {
        let board = Board::new(20, 20, 40.0);
        let blasts = blast_pattern(&board, Cell::new(0, 0), &bubble(BubbleKind::Blue, false));
        assert_eq!(blasts.len(), 9);
        assert!(blasts.iter().all(|b| board.in_bounds(b.cell)));
    }

    #[test]
    fn test_black_spares_center() {
        let board = Board::new(20, 20, 40.0);
        let o = Cell::new(5, 5);
        let blasts = blast_pattern(&board, o, &bubble(BubbleKind::Black, false));
        assert_eq!(blasts.len(), 8);
        assert!(kinds_at(&blasts, o).is_empty());
        assert!(blasts.iter().all(|b| b.kind == ExplosionKind::Black));
    }

    #[test]
    fn test_red_plain_tips() {
        // Tip cells sit one beyond ring 1 on both orthogonal axes
        let board = Board::new(20, 20, 40.0);
        let o = Cell::new(5, 5);
        let blasts = blast_pattern(&board, o, &bubble(BubbleKind::Red, false));
        assert_eq!(blasts.len(), 13);
        assert_eq!(kinds_at(&blasts, o), vec![ExplosionKind::Red]);
        assert_eq!(kinds_at(&blasts, o.offset(1, 1)), vec![ExplosionKind::Red]);
        for tip in [o.offset(-2, 0), o.offset(2, 0), o.offset(0, -2), o.offset(0, 2)] {
            assert_eq!(kinds_at(&blasts, tip), vec![ExplosionKind::Plain]);
        }
        assert!(kinds_at(&blasts, o.offset(2, 1)).is_empty());
    }

    #[test]
    fn test_boosted_red_ring_and_cross() {
        let board = Board::new(20, 20, 40.0);
        let o = Cell::new(5, 5);
        let blasts = blast_pattern(&board, o, &bubble(BubbleKind::Red, true));
        // 8 ring cells keep Red; the cross only adds its outer cells
        assert_eq!(blasts.len(), 12);
        assert!(kinds_at(&blasts, o).is_empty());
        assert_eq!(kinds_at(&blasts, o.offset(1, 0)), vec![ExplosionKind::Red]);
        assert_eq!(kinds_at(&blasts, o.offset(0, 2)), vec![ExplosionKind::Plain]);
    }

    #[test]
    fn test_purple_only_hits_boxes() {
        let mut board = Board::new(10, 10, 40.0);
        let o = Cell::new(4, 4);
        board.set_box(o.offset(1, 1), BoxMaterial::Dark);
        board.set_box(o.offset(-1, 0), BoxMaterial::O);
        board.set_box(o, BoxMaterial::Gold);
        board.set_box(o.offset(2, 0), BoxMaterial::O);
        let blasts = blast_pattern(&board, o, &bubble(BubbleKind::Purple, false));
        let cells: Vec<Cell> = blasts.iter().map(|b| b.cell).collect();
        assert_eq!(cells, vec![o.offset(-1, 0), o.offset(1, 1)]);
        assert!(blasts.iter().all(|b| b.kind == ExplosionKind::Red));
    }

    #[test]
    fn test_purple_at_edge_stays_in_bounds() {
        let mut board = Board::new(3, 3, 40.0);
        board.set_box(Cell::new(1, 0), BoxMaterial::N);
        let blasts = blast_pattern(&board, Cell::new(0, 0), &bubble(BubbleKind::Purple, true));
        assert_eq!(blasts.len(), 1);
    }

    #[test]
    fn test_green_row_first() {
        let board = Board::new(6, 4, 40.0);
        let o = Cell::new(2, 1);
        let blasts = blast_pattern(&board, o, &bubble(BubbleKind::Green, false));
        assert_eq!(blasts.len(), 6 + 4 - 1);
        assert!(blasts[..6].iter().all(|b| b.cell.y == 1));
        assert!(blasts[6..].iter().all(|b| b.cell.x == 2 && b.cell.y != 1));
    }

    proptest! {
        #[test]
        fn prop_green_covers_row_and_column(
            w in 1i32..30,
            h in 1i32..30,
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
        ) {
            let board = Board::new(w, h, 40.0);
            let o = Cell::new((fx * w as f64) as i32, (fy * h as f64) as i32);
            let blasts = blast_pattern(&board, o, &bubble(BubbleKind::Green, false));
            prop_assert_eq!(blasts.len() as i32, w + h - 1);
            prop_assert!(blasts.iter().all(|b| b.kind == ExplosionKind::Plain));
            prop_assert!(blasts.iter().all(|b| b.cell.x == o.x || b.cell.y == o.y));
        }
    }
}
