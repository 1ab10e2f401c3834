use std::collections::BTreeMap;

use crate::error::SolveError;
use crate::types::{Board, Piece};

/// One maximal horizontal open segment of the skyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub x: u32,
    pub y: u32,
    pub length: u32,
}

impl Edge {
    pub fn new(x: u32, y: u32, length: u32) -> Self {
        Self { x, y, length }
    }

    pub fn end(&self) -> u32 {
        self.x + self.length
    }
}

/// Processing order of edges: lowest first, then leftmost.
pub fn priority(edge: &Edge) -> (u32, u32) {
    (edge.y, edge.x)
}

/// The open top boundary of everything placed so far.
///
/// Edges are kept in a map ordered by [`priority`], so the first entry is
/// always the lowest-leftmost edge. Projected onto the x axis the edges cover
/// `[0, board.w)` with no gaps and no overlaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skyline {
    board: Board,
    edges: BTreeMap<(u32, u32), u32>,
}

impl Skyline {
    pub fn new(board: Board) -> Self {
        let mut skyline = Self {
            board,
            edges: BTreeMap::new(),
        };
        skyline.insert(Edge::new(0, 0, board.w));
        skyline
    }

    /// Edges in processing order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges
            .iter()
            .map(|(&(y, x), &length)| Edge::new(x, y, length))
    }

    pub fn peek_lowest_leftmost(&self) -> Option<Edge> {
        self.edges
            .first_key_value()
            .map(|(&(y, x), &length)| Edge::new(x, y, length))
    }

    pub fn pop_lowest_leftmost(&mut self) -> Result<Edge, SolveError> {
        self.edges
            .pop_first()
            .map(|((y, x), length)| Edge::new(x, y, length))
            .ok_or(SolveError::EmptySkyline)
    }

    /// Absorbs every following edge that sits at the same height and starts
    /// where `edge` ends.
    pub fn merge_adjacent(&mut self, mut edge: Edge) -> Edge {
        while let Some(next) = self.peek_lowest_leftmost() {
            if next.y != edge.y || next.x != edge.end() {
                break;
            }
            self.edges.remove(&priority(&next));
            edge.length += next.length;
        }
        edge
    }

    /// Records `piece` sitting on the left end of `edge`. The piece must be no
    /// wider than the edge.
    pub fn insert_after_placement(&mut self, edge: Edge, piece: Piece) {
        debug_assert!(piece.w <= edge.length);
        self.insert(Edge::new(edge.x, edge.y + piece.h, piece.w));
        if piece.w < edge.length {
            self.insert(Edge::new(edge.x + piece.w, edge.y, edge.length - piece.w));
        }
    }

    /// Fit test on the lowest-leftmost edge. On success the skyline is
    /// updated and the bottom-left corner of the piece is returned.
    ///
    /// A failed test leaves the skyline partly consumed; callers work on a
    /// copy and drop it afterwards.
    pub fn place(&mut self, piece: Piece) -> Result<Option<(u32, u32)>, SolveError> {
        let edge = self.pop_lowest_leftmost()?;
        // Edges never sit above the board top, so the subtraction cannot wrap.
        if piece.h > self.board.h - edge.y {
            return Ok(None);
        }

        let edge = self.merge_adjacent(edge);
        if piece.w > edge.length {
            return Ok(None);
        }

        self.insert_after_placement(edge, piece);
        Ok(Some((edge.x, edge.y)))
    }

    fn insert(&mut self, edge: Edge) {
        self.edges.insert(priority(&edge), edge.length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The edges, sorted by x, must tile `[0, width)` exactly.
    fn assert_partition(skyline: &Skyline, width: u32) {
        let mut edges: Vec<Edge> = skyline.edges().collect();
        edges.sort_by_key(|e| e.x);
        let mut cursor = 0;
        for e in &edges {
            assert_eq!(e.x, cursor, "gap or overlap at x={cursor}: {edges:?}");
            assert!(e.length > 0);
            cursor = e.end();
        }
        assert_eq!(cursor, width);
    }

    #[test]
    fn test_priority_breaks_ties_by_x() {
        let low_right = Edge::new(5, 1, 1);
        let low_left = Edge::new(2, 1, 1);
        let high_left = Edge::new(0, 3, 1);
        assert!(priority(&low_left) < priority(&low_right));
        assert!(priority(&low_right) < priority(&high_left));
    }

    #[test]
    fn test_pop_order() {
        let mut skyline = Skyline::new(Board::new(10, 10));
        skyline.place(Piece::new(3, 4)).unwrap();
        skyline.place(Piece::new(3, 2)).unwrap();
        // Edges now: (0,4,3) (3,2,3) (6,0,4)
        assert_eq!(skyline.pop_lowest_leftmost().unwrap(), Edge::new(6, 0, 4));
        assert_eq!(skyline.pop_lowest_leftmost().unwrap(), Edge::new(3, 2, 3));
        assert_eq!(skyline.pop_lowest_leftmost().unwrap(), Edge::new(0, 4, 3));
        assert_eq!(
            skyline.pop_lowest_leftmost(),
            Err(SolveError::EmptySkyline)
        );
    }

    #[test]
    fn test_full_width_placement_leaves_one_edge() {
        let mut skyline = Skyline::new(Board::new(4, 4));
        assert_eq!(skyline.place(Piece::new(4, 2)).unwrap(), Some((0, 0)));
        assert_eq!(skyline.edges().count(), 1);
        assert_eq!(skyline.peek_lowest_leftmost(), Some(Edge::new(0, 2, 4)));
    }

    #[test]
    fn test_partial_placement_splits_edge() {
        let mut skyline = Skyline::new(Board::new(4, 4));
        assert_eq!(skyline.place(Piece::new(1, 3)).unwrap(), Some((0, 0)));
        let edges: Vec<Edge> = skyline.edges().collect();
        assert_eq!(edges, vec![Edge::new(1, 0, 3), Edge::new(0, 3, 1)]);
        assert_partition(&skyline, 4);
    }

    #[test]
    fn test_merge_joins_level_runs() {
        let mut skyline = Skyline::new(Board::new(6, 6));
        skyline.place(Piece::new(2, 2)).unwrap();
        skyline.place(Piece::new(2, 2)).unwrap();
        skyline.place(Piece::new(2, 2)).unwrap();
        assert_eq!(skyline.edges().count(), 3);

        let first = skyline.pop_lowest_leftmost().unwrap();
        let merged = skyline.merge_adjacent(first);
        assert_eq!(merged, Edge::new(0, 2, 6));
        assert_eq!(skyline.peek_lowest_leftmost(), None);
    }

    #[test]
    fn test_merge_stops_at_step() {
        let mut skyline = Skyline::new(Board::new(6, 6));
        skyline.place(Piece::new(2, 2)).unwrap();
        skyline.place(Piece::new(2, 3)).unwrap();
        skyline.place(Piece::new(2, 2)).unwrap();

        let first = skyline.pop_lowest_leftmost().unwrap();
        assert_eq!(first, Edge::new(0, 2, 2));
        assert_eq!(skyline.merge_adjacent(first), first);
        assert_eq!(skyline.edges().count(), 2);
    }

    #[test]
    fn test_piece_fits_only_after_merge() {
        let mut skyline = Skyline::new(Board::new(4, 4));
        skyline.place(Piece::new(2, 1)).unwrap();
        skyline.place(Piece::new(2, 1)).unwrap();
        assert_eq!(skyline.edges().count(), 2);

        assert_eq!(skyline.place(Piece::new(4, 3)).unwrap(), Some((0, 1)));
        assert_eq!(skyline.edges().count(), 1);
        assert_partition(&skyline, 4);
    }

    #[test]
    fn test_too_tall_is_rejected() {
        let mut skyline = Skyline::new(Board::new(4, 4));
        skyline.place(Piece::new(4, 2)).unwrap();
        assert_eq!(skyline.place(Piece::new(4, 3)).unwrap(), None);
    }

    #[test]
    fn test_huge_piece_above_floor_is_rejected() {
        let mut skyline = Skyline::new(Board::new(u32::MAX, 3));
        assert_eq!(skyline.place(Piece::new(u32::MAX, 1)).unwrap(), Some((0, 0)));
        assert_eq!(skyline.place(Piece::new(1, u32::MAX)).unwrap(), None);

        let mut skyline = Skyline::new(Board::new(u32::MAX, 3));
        skyline.place(Piece::new(u32::MAX, 1)).unwrap();
        assert_eq!(skyline.place(Piece::new(u32::MAX, 2)).unwrap(), Some((0, 1)));
        assert_eq!(skyline.peek_lowest_leftmost(), Some(Edge::new(0, 3, u32::MAX)));
    }

    #[test]
    fn test_too_wide_is_rejected() {
        let mut skyline = Skyline::new(Board::new(4, 4));
        skyline.place(Piece::new(2, 1)).unwrap();
        assert_eq!(skyline.place(Piece::new(3, 1)).unwrap(), None);
    }

    #[test]
    fn test_rejected_copy_leaves_original_intact() {
        let mut skyline = Skyline::new(Board::new(4, 4));
        skyline.place(Piece::new(2, 1)).unwrap();
        let before = skyline.clone();

        let mut trial = skyline.clone();
        assert_eq!(trial.place(Piece::new(3, 1)).unwrap(), None);
        assert_eq!(skyline, before);
    }

    #[test]
    fn test_coverage_holds_through_mixed_placements() {
        let mut skyline = Skyline::new(Board::new(10, 10));
        for piece in [
            Piece::new(3, 2),
            Piece::new(4, 5),
            Piece::new(3, 1),
            Piece::new(3, 1),
            Piece::new(2, 4),
        ] {
            assert!(skyline.place(piece).unwrap().is_some());
            assert_partition(&skyline, 10);
        }
    }
}
