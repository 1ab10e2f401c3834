use tracing::{debug, info, trace};

use crate::error::SolveError;
use crate::skyline::Skyline;
use crate::types::{Outcome, Piece, Placement, Puzzle, SearchStats, Solution};

/// Exact tiling search over a skyline.
///
/// Pieces are sorted by area, largest first, once before the search starts.
/// Every node then tries the remaining pieces in that order, each in its given
/// orientation and then rotated, on the lowest-leftmost open edge.
pub struct Solver {
    puzzle: Puzzle,
}

impl Solver {
    pub fn new(puzzle: Puzzle) -> Self {
        Self { puzzle }
    }

    pub fn solve(&self) -> Result<Outcome, SolveError> {
        self.solve_with_stats().map(|(outcome, _)| outcome)
    }

    pub fn solve_with_stats(&self) -> Result<(Outcome, SearchStats), SolveError> {
        self.validate()?;
        let board = self.puzzle.board;

        let pieces_area = self.puzzle.pieces_area();
        if pieces_area != board.area() {
            debug!(
                pieces_area,
                board_area = board.area(),
                "piece area does not match board, skipping search"
            );
            return Ok((Outcome::Unsolvable, SearchStats::default()));
        }

        let pieces = self.sorted_pieces();
        let mut search = Search {
            pieces: &pieces,
            used: vec![false; pieces.len()],
            trace: Vec::with_capacity(pieces.len()),
            stats: SearchStats::default(),
        };
        let solved = search.descend(&Skyline::new(board), pieces.len())?;

        info!(
            board = %board,
            pieces = pieces.len(),
            solved,
            nodes = search.stats.nodes,
            placements_tried = search.stats.placements_tried,
            "search finished"
        );

        let outcome = if solved {
            Outcome::Solved(Solution {
                board,
                placements: search.trace,
            })
        } else {
            Outcome::Unsolvable
        };
        Ok((outcome, search.stats))
    }

    fn validate(&self) -> Result<(), SolveError> {
        let board = self.puzzle.board;
        if board.w == 0 || board.h == 0 {
            return Err(SolveError::InvalidBoard {
                width: board.w,
                height: board.h,
            });
        }
        for (index, p) in self.puzzle.pieces.iter().enumerate() {
            if p.w == 0 || p.h == 0 {
                return Err(SolveError::InvalidPiece {
                    index,
                    width: p.w,
                    height: p.h,
                });
            }
        }
        Ok(())
    }

    /// Pieces paired with their input position, largest area first. The sort
    /// is stable so equal areas keep their input order.
    fn sorted_pieces(&self) -> Vec<(usize, Piece)> {
        let mut pieces: Vec<(usize, Piece)> =
            self.puzzle.pieces.iter().copied().enumerate().collect();
        pieces.sort_by(|a, b| b.1.area().cmp(&a.1.area()));
        pieces
    }
}

struct Search<'a> {
    pieces: &'a [(usize, Piece)],
    used: Vec<bool>,
    trace: Vec<Placement>,
    stats: SearchStats,
}

impl Search<'_> {
    /// Returns `Ok(true)` once every piece is placed, leaving the placements
    /// in `trace`. On `Ok(false)` both `trace` and `used` are as they were on
    /// entry.
    fn descend(&mut self, skyline: &Skyline, remaining: usize) -> Result<bool, SolveError> {
        self.stats.nodes += 1;
        if remaining == 0 {
            return Ok(true);
        }

        for i in 0..self.pieces.len() {
            if self.used[i] {
                continue;
            }
            let (index, piece) = self.pieces[i];
            let orientations: &[bool] = if piece.is_square() {
                &[false]
            } else {
                &[false, true]
            };

            for &rotated in orientations {
                let candidate = if rotated { piece.rotated() } else { piece };
                let mut next = skyline.clone();
                self.stats.placements_tried += 1;
                let Some((x, y)) = next.place(candidate)? else {
                    continue;
                };

                trace!(piece = %candidate, x, y, depth = self.trace.len(), "placed");
                self.trace.push(Placement {
                    piece: candidate,
                    x,
                    y,
                    rotated,
                    index,
                });
                self.used[i] = true;

                if self.descend(&next, remaining - 1)? {
                    return Ok(true);
                }

                self.used[i] = false;
                self.trace.pop();
            }
        }

        Ok(false)
    }
}
