//! Contract errors raised by the solver.
//!
//! An instance that simply has no tiling is not an error: see
//! [`Outcome::Unsolvable`](crate::types::Outcome::Unsolvable).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The board has a zero dimension.
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    InvalidBoard { width: u32, height: u32 },

    /// A piece has a zero dimension.
    #[error("piece {index} has a zero dimension ({width}x{height})")]
    InvalidPiece { index: usize, width: u32, height: u32 },

    /// The skyline ran out of edges while pieces were still waiting to be placed.
    #[error("skyline is empty but pieces remain")]
    EmptySkyline,
}
