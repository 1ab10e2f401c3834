use serde::{Deserialize, Deserializer, Serialize};

/// Accepts both `28` and `28.0` for a dimension; rejects fractions and negatives.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).map_err(serde::de::Error::custom);
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        _ => Err(serde::de::Error::custom(format!(
            "expected a non-negative integer, got {value}"
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub w: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub h: u32,
}

impl Piece {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn is_square(&self) -> bool {
        self.w == self.h
    }

    /// Same piece up to rotation.
    pub fn same_shape(&self, other: &Piece) -> bool {
        self == other || *self == other.rotated()
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// The board has the same shape as a piece; it is never rotated.
pub type Board = Piece;

/// A committed placement. `x`/`y` is the bottom-left corner, y grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub piece: Piece,
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
    /// Position of the piece in the caller's input list.
    pub index: usize,
}

impl Placement {
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.x + other.piece.w
            && other.x < self.x + self.piece.w
            && self.y < other.y + other.piece.h
            && other.y < self.y + self.piece.h
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at ({}, {})", self.piece, self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub board: Board,
    pub pieces: Vec<Piece>,
}

impl Puzzle {
    pub fn new(board: Board, pieces: Vec<Piece>) -> Self {
        Self { board, pieces }
    }

    /// The Calibron 12 puzzle: twelve pieces that tile a 56x56 square.
    pub fn calibron12() -> Self {
        let pieces = [
            (28, 14),
            (28, 6),
            (21, 18),
            (21, 18),
            (10, 7),
            (14, 4),
            (17, 14),
            (32, 11),
            (32, 10),
            (28, 7),
            (21, 14),
            (21, 14),
        ]
        .into_iter()
        .map(|(w, h)| Piece::new(w, h))
        .collect();
        Self::new(Board::new(56, 56), pieces)
    }

    /// Saturates instead of overflowing; a saturated sum never equals a board area.
    pub fn pieces_area(&self) -> u64 {
        self.pieces
            .iter()
            .map(Piece::area)
            .fold(0, u64::saturating_add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub board: Board,
    /// Placements in commit order.
    pub placements: Vec<Placement>,
}

impl Solution {
    pub fn covered_area(&self) -> u64 {
        self.placements.iter().map(|p| p.piece.area()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Solved(Solution),
    Unsolvable,
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(s) => Some(s),
            Outcome::Unsolvable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Search nodes entered, including the root.
    pub nodes: u64,
    /// Fit tests attempted.
    pub placements_tried: u64,
}
