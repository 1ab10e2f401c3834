pub mod error;
pub mod render;
pub mod skyline;
pub mod solver;
pub mod types;
