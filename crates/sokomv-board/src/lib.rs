//! Sokoban board model: tiles, movements, and the XSB text format.

pub mod board;
pub mod tile;

pub use board::{Board, BoardError, BoardResult};
pub use tile::{Move, Tile};
