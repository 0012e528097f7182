//! Board representation and XSB text parsing.

use crate::tile::Tile;
use std::fmt;
use thiserror::Error;

/// Board construction error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    NonRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("board has no player cell")]
    NoPlayer,

    #[error("board has {count} player cells, expected exactly one")]
    MultiplePlayers { count: usize },
}

pub type BoardResult<T> = Result<T, BoardError>;

/// A validated rectangular Sokoban board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Tile>>,
}

impl Board {
    /// Parse a board from XSB text.
    ///
    /// Characters outside the seven-symbol alphabet are dropped and the
    /// row re-compacted; blank lines are skipped entirely. Downstream
    /// formatting relies on this permissive skip, so it must stay a
    /// per-character filter, not a per-row rejection. The surviving grid
    /// must be rectangular and contain exactly one player cell.
    pub fn parse(text: &str) -> BoardResult<Board> {
        let cells: Vec<Vec<Tile>> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.chars().filter_map(Tile::from_symbol).collect())
            .collect();
        Board::from_cells(cells)
    }

    /// Build a board from pre-parsed rows, with the same validation as
    /// [`Board::parse`].
    pub fn from_cells(cells: Vec<Vec<Tile>>) -> BoardResult<Board> {
        let rows = cells.len();
        if rows == 0 {
            return Err(BoardError::Empty);
        }
        let cols = cells[0].len();
        if cols == 0 {
            return Err(BoardError::Empty);
        }
        for (row, line) in cells.iter().enumerate() {
            if line.len() != cols {
                return Err(BoardError::NonRectangular {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
        }

        let players = cells.iter().flatten().filter(|t| t.is_player()).count();
        match players {
            1 => Ok(Board { rows, cols, cells }),
            0 => Err(BoardError::NoPlayer),
            count => Err(BoardError::MultiplePlayers { count }),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Tile at (row, col), or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Overwrite one cell. Returns false when (row, col) is out of range.
    ///
    /// This is a raw write used when replaying decoded trace deltas; it
    /// does not re-check the player-count invariant.
    pub fn set(&mut self, row: usize, col: usize, tile: Tile) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = tile;
                true
            }
            None => false,
        }
    }

    /// Coordinates of every goal location, in row-major scan order,
    /// independent of what currently occupies it.
    pub fn goal_cells(&self) -> Vec<(usize, usize)> {
        let mut goals = Vec::new();
        for (row, line) in self.cells.iter().enumerate() {
            for (col, tile) in line.iter().enumerate() {
                if tile.is_goal_location() {
                    goals.push((row, col));
                }
            }
        }
        goals
    }

    /// Number of box-occupied cells. Conserved by every valid transition.
    pub fn box_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|t| t.is_box())
            .count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.cells {
            for tile in line {
                write!(f, "{}", tile.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
