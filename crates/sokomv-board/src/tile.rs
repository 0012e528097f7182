//! Tile and movement value types shared across the pipeline.

use std::fmt;

/// One cell of a Sokoban board.
///
/// The seven values mirror the XSB symbols on the input side and the SMV
/// enum on the output side; `Tile` is the single currency both speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Wall,
    Floor,
    Goal,
    Player,
    PlayerOnGoal,
    Box,
    BoxOnGoal,
}

impl Tile {
    /// Parse an XSB board symbol. Unknown characters yield `None`.
    pub fn from_symbol(c: char) -> Option<Tile> {
        match c {
            '#' => Some(Tile::Wall),
            '-' => Some(Tile::Floor),
            '.' => Some(Tile::Goal),
            '@' => Some(Tile::Player),
            '+' => Some(Tile::PlayerOnGoal),
            '$' => Some(Tile::Box),
            '*' => Some(Tile::BoxOnGoal),
            _ => None,
        }
    }

    /// The XSB symbol for this tile.
    pub fn symbol(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor => '-',
            Tile::Goal => '.',
            Tile::Player => '@',
            Tile::PlayerOnGoal => '+',
            Tile::Box => '$',
            Tile::BoxOnGoal => '*',
        }
    }

    /// The identifier used for this tile in the SMV model and echoed back
    /// in nuXmv trace output.
    pub fn smv_name(self) -> &'static str {
        match self {
            Tile::Wall => "Wall",
            Tile::Floor => "Floor",
            Tile::Goal => "Goal",
            Tile::Player => "Player",
            Tile::PlayerOnGoal => "PonGoal",
            Tile::Box => "Box",
            Tile::BoxOnGoal => "BonGoal",
        }
    }

    /// Inverse of [`Tile::smv_name`].
    pub fn from_smv_name(name: &str) -> Option<Tile> {
        match name {
            "Wall" => Some(Tile::Wall),
            "Floor" => Some(Tile::Floor),
            "Goal" => Some(Tile::Goal),
            "Player" => Some(Tile::Player),
            "PonGoal" => Some(Tile::PlayerOnGoal),
            "Box" => Some(Tile::Box),
            "BonGoal" => Some(Tile::BoxOnGoal),
            _ => None,
        }
    }

    /// True for the player-occupied values.
    pub fn is_player(self) -> bool {
        matches!(self, Tile::Player | Tile::PlayerOnGoal)
    }

    /// True for the box-occupied values.
    pub fn is_box(self) -> bool {
        matches!(self, Tile::Box | Tile::BoxOnGoal)
    }

    /// True if this cell is a goal location, regardless of occupant.
    pub fn is_goal_location(self) -> bool {
        matches!(self, Tile::Goal | Tile::PlayerOnGoal | Tile::BoxOnGoal)
    }
}

/// A player movement direction.
///
/// The direction is chosen non-deterministically by the checker at every
/// step; this side only enumerates the consequences of each choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

impl Move {
    /// All directions, in the order rule cases are emitted.
    pub const ALL: [Move; 4] = [Move::Left, Move::Right, Move::Up, Move::Down];

    /// The token used for the `movement` variable in the SMV model.
    pub fn smv_token(self) -> &'static str {
        match self {
            Move::Left => "l",
            Move::Right => "r",
            Move::Up => "u",
            Move::Down => "d",
        }
    }

    /// Inverse of [`Move::smv_token`].
    pub fn from_smv_token(token: &str) -> Option<Move> {
        match token {
            "l" => Some(Move::Left),
            "r" => Some(Move::Right),
            "u" => Some(Move::Up),
            "d" => Some(Move::Down),
            _ => None,
        }
    }

    /// (row, col) offset of one step in this direction. Rows grow
    /// downward.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Move::Left => (0, -1),
            Move::Right => (0, 1),
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Move::Left => "left",
            Move::Right => "right",
            Move::Up => "up",
            Move::Down => "down",
        };
        f.write_str(word)
    }
}
