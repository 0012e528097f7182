//! Per-cell transition rule compilation.
//!
//! For every cell the compiler derives an ordered case analysis over the
//! *current* values of the cell and its bounded neighbors, one case per
//! movement direction and tile configuration. The update model is
//! synchronous: every cell's successor is a function of the same pre-move
//! snapshot, so no guard ever refers to another cell's successor value.
//! Under the single-player invariant the guards are mutually exclusive;
//! at most one case fires per cell per step.

use sokomv_board::{Board, Move, Tile};

/// A (row, col) cell coordinate.
pub type Coord = (usize, usize);

const PLAYER: [Tile; 2] = [Tile::Player, Tile::PlayerOnGoal];
const BOXES: [Tile; 2] = [Tile::Box, Tile::BoxOnGoal];
const FREE: [Tile; 2] = [Tile::Floor, Tile::Goal];
const PUSH_BLOCKERS: [Tile; 3] = [Tile::Box, Tile::Wall, Tile::BoxOnGoal];

/// What the player cell turns into when the player leaves it.
const DEPARTURES: [(Tile, Tile); 2] = [
    (Tile::Player, Tile::Floor),
    (Tile::PlayerOnGoal, Tile::Goal),
];

/// Membership test on one cell: it currently holds one of `any_of`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellCond {
    pub coord: Coord,
    pub any_of: Vec<Tile>,
}

/// Guard of one rule case: a movement plus a conjunction of cell tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    pub movement: Move,
    pub cells: Vec<CellCond>,
}

impl Guard {
    /// Does this guard hold on `board` under movement `mv`?
    pub fn matches(&self, board: &Board, mv: Move) -> bool {
        self.movement == mv
            && self.cells.iter().all(|cond| {
                board
                    .get(cond.coord.0, cond.coord.1)
                    .is_some_and(|tile| cond.any_of.contains(&tile))
            })
    }
}

/// Successor value of a rule case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseResult {
    /// The cell keeps its current value.
    Unchanged,
    /// The cell takes this value.
    Value(Tile),
}

/// One guarded successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCase {
    pub guard: Guard,
    pub result: CaseResult,
}

/// Next-state rule for a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellRule {
    /// The cell never changes, independent of movement. Walls only.
    Constant(Tile),
    /// Ordered case analysis; the first matching guard wins, and an
    /// implicit final case leaves the cell unchanged.
    Cases(Vec<RuleCase>),
}

/// The complete rule set for one board snapshot, indexed row-major.
///
/// A pure function of the board: recomputed from scratch whenever the
/// board changes, never patched.
#[derive(Debug, Clone)]
pub struct TransitionModel {
    rows: usize,
    cols: usize,
    rules: Vec<CellRule>,
}

impl TransitionModel {
    /// Compile the rule table for a board snapshot.
    pub fn compile(board: &Board) -> TransitionModel {
        let rows = board.rows();
        let cols = board.cols();
        let mut rules = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let rule = if board.get(row, col) == Some(Tile::Wall) {
                    CellRule::Constant(Tile::Wall)
                } else {
                    CellRule::Cases(cell_cases(board, (row, col)))
                };
                rules.push(rule);
            }
        }
        TransitionModel { rows, cols, rules }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Rule for the cell at (row, col).
    pub fn rule(&self, row: usize, col: usize) -> &CellRule {
        &self.rules[row * self.cols + col]
    }

    /// All rules with their coordinates, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &CellRule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| ((i / self.cols, i % self.cols), rule))
    }

    /// Evaluate the rule table on a concrete board for one movement,
    /// producing the successor board. Every cell reads the same pre-move
    /// snapshot. The board must have the dimensions this table was
    /// compiled for.
    pub fn apply(&self, board: &Board, mv: Move) -> Board {
        debug_assert_eq!((board.rows(), board.cols()), (self.rows, self.cols));
        let mut next = board.clone();
        for ((row, col), rule) in self.cells() {
            let current = match board.get(row, col) {
                Some(tile) => tile,
                None => continue,
            };
            let value = match rule {
                CellRule::Constant(tile) => *tile,
                CellRule::Cases(cases) => {
                    match cases.iter().find(|c| c.guard.matches(board, mv)) {
                        Some(case) => match case.result {
                            CaseResult::Unchanged => current,
                            CaseResult::Value(tile) => tile,
                        },
                        None => current,
                    }
                }
            };
            next.set(row, col, value);
        }
        next
    }
}

/// `steps` cells along `mv` from `at`; negative steps go against the
/// movement. `None` when the result falls outside the grid; callers omit
/// the rule case rather than reference an out-of-range index.
fn offset(at: Coord, mv: Move, steps: isize, rows: usize, cols: usize) -> Option<Coord> {
    let (dr, dc) = mv.delta();
    let row = at.0 as isize + dr * steps;
    let col = at.1 as isize + dc * steps;
    if row >= 0 && col >= 0 && (row as usize) < rows && (col as usize) < cols {
        Some((row as usize, col as usize))
    } else {
        None
    }
}

fn cond(coord: Coord, any_of: &[Tile]) -> CellCond {
    CellCond {
        coord,
        any_of: any_of.to_vec(),
    }
}

fn case(movement: Move, cells: Vec<CellCond>, result: CaseResult) -> RuleCase {
    RuleCase {
        guard: Guard { movement, cells },
        result,
    }
}

/// The ordered case analysis for one non-wall cell.
fn cell_cases(board: &Board, at: Coord) -> Vec<RuleCase> {
    let rows = board.rows();
    let cols = board.cols();
    let mut cases = Vec::new();

    // Movement blocked by a wall ahead or by the grid edge. The edge
    // variant carries no neighbor condition at all.
    for mv in Move::ALL {
        let mut cells = vec![cond(at, &PLAYER)];
        if let Some(ahead) = offset(at, mv, 1, rows, cols) {
            cells.push(cond(ahead, &[Tile::Wall]));
        }
        cases.push(case(mv, cells, CaseResult::Unchanged));
    }

    // Player walks onto a free cell: this cell is vacated.
    for (occupant, leaves) in DEPARTURES {
        for mv in Move::ALL {
            if let Some(ahead) = offset(at, mv, 1, rows, cols) {
                cases.push(case(
                    mv,
                    vec![cond(at, &[occupant]), cond(ahead, &FREE)],
                    CaseResult::Value(leaves),
                ));
            }
        }
    }

    // Player walks onto this cell: the player stands one cell against the
    // movement direction.
    for (ground, becomes) in [(Tile::Floor, Tile::Player), (Tile::Goal, Tile::PlayerOnGoal)] {
        for mv in Move::ALL {
            if let Some(behind) = offset(at, mv, -1, rows, cols) {
                cases.push(case(
                    mv,
                    vec![cond(behind, &PLAYER), cond(at, &[ground])],
                    CaseResult::Value(becomes),
                ));
            }
        }
    }

    // Push blocked: a box ahead with no room behind it. When the second
    // cell is off-grid no case is emitted; the default covers it.
    for mv in Move::ALL {
        if let (Some(ahead), Some(ahead2)) = (
            offset(at, mv, 1, rows, cols),
            offset(at, mv, 2, rows, cols),
        ) {
            cases.push(case(
                mv,
                vec![
                    cond(at, &PLAYER),
                    cond(ahead, &BOXES),
                    cond(ahead2, &PUSH_BLOCKERS),
                ],
                CaseResult::Unchanged,
            ));
        }
    }

    // Push succeeds: this cell is vacated by the pusher.
    for (occupant, leaves) in DEPARTURES {
        for mv in Move::ALL {
            if let (Some(ahead), Some(ahead2)) = (
                offset(at, mv, 1, rows, cols),
                offset(at, mv, 2, rows, cols),
            ) {
                cases.push(case(
                    mv,
                    vec![
                        cond(at, &[occupant]),
                        cond(ahead, &BOXES),
                        cond(ahead2, &FREE),
                    ],
                    CaseResult::Value(leaves),
                ));
            }
        }
    }

    // This cell holds the pushed box and the pusher steps in.
    for (boxed, becomes) in [(Tile::Box, Tile::Player), (Tile::BoxOnGoal, Tile::PlayerOnGoal)] {
        for mv in Move::ALL {
            if let (Some(behind), Some(ahead)) = (
                offset(at, mv, -1, rows, cols),
                offset(at, mv, 1, rows, cols),
            ) {
                cases.push(case(
                    mv,
                    vec![
                        cond(behind, &PLAYER),
                        cond(at, &[boxed]),
                        cond(ahead, &FREE),
                    ],
                    CaseResult::Value(becomes),
                ));
            }
        }
    }

    // The pushed box lands on this cell: box one cell against the
    // movement, pusher two cells against it.
    for (ground, becomes) in [(Tile::Floor, Tile::Box), (Tile::Goal, Tile::BoxOnGoal)] {
        for mv in Move::ALL {
            if let (Some(behind), Some(behind2)) = (
                offset(at, mv, -1, rows, cols),
                offset(at, mv, -2, rows, cols),
            ) {
                cases.push(case(
                    mv,
                    vec![
                        cond(behind2, &PLAYER),
                        cond(behind, &BOXES),
                        cond(at, &[ground]),
                    ],
                    CaseResult::Value(becomes),
                ));
            }
        }
    }

    cases
}
