//! Rendering of the compiled model in nuXmv's input syntax.
//!
//! The serializer is deliberately dumb: all rule semantics live in the
//! structured [`TransitionModel`]; this module only decides how a guard,
//! a case, or the goal conjunction is spelled. The identifiers
//! (`game_board`, `movement`, `is_solvable`, the tile names) are part of
//! the wire format; the trace decoder matches them in nuXmv's output.

use crate::rules::{CaseResult, CellCond, CellRule, Coord, Guard, TransitionModel};
use crate::solvability::SolvabilityPredicate;
use sokomv_board::{Board, Tile};

/// Render a complete SMV module: state variables, initial state, per-cell
/// transition rules, the solvability definition, and the objective
/// "eventually solvable" (negated, so a counterexample is a solution).
pub fn emit_model(
    board: &Board,
    model: &TransitionModel,
    solvable: &SolvabilityPredicate,
) -> String {
    let mut out = String::new();

    out.push_str("MODULE main\n\n");

    out.push_str("-- Puzzle state variables\n");
    out.push_str("VAR\n");
    out.push_str(&format!(
        "    game_board: array 0..{} of array 0..{} of \
         {{Wall, Player, PonGoal, Box, BonGoal, Goal, Floor}};\n",
        board.rows() - 1,
        board.cols() - 1,
    ));
    out.push_str("    movement: {r, l, u, d}; -- chosen non-deterministically\n\n");

    out.push_str("-- Initial state\n");
    out.push_str("INIT\n");
    out.push_str(&emit_init(board));
    out.push('\n');

    out.push_str("-- Per-cell transition rules\n");
    out.push_str("ASSIGN\n");
    for (coord, rule) in model.cells() {
        out.push_str(&emit_cell_rule(coord, rule));
    }
    out.push('\n');

    out.push_str("-- Solvability: every goal cell holds a box\n");
    out.push_str("DEFINE\n");
    out.push_str(&format!(
        "    is_solvable := {};\n\n",
        emit_solvable(solvable)
    ));

    out.push_str("LTLSPEC !(F is_solvable);\n");

    out
}

fn cell_var(coord: Coord) -> String {
    format!("game_board[{}][{}]", coord.0, coord.1)
}

fn emit_init(board: &Board) -> String {
    let mut terms = Vec::with_capacity(board.rows() * board.cols());
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            if let Some(tile) = board.get(row, col) {
                terms.push(format!(
                    "    {} = {}",
                    cell_var((row, col)),
                    tile.smv_name()
                ));
            }
        }
    }
    let mut out = terms.join(" &\n");
    out.push_str(";\n");
    out
}

fn emit_cell_rule(coord: Coord, rule: &CellRule) -> String {
    let var = cell_var(coord);
    match rule {
        CellRule::Constant(tile) => {
            format!("    next({var}) := {};\n", tile.smv_name())
        }
        CellRule::Cases(cases) => {
            let mut out = format!("    next({var}) :=\n        case\n");
            for rule_case in cases {
                let result = match rule_case.result {
                    CaseResult::Unchanged => var.clone(),
                    CaseResult::Value(tile) => tile.smv_name().to_string(),
                };
                out.push_str(&format!(
                    "            {}: {};\n",
                    emit_guard(&rule_case.guard),
                    result
                ));
            }
            out.push_str(&format!("            TRUE: {var};\n"));
            out.push_str("        esac;\n");
            out
        }
    }
}

/// Conjunction in reading order: the leading cell test, the movement,
/// then the remaining cell tests.
fn emit_guard(guard: &Guard) -> String {
    let mut terms = Vec::with_capacity(guard.cells.len() + 1);
    let mut cells = guard.cells.iter();
    if let Some(first) = cells.next() {
        terms.push(emit_cond(first));
    }
    terms.push(format!("movement = {}", guard.movement.smv_token()));
    for cond in cells {
        terms.push(emit_cond(cond));
    }
    terms.join(" & ")
}

fn emit_cond(cond: &CellCond) -> String {
    let var = cell_var(cond.coord);
    match cond.any_of.as_slice() {
        [tile] => format!("{var} = {}", tile.smv_name()),
        tiles => {
            let alternatives: Vec<String> = tiles
                .iter()
                .map(|tile| format!("{var} = {}", tile.smv_name()))
                .collect();
            format!("({})", alternatives.join(" | "))
        }
    }
}

fn emit_solvable(solvable: &SolvabilityPredicate) -> String {
    if solvable.is_trivial() {
        return "TRUE".to_string();
    }
    let terms: Vec<String> = solvable
        .goals()
        .iter()
        .map(|&coord| format!("{} = {}", cell_var(coord), Tile::BoxOnGoal.smv_name()))
        .collect();
    terms.join(" & ")
}
