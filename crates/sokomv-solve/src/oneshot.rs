//! Single-shot solving: one model over the full goal set.

use crate::SolveResult;
use sokomv_board::{Board, Move};
use sokomv_nuxmv::{decode_moves, CheckMode, Engine};
use sokomv_smv::{emit_model, SolvabilityPredicate, TransitionModel};
use tracing::info;

/// Outcome of a single solve. An empty counterexample means "no path";
/// what that implies depends on the engine mode that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The checker produced a counterexample: a winning move sequence.
    Solved { moves: Vec<Move> },
    /// The bounded check found no path within its step bound; a larger
    /// bound may still succeed.
    NoPathWithinBound,
    /// The exhaustive check proved the board unsolvable.
    Unsolvable,
}

/// Compile `board` into a model, run the checker, decode the moves.
pub fn solve<E: Engine>(board: &Board, mode: CheckMode, engine: &E) -> SolveResult<SolveOutcome> {
    let transitions = TransitionModel::compile(board);
    let solvable = SolvabilityPredicate::for_board(board);
    let model = emit_model(board, &transitions, &solvable);

    info!(
        rows = board.rows(),
        cols = board.cols(),
        goals = solvable.goals().len(),
        ?mode,
        "checking full board"
    );

    let raw = engine.run(&model, mode)?;
    let moves = decode_moves(&raw)?;

    if moves.is_empty() {
        return Ok(match mode {
            CheckMode::Bounded { .. } => SolveOutcome::NoPathWithinBound,
            CheckMode::Exhaustive => SolveOutcome::Unsolvable,
        });
    }
    Ok(SolveOutcome::Solved { moves })
}
