//! Incremental goal-subset solving.
//!
//! Full-board solvability can be too large a search for the checker, so
//! this trades one global search for a sequence of smaller ones: the
//! goal list is solved as growing prefixes, each iteration compiling a
//! fresh model from the board the previous iteration left behind.
//!
//! This is a heuristic decomposition, not an equivalence-preserving
//! transformation. Solving prefixes sequentially neither implies nor is
//! implied by solvability of the simultaneous problem: a board this loop
//! gives up on may still have a full solution, and a prefix order that
//! happens to work proves nothing about other orders.

use crate::SolveResult;
use sokomv_board::Board;
use sokomv_nuxmv::{decode_final_board, CheckMode, Engine};
use sokomv_smv::{emit_model, SolvabilityPredicate, TransitionModel};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Wall-clock timing of one successful iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationReport {
    /// 1-based iteration number, equal to the goal prefix length.
    pub iteration: usize,
    pub elapsed: Duration,
}

/// Outcome of the whole incremental run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterativeOutcome {
    /// Every goal prefix was solved; one report per iteration.
    Solved { iterations: Vec<IterationReport> },
    /// Some prefix had no path within the bound. The whole run is
    /// abandoned; timings of earlier iterations are not reported as
    /// success.
    Unsolvable { failed_iteration: usize },
}

/// Solve goal prefixes of increasing length, threading the decoded final
/// board of each iteration into the next. Goals are taken in row-major
/// board order. Every iteration uses the bounded engine with the same
/// step bound `k`.
pub fn solve_iteratively<E: Engine>(
    board: &Board,
    k: usize,
    engine: &E,
) -> SolveResult<IterativeOutcome> {
    let goals = board.goal_cells();
    let mut current = board.clone();
    let mut iterations = Vec::with_capacity(goals.len());

    for prefix_len in 1..=goals.len() {
        let transitions = TransitionModel::compile(&current);
        let solvable = SolvabilityPredicate::for_goals(goals[..prefix_len].to_vec());
        let model = emit_model(&current, &transitions, &solvable);

        info!(
            iteration = prefix_len,
            total = goals.len(),
            "checking goal prefix"
        );

        let start = Instant::now();
        let raw = engine.run(&model, CheckMode::Bounded { k })?;
        let elapsed = start.elapsed();

        match decode_final_board(&raw, &current)? {
            Some(next) => {
                debug!(iteration = prefix_len, ?elapsed, "goal prefix solved");
                iterations.push(IterationReport {
                    iteration: prefix_len,
                    elapsed,
                });
                current = next;
            }
            None => {
                info!(
                    iteration = prefix_len,
                    "no path for this goal prefix, abandoning the run"
                );
                return Ok(IterativeOutcome::Unsolvable {
                    failed_iteration: prefix_len,
                });
            }
        }
    }

    Ok(IterativeOutcome::Solved { iterations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sokomv_board::Tile;
    use sokomv_nuxmv::EngineError;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Engine stub that replays scripted outputs in order.
    struct Scripted {
        outputs: RefCell<VecDeque<&'static str>>,
    }

    impl Scripted {
        fn new(outputs: &[&'static str]) -> Scripted {
            Scripted {
                outputs: RefCell::new(outputs.iter().copied().collect()),
            }
        }
    }

    impl Engine for Scripted {
        fn run(&self, _model: &str, _mode: CheckMode) -> Result<String, EngineError> {
            Ok(self
                .outputs
                .borrow_mut()
                .pop_front()
                .expect("engine invoked more times than scripted")
                .to_string())
        }
    }

    /// Two boxes, two goals, boxes one push away.
    fn two_goal_board() -> Board {
        Board::parse("######\n#@$.-#\n#-$.-#\n######").unwrap()
    }

    const FIRST_GOAL_TRACE: &str = "\
  -> State: 1.1 <-
    movement = r
  -> State: 1.2 <-
    game_board[1][1] = Floor
    game_board[1][2] = Player
    game_board[1][3] = BonGoal
";

    const NO_SOLUTION: &str = "-- no counterexample found with bound 10\n";

    #[test]
    fn failure_in_a_later_iteration_reports_no_timings() {
        let engine = Scripted::new(&[FIRST_GOAL_TRACE, NO_SOLUTION]);
        let outcome = solve_iteratively(&two_goal_board(), 10, &engine).unwrap();
        assert_eq!(outcome, IterativeOutcome::Unsolvable { failed_iteration: 2 });
    }

    #[test]
    fn each_iteration_feeds_the_next_board() {
        const SECOND_GOAL_TRACE: &str = "\
  -> State: 1.1 <-
    movement = d
  -> State: 1.2 <-
    game_board[2][1] = Floor
    game_board[2][2] = Player
    game_board[2][3] = BonGoal
";
        let engine = Scripted::new(&[FIRST_GOAL_TRACE, SECOND_GOAL_TRACE]);
        let outcome = solve_iteratively(&two_goal_board(), 10, &engine).unwrap();
        let IterativeOutcome::Solved { iterations } = outcome else {
            panic!("expected a fully solved run");
        };
        assert_eq!(iterations.len(), 2);
        assert_eq!(iterations[0].iteration, 1);
        assert_eq!(iterations[1].iteration, 2);
    }

    #[test]
    fn zero_goals_solve_trivially() {
        let board = Board::parse("####\n#@-#\n####").unwrap();
        let engine = Scripted::new(&[]);
        let outcome = solve_iteratively(&board, 10, &engine).unwrap();
        assert_eq!(
            outcome,
            IterativeOutcome::Solved {
                iterations: Vec::new()
            }
        );
    }

    #[test]
    fn decoded_deltas_update_the_board_between_iterations() {
        // After the first iteration the model must be compiled from the
        // updated board: capture the second model and check its INIT
        // block reflects the first trace's delta.
        struct Capturing {
            inner: Scripted,
            models: RefCell<Vec<String>>,
        }

        impl Engine for Capturing {
            fn run(&self, model: &str, mode: CheckMode) -> Result<String, EngineError> {
                self.models.borrow_mut().push(model.to_string());
                self.inner.run(model, mode)
            }
        }

        let engine = Capturing {
            inner: Scripted::new(&[FIRST_GOAL_TRACE, NO_SOLUTION]),
            models: RefCell::new(Vec::new()),
        };
        let _ = solve_iteratively(&two_goal_board(), 10, &engine).unwrap();

        let models = engine.models.borrow();
        assert_eq!(models.len(), 2);
        assert!(models[0].contains("game_board[1][1] = Player &"));
        assert!(models[1].contains("game_board[1][1] = Floor &"));
        assert!(models[1].contains("game_board[1][3] = BonGoal &"));

        // First model checks only the first goal; the second conjoins
        // both goal cells.
        assert!(models[0].contains("is_solvable := game_board[1][3] = BonGoal;"));
        assert!(models[1].contains(
            "is_solvable := game_board[1][3] = BonGoal & game_board[2][3] = BonGoal;"
        ));

        // Sanity: the board delta really was what the test assumes.
        let mut expected = two_goal_board();
        assert!(expected.set(1, 1, Tile::Floor));
        assert!(expected.set(1, 2, Tile::Player));
        assert!(expected.set(1, 3, Tile::BoxOnGoal));
    }
}
