//! Solve orchestration above the compiler and the external checker.
//!
//! Each solve is the same synchronous pipeline: compile the current
//! board into a model, hand it to the engine, decode the output. The
//! incremental variant in [`iterative`] repeats that cycle over growing
//! goal prefixes, feeding each iteration's decoded final board into the
//! next compile.

pub mod iterative;
pub mod oneshot;

pub use iterative::{solve_iteratively, IterationReport, IterativeOutcome};
pub use oneshot::{solve, SolveOutcome};

use sokomv_nuxmv::{EngineError, TraceError};
use thiserror::Error;

/// Pipeline failure: the engine could not be driven, or its output
/// violated the trace protocol. Terminal "no solution" answers are not
/// errors; they surface in the outcome enums.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Trace(#[from] TraceError),
}

pub type SolveResult<T> = Result<T, SolveError>;
