//! nuXmv interface: subprocess driver and counterexample trace decoding.
//!
//! The checker is an opaque external process. This crate ships a ready
//! model text to nuXmv, captures the raw stdout, and decodes that text.
//! Everything in between, the search itself, is the engine's business.

pub mod runner;
pub mod trace;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use runner::{nuxmv_available, NuxmvConfig, NuxmvRunner};
pub use trace::{decode_final_board, decode_moves, CellAssign};

/// Failure to launch or talk to the external checker. Not retried.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to write {path}: {source}")]
    Artifact { path: PathBuf, source: io::Error },

    #[error("failed to launch checker '{path}': {source}")]
    Launch { path: PathBuf, source: io::Error },

    #[error("failed to drive checker subprocess: {source}")]
    Subprocess { source: io::Error },

    #[error("checker produced no output")]
    NoOutput,
}

/// Trace protocol violation. These fail loudly: silently coercing a
/// malformed trace would fabricate a solution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    #[error("unrecognized movement token '{token}'")]
    UnknownMovement { token: String },

    #[error("malformed cell assignment: '{line}'")]
    MalformedCell { line: String },

    #[error("unrecognized tile name '{name}'")]
    UnknownTile { name: String },

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} board")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// How to drive the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// SAT-based bounded model checking, counterexamples up to `k` steps.
    Bounded { k: usize },
    /// BDD-based exhaustive checking.
    Exhaustive,
}

/// A model checker that consumes SMV model text and returns raw trace
/// output. Implemented by [`NuxmvRunner`]; tests substitute canned
/// outputs to exercise the pipeline without the binary.
pub trait Engine {
    fn run(&self, model: &str, mode: CheckMode) -> Result<String, EngineError>;
}
