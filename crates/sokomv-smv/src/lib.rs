//! Compilation of a Sokoban board into an SMV transition system.
//!
//! The pipeline is split in two layers: [`rules`] and [`solvability`]
//! build a structured model (per-cell guarded cases, goal conjunction)
//! that can be inspected and unit-tested on its own, and [`emit`] renders
//! that structure in nuXmv's input syntax.

pub mod emit;
pub mod rules;
pub mod solvability;

pub use emit::emit_model;
pub use rules::{CaseResult, CellCond, CellRule, Coord, Guard, RuleCase, TransitionModel};
pub use solvability::SolvabilityPredicate;
