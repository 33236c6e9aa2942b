//! The inference engine: rule functions and the fixed-point deduction loop.

pub mod engine;
pub mod rules;

pub use engine::{deduce_all, DeduceOutcome, DEFAULT_MAX_PASSES};
pub use rules::{Disjunction, Implication};
