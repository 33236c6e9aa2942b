//! ratiocinator: a three-valued propositional reasoning engine.
//!
//! Knowledge is a set of named [`proposition::Proposition`]s over a
//! TRUE/FALSE/UNKNOWN logic ([`logic::Tripartite`]). Assumptions files
//! define implications, disjunctions, and assertions; facts files assert
//! truth values and boolean expressions. The inference engine applies
//! Modus Ponens, Modus Tollens, Hypothetical Syllogism, Disjunctive
//! Syllogism, and Resolution in a fixed-point loop, attaching provenance
//! to every rule firing so results can be traced back to their axioms.
//!
//! Most callers want the [`engine::Ratiocinator`] facade.

pub mod engine;
pub mod error;
pub mod expression;
pub mod infer;
pub mod kb;
pub mod logic;
pub mod parse;
pub mod proposition;
pub mod report;
pub mod trace;

pub use engine::{EngineConfig, Ratiocinator};
pub use error::{RatioError, RatioResult};
pub use kb::KnowledgeBase;
pub use logic::{LogicalOperator, Quantifier, Tripartite};
pub use proposition::{Conflict, InferenceProvenance, Proposition};
