//! The fixed-point deduction loop.
//!
//! One pass runs five phases in order: Modus Ponens/Tollens over every
//! IMPLIES proposition, Hypothetical Syllogism over every ordered pair of
//! IMPLIES propositions, Disjunctive Syllogism over every OR proposition,
//! Resolution over every unordered pair of OR propositions, then expression
//! evaluation with quantifier-scope commits. Passes repeat until one makes
//! zero changes, or the pass bound is hit and deduction reports
//! [`InferError::DidNotConverge`] instead of spinning forever.

use crate::error::InferError;
use crate::expression::Expression;
use crate::infer::rules::{self, Disjunction, Implication};
use crate::kb::KnowledgeBase;
use crate::logic::{LogicalOperator, Quantifier, Tripartite};

/// Pass bound used when no explicit limit is configured.
pub const DEFAULT_MAX_PASSES: usize = 512;

/// Summary of a completed deduction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeduceOutcome {
    /// Passes executed, including the final zero-change pass.
    pub passes: usize,
    /// Total rule firings and expression commits across all passes.
    pub changes: usize,
}

/// Run deduction passes until a fixed point or the pass bound.
///
/// The knowledge base is left in its most-derived state either way; on
/// `DidNotConverge` the caller can still inspect it (and its conflict
/// lists) to diagnose the oscillation.
pub fn deduce_all(kb: &mut KnowledgeBase, max_passes: usize) -> Result<DeduceOutcome, InferError> {
    // Expressions are moved out for the duration of the run so phase 5 can
    // evaluate them against the knowledge base while mutating propositions.
    let mut expressions = std::mem::take(kb.expressions_mut());
    let result = run_passes(kb, &mut expressions, max_passes);
    *kb.expressions_mut() = expressions;
    result
}

fn run_passes(
    kb: &mut KnowledgeBase,
    expressions: &mut [Expression],
    max_passes: usize,
) -> Result<DeduceOutcome, InferError> {
    let mut total_changes = 0usize;

    for pass in 1..=max_passes {
        let mut pass_changes = 0usize;

        // Phase 1: Modus Ponens and Modus Tollens over IMPLIES propositions.
        let implications = collect_implications(kb);
        for imp in &implications {
            if rules::apply_modus_ponens(imp, kb) {
                pass_changes += 1;
            }
            if rules::apply_modus_tollens(imp, kb) {
                pass_changes += 1;
            }
        }

        // Phase 2: Hypothetical Syllogism over every ordered pair. New
        // chains may only become resolvable after phase 1 updated a shared
        // intermediate, hence the full rescan each pass.
        for i in 0..implications.len() {
            for j in 0..implications.len() {
                if i != j
                    && rules::apply_hypothetical_syllogism(&implications[i], &implications[j], kb)
                {
                    pass_changes += 1;
                }
            }
        }

        // Phase 3: Disjunctive Syllogism over OR propositions.
        let disjunctions = collect_disjunctions(kb);
        for disj in &disjunctions {
            if rules::apply_disjunctive_syllogism(disj, kb) {
                pass_changes += 1;
            }
        }

        // Phase 4: Resolution over every unordered pair.
        for i in 0..disjunctions.len() {
            for j in (i + 1)..disjunctions.len() {
                if rules::apply_resolution(&disjunctions[i], &disjunctions[j], kb) {
                    pass_changes += 1;
                }
            }
        }

        // Phase 5: expression evaluation with quantifier-scope commits.
        pass_changes += evaluate_expressions(kb, expressions);

        tracing::debug!(pass, changes = pass_changes, "deduction pass complete");
        total_changes += pass_changes;

        if pass_changes == 0 {
            tracing::info!(passes = pass, changes = total_changes, "deduction converged");
            return Ok(DeduceOutcome {
                passes: pass,
                changes: total_changes,
            });
        }
    }

    tracing::warn!(max_passes, "deduction did not converge");
    Err(InferError::DidNotConverge { passes: max_passes })
}

fn collect_implications(kb: &KnowledgeBase) -> Vec<Implication> {
    kb.iter()
        .filter(|(_, p)| p.relation == LogicalOperator::Implies)
        .map(|(_, p)| Implication {
            prefix: p.prefix.clone(),
            antecedent: p.antecedent.clone(),
            consequent: p.consequent.clone(),
        })
        .collect()
}

fn collect_disjunctions(kb: &KnowledgeBase) -> Vec<Disjunction> {
    kb.iter()
        .filter(|(_, p)| p.relation == LogicalOperator::Or)
        .map(|(_, p)| Disjunction {
            prefix: p.prefix.clone(),
            left: p.antecedent.clone(),
            right: p.consequent.clone(),
        })
        .collect()
}

/// Evaluate every expression fresh and commit results to the target
/// proposition per its quantifier scope. Commits are untracked assertions,
/// so expression-derived values trace as axioms. Targets absent from the
/// knowledge base are skipped; a malformed expression is contained to that
/// expression and must not poison the rest of the pass.
fn evaluate_expressions(kb: &mut KnowledgeBase, expressions: &mut [Expression]) -> usize {
    let mut changes = 0usize;

    for expr in expressions.iter_mut() {
        expr.invalidate();
        let result = match expr.evaluate(kb) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(target_prop = %expr.prefix(), %err, "skipping malformed expression");
                continue;
            }
        };

        let Some(target) = kb.get_mut(expr.prefix()) else {
            continue;
        };
        let current = target.truth_value();

        match target.scope {
            Quantifier::UniversalAffirmative => {
                if current != result && result == Tripartite::True {
                    target.set_truth_value(Tripartite::True);
                    changes += 1;
                }
            }
            Quantifier::UniversalNegative => {
                if current != result && result == Tripartite::False {
                    target.set_truth_value(Tripartite::False);
                    changes += 1;
                }
            }
            Quantifier::ParticularAffirmative => {
                if result == Tripartite::True {
                    target.set_truth_value(Tripartite::True);
                    changes += 1;
                }
            }
            Quantifier::ParticularNegative => {
                if result == Tripartite::False && current != Tripartite::True {
                    target.set_truth_value(Tripartite::False);
                    changes += 1;
                }
            }
            Quantifier::None => {}
        }
    }

    changes
}
