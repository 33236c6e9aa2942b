//! Propositions: named facts and rules with provenance-tracked truth values.
//!
//! A [`Proposition`] is the unit of knowledge. Its truth value starts at
//! UNKNOWN and changes either through a fresh, untracked assertion (a fact
//! load) or through a provenance-tracked rule firing. Tracked overwrites
//! that change a definite value append a [`Conflict`] record before taking
//! effect; conflicts are diagnostic only and never block inference.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::logic::{LogicalOperator, Quantifier, Tripartite};

/// Seconds since the UNIX epoch; clock going backwards collapses to 0.
pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// How a truth value was derived: which rule fired and which premises it
/// consulted. Absence of provenance means the value was directly asserted
/// (an axiom).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceProvenance {
    /// Name of the inference rule (e.g. "ModusPonens").
    pub rule_fired: String,
    /// Names of the propositions consulted as premises, in citation order.
    pub premises: Vec<String>,
    /// Seconds since the UNIX epoch when the inference was made.
    pub timestamp: u64,
    /// Confidence in the derivation. Always 1.0 in the current rule set;
    /// reserved for graded reasoning.
    pub confidence: f32,
}

impl InferenceProvenance {
    /// Create a provenance record for a rule firing at full confidence.
    pub fn new(rule_fired: impl Into<String>, premises: Vec<String>) -> Self {
        Self {
            rule_fired: rule_fired.into(),
            premises,
            timestamp: now_secs(),
            confidence: 1.0,
        }
    }
}

/// Record of a truth value being overwritten by a differing value.
///
/// Purely diagnostic: conflicts are never consulted by inference and never
/// roll anything back. The overwrite that produced a conflict still took
/// effect (last write wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub old_value: Tripartite,
    pub new_value: Tripartite,
    /// Provenance of the overwritten value, if it had one.
    pub old_provenance: Option<InferenceProvenance>,
    /// Provenance of the overwriting value.
    pub new_provenance: InferenceProvenance,
    /// Seconds since the UNIX epoch when the conflict occurred.
    pub timestamp: u64,
}

/// A named fact or rule in the knowledge base.
///
/// The `prefix` is the label used for provenance citations and may differ
/// from the key the proposition is stored under (an `implies` assumption is
/// keyed by its consequent but cited by its prefix). `antecedent` and
/// `consequent` carry operand names when `relation` is IMPLIES; an OR
/// relation reuses the same two slots as left and right disjunct.
/// `subject`/`predicate` are descriptive strings not used by inference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Proposition {
    pub prefix: String,
    pub relation: LogicalOperator,
    pub antecedent: String,
    pub consequent: String,
    pub subject: String,
    pub predicate: String,
    truth_value: Tripartite,
    pub scope: Quantifier,
    provenance: Option<InferenceProvenance>,
    conflicts: Vec<Conflict>,
}

impl Proposition {
    /// Create an empty proposition (UNKNOWN, no relation, no scope).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a proposition with a prefix and an asserted truth value.
    pub fn with_truth(prefix: impl Into<String>, truth_value: Tripartite) -> Self {
        Self {
            prefix: prefix.into(),
            truth_value,
            ..Self::default()
        }
    }

    /// Create an IMPLIES proposition with universal-affirmative scope.
    pub fn implication(
        prefix: impl Into<String>,
        antecedent: impl Into<String>,
        consequent: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            relation: LogicalOperator::Implies,
            antecedent: antecedent.into(),
            consequent: consequent.into(),
            scope: Quantifier::UniversalAffirmative,
            ..Self::default()
        }
    }

    /// Create an OR proposition; the antecedent/consequent slots hold the
    /// left and right disjunct names.
    pub fn disjunction(
        prefix: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            relation: LogicalOperator::Or,
            antecedent: left.into(),
            consequent: right.into(),
            ..Self::default()
        }
    }

    pub fn truth_value(&self) -> Tripartite {
        self.truth_value
    }

    /// Assert a truth value without provenance tracking.
    ///
    /// Models a fresh, untracked assertion (fact load, expression-scope
    /// commit): any existing provenance is cleared and no conflict is
    /// recorded.
    pub fn set_truth_value(&mut self, value: Tripartite) {
        self.truth_value = value;
        self.provenance = None;
    }

    /// Set a truth value with provenance tracking.
    ///
    /// If the prior value was definite and differs from the new one, a
    /// [`Conflict`] is appended before the overwrite. The overwrite itself
    /// is unconditional either way.
    pub fn set_truth_value_traced(&mut self, value: Tripartite, provenance: InferenceProvenance) {
        if self.truth_value != Tripartite::Unknown && self.truth_value != value {
            tracing::debug!(
                prefix = %self.prefix,
                old = %self.truth_value,
                new = %value,
                rule = %provenance.rule_fired,
                "truth value conflict"
            );
            self.conflicts.push(Conflict {
                old_value: self.truth_value,
                new_value: value,
                old_provenance: self.provenance.clone(),
                new_provenance: provenance.clone(),
                timestamp: now_secs(),
            });
        }
        self.truth_value = value;
        self.provenance = Some(provenance);
    }

    pub fn provenance(&self) -> Option<&InferenceProvenance> {
        self.provenance.as_ref()
    }

    /// Whether this value was derived by a rule (as opposed to asserted).
    pub fn is_derived(&self) -> bool {
        self.provenance.is_some()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn clear_conflicts(&mut self) {
        self.conflicts.clear();
    }
}

impl std::fmt::Display for Proposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Proposition [{}] truth: {}, relation: {:?}",
            self.prefix, self.truth_value, self.relation
        )
    }
}
