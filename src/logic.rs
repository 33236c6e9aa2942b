//! The three-valued logical domain.
//!
//! [`Tripartite`] is a strong Kleene logic: UNKNOWN propagates through AND
//! and OR except where a definite operand decides the result on its own,
//! and NOT leaves UNKNOWN fixed. IMPLIES is material implication,
//! `!a || b`. EQUIVALENT is the one deliberate departure from Kleene: it
//! never yields UNKNOWN, degrading UNKNOWN operands to FALSE before
//! comparing. Downstream code relies on that asymmetry.

use serde::{Deserialize, Serialize};

/// A three-valued truth value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tripartite {
    True,
    False,
    #[default]
    Unknown,
}

impl Tripartite {
    /// All values, in display order.
    pub const ALL: [Tripartite; 3] = [Tripartite::True, Tripartite::False, Tripartite::Unknown];

    /// TRUE or FALSE, as opposed to UNKNOWN.
    pub fn is_definite(self) -> bool {
        self != Tripartite::Unknown
    }
}

impl std::fmt::Display for Tripartite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tripartite::True => "True",
            Tripartite::False => "False",
            Tripartite::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// A logical connective or structural token.
///
/// `LParen`/`RParen` only ever appear inside expression token streams;
/// `None` marks a proposition that carries no relation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[default]
    None,
    And,
    Or,
    Not,
    Implies,
    Equivalent,
    LParen,
    RParen,
}

impl LogicalOperator {
    /// Binding strength for expression evaluation. Structural tokens and
    /// `None` have no precedence.
    pub fn precedence(self) -> Option<u8> {
        match self {
            LogicalOperator::Not => Some(3),
            LogicalOperator::And => Some(2),
            LogicalOperator::Or => Some(1),
            LogicalOperator::Implies | LogicalOperator::Equivalent => Some(0),
            _ => None,
        }
    }

    /// A connective taking two operands.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            LogicalOperator::And
                | LogicalOperator::Or
                | LogicalOperator::Implies
                | LogicalOperator::Equivalent
        )
    }
}

/// The quantifier scope of a proposition, deciding how expression results
/// are committed to it during deduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    /// Commit TRUE expression results; FALSE and UNKNOWN are ignored.
    UniversalAffirmative,
    /// Commit FALSE expression results; TRUE and UNKNOWN are ignored.
    UniversalNegative,
    /// Commit TRUE expression results on every evaluation, even when the
    /// stored value already agrees.
    ParticularAffirmative,
    /// Commit FALSE expression results unless the stored value is TRUE.
    ParticularNegative,
    /// No scope; expression results are not committed.
    #[default]
    None,
}

// ---------------------------------------------------------------------------
// Kleene operators
// ---------------------------------------------------------------------------

pub fn and(a: Tripartite, b: Tripartite) -> Tripartite {
    use Tripartite::*;
    match (a, b) {
        (False, _) | (_, False) => False,
        (True, True) => True,
        _ => Unknown,
    }
}

pub fn or(a: Tripartite, b: Tripartite) -> Tripartite {
    use Tripartite::*;
    match (a, b) {
        (True, _) | (_, True) => True,
        (False, False) => False,
        _ => Unknown,
    }
}

pub fn not(a: Tripartite) -> Tripartite {
    use Tripartite::*;
    match a {
        True => False,
        False => True,
        Unknown => Unknown,
    }
}

/// Material implication: `!a || b`.
pub fn implies(a: Tripartite, b: Tripartite) -> Tripartite {
    or(not(a), b)
}

/// Biconditional, never UNKNOWN: TRUE iff both directions of implication
/// are TRUE, FALSE otherwise. An UNKNOWN operand therefore degrades the
/// result to FALSE rather than propagating.
pub fn equivalent(a: Tripartite, b: Tripartite) -> Tripartite {
    use Tripartite::*;
    if implies(a, b) == True && implies(b, a) == True {
        True
    } else {
        False
    }
}

/// Apply a binary connective; `None` for non-binary operators.
pub fn apply_binary(op: LogicalOperator, a: Tripartite, b: Tripartite) -> Option<Tripartite> {
    match op {
        LogicalOperator::And => Some(and(a, b)),
        LogicalOperator::Or => Some(or(a, b)),
        LogicalOperator::Implies => Some(implies(a, b)),
        LogicalOperator::Equivalent => Some(equivalent(a, b)),
        _ => None,
    }
}
