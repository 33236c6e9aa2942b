//! The five inference rules.
//!
//! Each rule is a pure function of a rule-input snapshot and the knowledge
//! base, returning whether it changed anything. A rule never fires when its
//! target already holds the to-be-derived value, so re-application is
//! always safe. Every firing goes through the provenance-tracked setter;
//! targets absent from the knowledge base are materialized at UNKNOWN
//! first, so rules never fail on a dangling name.

use crate::kb::KnowledgeBase;
use crate::logic::Tripartite;
use crate::proposition::InferenceProvenance;

/// Snapshot of an IMPLIES proposition taken at the start of a phase.
///
/// Phases collect these before firing rules so lookups and mutations of the
/// knowledge base do not alias the proposition being matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Implication {
    pub prefix: String,
    pub antecedent: String,
    pub consequent: String,
}

/// Snapshot of an OR proposition: the antecedent/consequent slots hold the
/// left and right disjunct names.
#[derive(Debug, Clone, PartialEq)]
pub struct Disjunction {
    pub prefix: String,
    pub left: String,
    pub right: String,
}

/// A leading `~` or `!` marks a literal as the negation of its base name.
pub fn is_negated(name: &str) -> bool {
    name.starts_with('~') || name.starts_with('!')
}

/// The literal's name with any negation marker stripped.
pub fn base_name(name: &str) -> &str {
    if is_negated(name) { &name[1..] } else { name }
}

/// Modus Ponens: P → Q with P TRUE derives Q TRUE.
pub fn apply_modus_ponens(imp: &Implication, kb: &mut KnowledgeBase) -> bool {
    let antecedent = kb.truth_value(&imp.antecedent);
    let consequent = kb.truth_value(&imp.consequent);

    if antecedent == Tripartite::True && consequent != Tripartite::True {
        tracing::debug!(rule = "ModusPonens", derived = %imp.consequent, via = %imp.prefix, "rule fired");
        kb.set_truth_value_traced(
            &imp.consequent,
            Tripartite::True,
            InferenceProvenance::new(
                "ModusPonens",
                vec![imp.antecedent.clone(), imp.prefix.clone()],
            ),
        );
        return true;
    }
    false
}

/// Modus Tollens: P → Q with Q FALSE derives P FALSE.
pub fn apply_modus_tollens(imp: &Implication, kb: &mut KnowledgeBase) -> bool {
    let antecedent = kb.truth_value(&imp.antecedent);
    let consequent = kb.truth_value(&imp.consequent);

    if consequent == Tripartite::False && antecedent != Tripartite::False {
        tracing::debug!(rule = "ModusTollens", derived = %imp.antecedent, via = %imp.prefix, "rule fired");
        kb.set_truth_value_traced(
            &imp.antecedent,
            Tripartite::False,
            InferenceProvenance::new(
                "ModusTollens",
                vec![imp.consequent.clone(), imp.prefix.clone()],
            ),
        );
        return true;
    }
    false
}

/// Hypothetical Syllogism: P → Q and Q → R chain when the first consequent
/// is the second antecedent. Forward, P TRUE derives R TRUE; backward,
/// R FALSE derives P FALSE.
pub fn apply_hypothetical_syllogism(
    first: &Implication,
    second: &Implication,
    kb: &mut KnowledgeBase,
) -> bool {
    if first.consequent != second.antecedent {
        return false;
    }

    let p = &first.antecedent;
    let r = &second.consequent;
    let p_truth = kb.truth_value(p);
    let r_truth = kb.truth_value(r);

    let mut changed = false;

    if p_truth == Tripartite::True && r_truth != Tripartite::True {
        tracing::debug!(rule = "HypotheticalSyllogism", derived = %r, "rule fired");
        kb.set_truth_value_traced(
            r,
            Tripartite::True,
            InferenceProvenance::new(
                "HypotheticalSyllogism",
                vec![p.clone(), first.prefix.clone(), second.prefix.clone()],
            ),
        );
        changed = true;
    }

    if r_truth == Tripartite::False && p_truth != Tripartite::False {
        tracing::debug!(rule = "HypotheticalSyllogism", derived = %p, "rule fired");
        kb.set_truth_value_traced(
            p,
            Tripartite::False,
            InferenceProvenance::new(
                "HypotheticalSyllogism",
                vec![r.clone(), second.prefix.clone(), first.prefix.clone()],
            ),
        );
        changed = true;
    }

    changed
}

/// Disjunctive Syllogism: P ∨ Q with one disjunct FALSE derives the other
/// TRUE.
pub fn apply_disjunctive_syllogism(disj: &Disjunction, kb: &mut KnowledgeBase) -> bool {
    let left = kb.truth_value(&disj.left);
    let right = kb.truth_value(&disj.right);

    let mut changed = false;

    if left == Tripartite::False && right != Tripartite::True {
        tracing::debug!(rule = "DisjunctiveSyllogism", derived = %disj.right, via = %disj.prefix, "rule fired");
        kb.set_truth_value_traced(
            &disj.right,
            Tripartite::True,
            InferenceProvenance::new(
                "DisjunctiveSyllogism",
                vec![disj.left.clone(), disj.prefix.clone()],
            ),
        );
        changed = true;
    }

    if right == Tripartite::False && left != Tripartite::True {
        tracing::debug!(rule = "DisjunctiveSyllogism", derived = %disj.left, via = %disj.prefix, "rule fired");
        kb.set_truth_value_traced(
            &disj.left,
            Tripartite::True,
            InferenceProvenance::new(
                "DisjunctiveSyllogism",
                vec![disj.right.clone(), disj.prefix.clone()],
            ),
        );
        changed = true;
    }

    changed
}

/// Resolution: from P ∨ Q and ¬P ∨ R, the resolvent Q ∨ R holds; when one
/// surviving literal is FALSE the other is derived TRUE. All four literal
/// pairings across the two disjunctions are checked for complementarity.
pub fn apply_resolution(d1: &Disjunction, d2: &Disjunction, kb: &mut KnowledgeBase) -> bool {
    let mut changed = false;

    let pairings = [
        (&d1.left, &d1.right, &d2.left, &d2.right),
        (&d1.left, &d1.right, &d2.right, &d2.left),
        (&d1.right, &d1.left, &d2.left, &d2.right),
        (&d1.right, &d1.left, &d2.right, &d2.left),
    ];

    for (lit1, other1, lit2, other2) in pairings {
        if try_resolve(d1, d2, lit1, other1, lit2, other2, kb) {
            changed = true;
        }
    }

    changed
}

/// One pairing of the resolution scan: `lit1`/`lit2` are the candidate
/// complementary literals, `other1`/`other2` their surviving partners.
fn try_resolve(
    d1: &Disjunction,
    d2: &Disjunction,
    lit1: &str,
    other1: &str,
    lit2: &str,
    other2: &str,
    kb: &mut KnowledgeBase,
) -> bool {
    // Complementary: same base name, opposite polarity.
    if base_name(lit1) != base_name(lit2) || is_negated(lit1) == is_negated(lit2) {
        return false;
    }

    let other1_truth = kb.truth_value(other1);
    let other2_truth = kb.truth_value(other2);

    if other1_truth == Tripartite::False && other2_truth != Tripartite::True {
        tracing::debug!(rule = "Resolution", derived = %other2, "rule fired");
        kb.set_truth_value_traced(
            other2,
            Tripartite::True,
            InferenceProvenance::new(
                "Resolution",
                vec![d1.prefix.clone(), d2.prefix.clone(), other1.to_string()],
            ),
        );
        return true;
    }

    if other2_truth == Tripartite::False && other1_truth != Tripartite::True {
        tracing::debug!(rule = "Resolution", derived = %other1, "rule fired");
        kb.set_truth_value_traced(
            other1,
            Tripartite::True,
            InferenceProvenance::new(
                "Resolution",
                vec![d1.prefix.clone(), d2.prefix.clone(), other2.to_string()],
            ),
        );
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn implication(prefix: &str, antecedent: &str, consequent: &str) -> Implication {
        Implication {
            prefix: prefix.into(),
            antecedent: antecedent.into(),
            consequent: consequent.into(),
        }
    }

    fn disjunction(prefix: &str, left: &str, right: &str) -> Disjunction {
        Disjunction {
            prefix: prefix.into(),
            left: left.into(),
            right: right.into(),
        }
    }

    #[test]
    fn negation_markers() {
        assert!(is_negated("~p"));
        assert!(is_negated("!p"));
        assert!(!is_negated("p"));
        assert_eq!(base_name("~p"), "p");
        assert_eq!(base_name("!p"), "p");
        assert_eq!(base_name("p"), "p");
    }

    #[test]
    fn modus_ponens_derives_consequent() {
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("p", Tripartite::True);

        let imp = implication("r1", "p", "q");
        assert!(apply_modus_ponens(&imp, &mut kb));
        assert_eq!(kb.truth_value("q"), Tripartite::True);

        let prov = kb.get("q").unwrap().provenance().unwrap();
        assert_eq!(prov.rule_fired, "ModusPonens");
        assert_eq!(prov.premises, ["p", "r1"]);

        // Idempotent: the consequent is already TRUE.
        assert!(!apply_modus_ponens(&imp, &mut kb));
    }

    #[test]
    fn modus_ponens_requires_true_antecedent() {
        let mut kb = KnowledgeBase::new();
        let imp = implication("r1", "p", "q");
        assert!(!apply_modus_ponens(&imp, &mut kb), "UNKNOWN antecedent must not fire");
        kb.set_truth_value("p", Tripartite::False);
        assert!(!apply_modus_ponens(&imp, &mut kb), "FALSE antecedent must not fire");
        assert_eq!(kb.truth_value("q"), Tripartite::Unknown);
    }

    #[test]
    fn modus_tollens_refutes_antecedent() {
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("q", Tripartite::False);

        let imp = implication("r1", "p", "q");
        assert!(apply_modus_tollens(&imp, &mut kb));
        assert_eq!(kb.truth_value("p"), Tripartite::False);

        let prov = kb.get("p").unwrap().provenance().unwrap();
        assert_eq!(prov.rule_fired, "ModusTollens");
        assert_eq!(prov.premises, ["q", "r1"]);

        assert!(!apply_modus_tollens(&imp, &mut kb));
    }

    #[test]
    fn hypothetical_syllogism_requires_shared_middle() {
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("p", Tripartite::True);
        let first = implication("r1", "p", "q");
        let unrelated = implication("r2", "x", "y");
        assert!(!apply_hypothetical_syllogism(&first, &unrelated, &mut kb));
    }

    #[test]
    fn hypothetical_syllogism_forward() {
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("p", Tripartite::True);

        let first = implication("r1", "p", "q");
        let second = implication("r2", "q", "r");
        assert!(apply_hypothetical_syllogism(&first, &second, &mut kb));
        assert_eq!(kb.truth_value("r"), Tripartite::True);

        let prov = kb.get("r").unwrap().provenance().unwrap();
        assert_eq!(prov.rule_fired, "HypotheticalSyllogism");
        assert_eq!(prov.premises, ["p", "r1", "r2"]);
    }

    #[test]
    fn hypothetical_syllogism_backward() {
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("r", Tripartite::False);

        let first = implication("r1", "p", "q");
        let second = implication("r2", "q", "r");
        assert!(apply_hypothetical_syllogism(&first, &second, &mut kb));
        assert_eq!(kb.truth_value("p"), Tripartite::False);

        let prov = kb.get("p").unwrap().provenance().unwrap();
        assert_eq!(prov.premises, ["r", "r2", "r1"]);
    }

    #[test]
    fn disjunctive_syllogism_both_directions() {
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("p", Tripartite::False);

        let disj = disjunction("d1", "p", "q");
        assert!(apply_disjunctive_syllogism(&disj, &mut kb));
        assert_eq!(kb.truth_value("q"), Tripartite::True);
        let prov = kb.get("q").unwrap().provenance().unwrap();
        assert_eq!(prov.rule_fired, "DisjunctiveSyllogism");
        assert_eq!(prov.premises, ["p", "d1"]);

        let mut kb2 = KnowledgeBase::new();
        kb2.set_truth_value("q", Tripartite::False);
        assert!(apply_disjunctive_syllogism(&disj, &mut kb2));
        assert_eq!(kb2.truth_value("p"), Tripartite::True);
    }

    #[test]
    fn disjunctive_syllogism_needs_a_false_disjunct() {
        let mut kb = KnowledgeBase::new();
        let disj = disjunction("d1", "p", "q");
        assert!(!apply_disjunctive_syllogism(&disj, &mut kb));
        assert_eq!(kb.truth_value("p"), Tripartite::Unknown);
        assert_eq!(kb.truth_value("q"), Tripartite::Unknown);
    }

    #[test]
    fn resolution_derives_surviving_literal() {
        // p ∨ q and ~p ∨ r with q FALSE: resolvent q ∨ r forces r TRUE.
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("q", Tripartite::False);

        let d1 = disjunction("d1", "p", "q");
        let d2 = disjunction("d2", "~p", "r");
        assert!(apply_resolution(&d1, &d2, &mut kb));
        assert_eq!(kb.truth_value("r"), Tripartite::True);

        let prov = kb.get("r").unwrap().provenance().unwrap();
        assert_eq!(prov.rule_fired, "Resolution");
        assert_eq!(prov.premises, ["d1", "d2", "q"]);
    }

    #[test]
    fn resolution_matches_bang_and_tilde_markers() {
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("q", Tripartite::False);

        let d1 = disjunction("d1", "p", "q");
        let d2 = disjunction("d2", "!p", "r");
        assert!(apply_resolution(&d1, &d2, &mut kb));
        assert_eq!(kb.truth_value("r"), Tripartite::True);
    }

    #[test]
    fn resolution_ignores_same_polarity_literals() {
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("q", Tripartite::False);

        let d1 = disjunction("d1", "p", "q");
        let d2 = disjunction("d2", "p", "r");
        assert!(!apply_resolution(&d1, &d2, &mut kb));
        assert_eq!(kb.truth_value("r"), Tripartite::Unknown);
    }

    #[test]
    fn resolution_checks_reversed_disjunct_order() {
        // The complementary pair sits in the right slot of d1 and the
        // right slot of d2.
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("q", Tripartite::False);

        let d1 = disjunction("d1", "q", "p");
        let d2 = disjunction("d2", "r", "~p");
        assert!(apply_resolution(&d1, &d2, &mut kb));
        assert_eq!(kb.truth_value("r"), Tripartite::True);
    }
}
