//! Backward provenance walking: explain how a truth value was derived.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::kb::KnowledgeBase;
use crate::logic::Tripartite;

/// One step of a derivation chain, target first, premises below it at
/// increasing depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceStep {
    pub name: String,
    pub value: Tripartite,
    /// Rule that derived the value, or "Axiom" for direct assertions.
    pub rule: String,
    pub premises: Vec<String>,
    pub depth: usize,
}

impl InferenceStep {
    pub fn is_axiom(&self) -> bool {
        self.rule == "Axiom"
    }
}

/// Walk backward from `name` through provenance premises, depth-first,
/// emitting a step per visited proposition.
///
/// A visited set guards against cyclic provenance: nothing upstream
/// prevents a pathological rule sequence from citing a proposition as its
/// own (transitive) premise, and the walk must terminate anyway. Names
/// absent from the knowledge base are reported as UNKNOWN axioms.
pub fn trace_inference(kb: &KnowledgeBase, name: &str) -> Vec<InferenceStep> {
    let mut steps = Vec::new();
    let mut visited = HashSet::new();
    walk(kb, name, 0, &mut visited, &mut steps);
    steps
}

fn walk(
    kb: &KnowledgeBase,
    name: &str,
    depth: usize,
    visited: &mut HashSet<String>,
    steps: &mut Vec<InferenceStep>,
) {
    if !visited.insert(name.to_string()) {
        return;
    }

    let (value, rule, premises) = match kb.get(name) {
        Some(prop) => match prop.provenance() {
            Some(prov) => (
                prop.truth_value(),
                prov.rule_fired.clone(),
                prov.premises.clone(),
            ),
            None => (prop.truth_value(), "Axiom".to_string(), Vec::new()),
        },
        None => (Tripartite::Unknown, "Axiom".to_string(), Vec::new()),
    };

    steps.push(InferenceStep {
        name: name.to_string(),
        value,
        rule,
        premises: premises.clone(),
        depth,
    });

    for premise in &premises {
        walk(kb, premise, depth + 1, visited, steps);
    }
}

/// Render a trace as a depth-indented listing, axiom leaves marked
/// `[Axiom/Direct Assertion]`.
pub fn format_trace(steps: &[InferenceStep]) -> String {
    let mut out = String::new();
    for step in steps {
        let indent = "  ".repeat(step.depth);
        if step.is_axiom() {
            out.push_str(&format!(
                "{indent}{} = {} [Axiom/Direct Assertion]\n",
                step.name, step.value
            ));
        } else {
            out.push_str(&format!(
                "{indent}{} = {} [{}]\n",
                step.name, step.value, step.rule
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposition::{InferenceProvenance, Proposition};

    #[test]
    fn axiom_traces_as_a_single_step() {
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("p", Tripartite::True);

        let steps = trace_inference(&kb, "p");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "p");
        assert_eq!(steps[0].rule, "Axiom");
        assert!(steps[0].premises.is_empty());
        assert_eq!(steps[0].depth, 0);
    }

    #[test]
    fn missing_name_traces_as_unknown_axiom() {
        let kb = KnowledgeBase::new();
        let steps = trace_inference(&kb, "ghost");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].value, Tripartite::Unknown);
        assert!(steps[0].is_axiom());
    }

    #[test]
    fn derived_chain_has_monotonically_deepening_premises() {
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("p", Tripartite::True);
        kb.set_truth_value_traced(
            "q",
            Tripartite::True,
            InferenceProvenance::new("ModusPonens", vec!["p".into(), "r1".into()]),
        );
        kb.insert("r1", Proposition::with_truth("r1", Tripartite::Unknown));

        let steps = trace_inference(&kb, "q");
        assert_eq!(steps[0].name, "q");
        assert_eq!(steps[0].rule, "ModusPonens");
        assert_eq!(steps[0].depth, 0);
        // Premises follow the target at depth 1.
        assert_eq!(steps.len(), 3);
        assert!(steps[1..].iter().all(|s| s.depth == 1));
    }

    #[test]
    fn cyclic_provenance_terminates() {
        // a cites b and b cites a; the walk must still finish.
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value_traced(
            "a",
            Tripartite::True,
            InferenceProvenance::new("ModusPonens", vec!["b".into()]),
        );
        kb.set_truth_value_traced(
            "b",
            Tripartite::True,
            InferenceProvenance::new("ModusPonens", vec!["a".into()]),
        );

        let steps = trace_inference(&kb, "a");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].name, "a");
        assert_eq!(steps[1].name, "b");
    }

    #[test]
    fn formatting_marks_axiom_leaves() {
        let mut kb = KnowledgeBase::new();
        kb.set_truth_value("p", Tripartite::True);
        kb.set_truth_value_traced(
            "q",
            Tripartite::True,
            InferenceProvenance::new("ModusPonens", vec!["p".into()]),
        );

        let rendered = format_trace(&trace_inference(&kb, "q"));
        assert!(rendered.starts_with("q = True [ModusPonens]\n"));
        assert!(rendered.contains("  p = True [Axiom/Direct Assertion]\n"));
    }
}
