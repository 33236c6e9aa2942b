//! The knowledge base: named propositions plus the expressions deduced over
//! them.
//!
//! Propositions live in a `BTreeMap` so reports and traces iterate in a
//! stable order. Lookups by name never fail: reading an absent name yields
//! UNKNOWN, and writes materialize the proposition on first touch.

use std::collections::BTreeMap;

use crate::expression::Expression;
use crate::logic::Tripartite;
use crate::proposition::{InferenceProvenance, Proposition};

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    propositions: BTreeMap<String, Proposition>,
    expressions: Vec<Expression>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Proposition> {
        self.propositions.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Proposition> {
        self.propositions.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.propositions.contains_key(name)
    }

    /// Insert a proposition under `key`, replacing any existing entry.
    pub fn insert(&mut self, key: impl Into<String>, prop: Proposition) {
        self.propositions.insert(key.into(), prop);
    }

    /// Look up `name`, creating it at UNKNOWN on first reference.
    ///
    /// The materialized proposition has its prefix set to the name so that
    /// provenance citations and traces resolve.
    pub fn materialize(&mut self, name: &str) -> &mut Proposition {
        self.propositions
            .entry(name.to_string())
            .or_insert_with(|| Proposition::with_truth(name, Tripartite::Unknown))
    }

    /// The truth value of `name`; an absent name reads as UNKNOWN.
    pub fn truth_value(&self, name: &str) -> Tripartite {
        self.propositions
            .get(name)
            .map(|p| p.truth_value())
            .unwrap_or(Tripartite::Unknown)
    }

    /// Assert a truth value without provenance, materializing on demand.
    pub fn set_truth_value(&mut self, name: &str, value: Tripartite) {
        self.materialize(name).set_truth_value(value);
    }

    /// Set a truth value with provenance, materializing on demand.
    pub fn set_truth_value_traced(
        &mut self,
        name: &str,
        value: Tripartite,
        provenance: InferenceProvenance,
    ) {
        self.materialize(name).set_truth_value_traced(value, provenance);
    }

    pub fn len(&self) -> usize {
        self.propositions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty()
    }

    /// Iterate propositions in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Proposition)> {
        self.propositions.iter()
    }

    pub fn add_expression(&mut self, expr: Expression) {
        self.expressions.push(expr);
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn expressions_mut(&mut self) -> &mut Vec<Expression> {
        &mut self.expressions
    }
}
