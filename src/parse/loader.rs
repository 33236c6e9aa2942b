//! Loading assumptions and facts files into a knowledge base.
//!
//! Assumptions files hold one relation per line, shaped
//! `prefix, relation(arg1, ..., argN)`. Relations dispatch through a
//! registry of named handlers so callers can add their own relation types
//! without touching the loader. Built-ins:
//!
//! - `implies/4` — `prefix, implies(antecedent, subject, consequent,
//!   predicate)`; stored under the consequent with universal-affirmative
//!   scope.
//! - `some/2` — `prefix, some(subject, predicate)`; subject asserted TRUE
//!   with particular-affirmative scope.
//! - `not/1` — `prefix, not(subject)`; subject asserted FALSE with
//!   universal-negative scope.
//! - `discovered/2` — `prefix, discovered(subject, predicate)`; subject
//!   registered at UNKNOWN.
//!
//! Facts files hold assertions (`p` for TRUE, `!q` for FALSE), compound
//! expressions, and assignments (`t = p && q`). Malformed lines in either
//! file are reported and skipped; loading always continues.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;

use crate::error::ParseError;
use crate::expression::Expression;
use crate::kb::KnowledgeBase;
use crate::logic::{LogicalOperator, Quantifier, Tripartite};
use crate::parse::lexer::{self, LexToken, TokenKind};
use crate::proposition::Proposition;

/// Processes one parsed assumption line: the prefix, the relation's
/// arguments, and the knowledge base to update. Returns false to reject
/// the line (wrong arity, bad arguments), which the loader reports and
/// skips.
pub type RelationHandler = Box<dyn Fn(&str, &[String], &mut KnowledgeBase) -> bool + Send + Sync>;

/// Parses assumptions and facts files through a registry of relation
/// handlers.
pub struct Loader {
    handlers: HashMap<String, RelationHandler>,
    line_pattern: Regex,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    /// A loader with the built-in relation handlers registered.
    pub fn new() -> Self {
        let mut loader = Self {
            handlers: HashMap::new(),
            // prefix, relation(args) with optional surrounding whitespace.
            line_pattern: Regex::new(r"^\s*([\w-]+)\s*,\s*(\w+)\s*\(\s*([^)]*?)\s*\)\s*$")
                .expect("relation line pattern is a valid regex"),
        };
        loader.register_relation("implies", Box::new(handle_implies));
        loader.register_relation("some", Box::new(handle_some));
        loader.register_relation("not", Box::new(handle_not));
        loader.register_relation("discovered", Box::new(handle_discovered));
        loader
    }

    pub fn register_relation(&mut self, name: impl Into<String>, handler: RelationHandler) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn unregister_relation(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    pub fn has_relation(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn registered_relations(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Load an assumptions file. Returns the number of skipped lines;
    /// only an unreadable file is fatal.
    pub fn load_assumptions(
        &self,
        path: impl AsRef<Path>,
        kb: &mut KnowledgeBase,
    ) -> Result<usize, ParseError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(self.load_assumptions_str(&text, kb))
    }

    /// Load assumptions from in-memory text. Returns the skipped-line count.
    pub fn load_assumptions_str(&self, text: &str, kb: &mut KnowledgeBase) -> usize {
        let mut skipped = 0usize;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some(captures) = self.line_pattern.captures(line) else {
                tracing::warn!(line = line_no, content = %line, "skipping malformed assumption line");
                skipped += 1;
                continue;
            };

            let prefix = &captures[1];
            let relation = &captures[2];
            let args: Vec<String> = captures[3]
                .split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();

            let Some(handler) = self.handlers.get(relation) else {
                tracing::warn!(line = line_no, relation, "skipping unknown relation");
                skipped += 1;
                continue;
            };

            if !handler(prefix, &args, kb) {
                tracing::warn!(line = line_no, relation, arity = args.len(), "relation handler rejected line");
                skipped += 1;
            }
        }

        skipped
    }

    /// Load a facts file. Returns the number of skipped lines; only an
    /// unreadable file is fatal.
    pub fn load_facts(
        &self,
        path: impl AsRef<Path>,
        kb: &mut KnowledgeBase,
    ) -> Result<usize, ParseError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(self.load_facts_str(&text, kb))
    }

    /// Load facts from in-memory text. Returns the skipped-line count.
    pub fn load_facts_str(&self, text: &str, kb: &mut KnowledgeBase) -> usize {
        let mut skipped = 0usize;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let tokens = match lexer::tokenize(line) {
                Ok(tokens) => tokens,
                Err(err) => {
                    tracing::warn!(line = line_no, %err, "skipping facts line");
                    skipped += 1;
                    continue;
                }
            };
            if tokens.is_empty() {
                continue;
            }

            if !self.apply_facts_tokens(&tokens, kb) {
                tracing::warn!(line = line_no, content = %line, "skipping facts line");
                skipped += 1;
            }
        }

        skipped
    }

    /// Interpret one tokenized facts line. Returns false if the line could
    /// not be applied.
    fn apply_facts_tokens(&self, tokens: &[LexToken], kb: &mut KnowledgeBase) -> bool {
        let assign_index = tokens.iter().position(|t| t.kind == TokenKind::Assign);

        if let Some(index) = assign_index.filter(|&i| i > 0) {
            // Assignment: target = expression. The expression is evaluated
            // once at load time and kept for re-evaluation each deduction
            // pass.
            let target = tokens[0].text.clone();
            let rhs = &tokens[index + 1..];
            if rhs.is_empty() {
                return false;
            }

            let mut expr = build_expression(rhs, &target);
            match expr.evaluate(kb) {
                Ok(value) => {
                    kb.set_truth_value(&target, value);
                    expr.invalidate();
                    kb.add_expression(expr);
                    true
                }
                Err(err) => {
                    tracing::warn!(target = %target, %err, "assignment expression rejected");
                    false
                }
            }
        } else {
            // Assertions: each identifier is set TRUE, or FALSE when
            // directly preceded by a NOT. Compound lines additionally keep
            // a prefix-less expression.
            let mut has_operators = false;
            for (i, token) in tokens.iter().enumerate() {
                match token.kind {
                    TokenKind::And | TokenKind::Or | TokenKind::Implies => has_operators = true,
                    TokenKind::Identifier => {
                        let negated = i > 0 && tokens[i - 1].kind == TokenKind::Not;
                        let value = if negated { Tripartite::False } else { Tripartite::True };
                        kb.set_truth_value(&token.text, value);
                    }
                    _ => {}
                }
            }

            if has_operators {
                kb.add_expression(build_expression(tokens, ""));
            }
            true
        }
    }
}

/// Translate lexer tokens into an expression token stream. Comma and
/// assignment tokens have no expression meaning and are dropped.
fn build_expression(tokens: &[LexToken], prefix: &str) -> Expression {
    let mut expr = Expression::with_prefix(prefix);
    for token in tokens {
        match token.kind {
            TokenKind::Identifier => expr.push_operand(token.text.clone()),
            TokenKind::And => expr.push_operator(LogicalOperator::And),
            TokenKind::Or => expr.push_operator(LogicalOperator::Or),
            TokenKind::Not => expr.push_operator(LogicalOperator::Not),
            TokenKind::Implies => expr.push_operator(LogicalOperator::Implies),
            TokenKind::Equivalent => expr.push_operator(LogicalOperator::Equivalent),
            TokenKind::LParen => expr.open_paren(),
            TokenKind::RParen => expr.close_paren(),
            TokenKind::Comma | TokenKind::Assign => {}
        }
    }
    expr
}

// ---------------------------------------------------------------------------
// Built-in relation handlers
// ---------------------------------------------------------------------------

/// `prefix, implies(antecedent, subject, consequent, predicate)`, keyed by
/// the consequent.
fn handle_implies(prefix: &str, args: &[String], kb: &mut KnowledgeBase) -> bool {
    if args.len() != 4 {
        return false;
    }
    let mut prop = Proposition::implication(prefix, &args[0], &args[2]);
    prop.subject = args[1].clone();
    prop.predicate = args[3].clone();
    kb.insert(args[2].clone(), prop);
    true
}

/// `prefix, some(subject, predicate)`: the subject holds TRUE under
/// particular-affirmative scope.
fn handle_some(prefix: &str, args: &[String], kb: &mut KnowledgeBase) -> bool {
    if args.len() != 2 {
        return false;
    }
    note_subject_collision(kb, &args[0], "some");
    let mut prop = Proposition::with_truth(prefix, Tripartite::True);
    prop.subject = args[0].clone();
    prop.predicate = args[1].clone();
    prop.scope = Quantifier::ParticularAffirmative;
    kb.insert(args[0].clone(), prop);
    true
}

/// `prefix, not(subject)`: the subject holds FALSE under universal-negative
/// scope.
fn handle_not(prefix: &str, args: &[String], kb: &mut KnowledgeBase) -> bool {
    if args.len() != 1 {
        return false;
    }
    let mut prop = Proposition::with_truth(prefix, Tripartite::False);
    prop.relation = LogicalOperator::Not;
    prop.subject = args[0].clone();
    prop.scope = Quantifier::UniversalNegative;
    kb.insert(args[0].clone(), prop);
    true
}

/// `prefix, discovered(subject, predicate)`: the subject is registered at
/// UNKNOWN for later deduction.
fn handle_discovered(prefix: &str, args: &[String], kb: &mut KnowledgeBase) -> bool {
    if args.len() != 2 {
        return false;
    }
    note_subject_collision(kb, &args[0], "discovered");
    let mut prop = Proposition::with_truth(prefix, Tripartite::Unknown);
    prop.subject = args[0].clone();
    prop.predicate = args[1].clone();
    kb.insert(args[0].clone(), prop);
    true
}

/// `some` and `discovered` key propositions by subject, so two lines
/// sharing a subject overwrite one another. Kept as-is; the event is
/// logged so the collision is at least observable.
fn note_subject_collision(kb: &KnowledgeBase, subject: &str, relation: &str) {
    if kb.contains(subject) {
        tracing::debug!(subject, relation, "subject already present, overwriting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implies_is_keyed_by_consequent() {
        let mut kb = KnowledgeBase::new();
        let loader = Loader::new();
        let skipped = loader.load_assumptions_str(
            "n, implies(big-bang, occurred, microwave-radiation, present)\n",
            &mut kb,
        );
        assert_eq!(skipped, 0);

        let prop = kb.get("microwave-radiation").unwrap();
        assert_eq!(prop.prefix, "n");
        assert_eq!(prop.relation, LogicalOperator::Implies);
        assert_eq!(prop.antecedent, "big-bang");
        assert_eq!(prop.subject, "occurred");
        assert_eq!(prop.consequent, "microwave-radiation");
        assert_eq!(prop.predicate, "present");
        assert_eq!(prop.scope, Quantifier::UniversalAffirmative);
        assert_eq!(prop.truth_value(), Tripartite::Unknown);
    }

    #[test]
    fn some_asserts_subject_true() {
        let mut kb = KnowledgeBase::new();
        Loader::new().load_assumptions_str("s, some(galaxies, receding)\n", &mut kb);

        let prop = kb.get("galaxies").unwrap();
        assert_eq!(prop.truth_value(), Tripartite::True);
        assert_eq!(prop.scope, Quantifier::ParticularAffirmative);
        assert_eq!(prop.relation, LogicalOperator::None);
    }

    #[test]
    fn not_asserts_subject_false() {
        let mut kb = KnowledgeBase::new();
        Loader::new().load_assumptions_str("n, not(steady-state)\n", &mut kb);

        let prop = kb.get("steady-state").unwrap();
        assert_eq!(prop.truth_value(), Tripartite::False);
        assert_eq!(prop.scope, Quantifier::UniversalNegative);
    }

    #[test]
    fn discovered_registers_subject_unknown() {
        let mut kb = KnowledgeBase::new();
        Loader::new().load_assumptions_str("d, discovered(quasars, distant)\n", &mut kb);

        let prop = kb.get("quasars").unwrap();
        assert_eq!(prop.truth_value(), Tripartite::Unknown);
        assert_eq!(prop.scope, Quantifier::None);
    }

    #[test]
    fn shared_subject_lines_overwrite() {
        let mut kb = KnowledgeBase::new();
        Loader::new().load_assumptions_str(
            "a, some(galaxies, receding)\nb, discovered(galaxies, spiral)\n",
            &mut kb,
        );
        // The later line wins.
        let prop = kb.get("galaxies").unwrap();
        assert_eq!(prop.prefix, "b");
        assert_eq!(prop.truth_value(), Tripartite::Unknown);
    }

    #[test]
    fn malformed_and_unknown_lines_are_counted() {
        let mut kb = KnowledgeBase::new();
        let skipped = Loader::new().load_assumptions_str(
            "no parentheses here\n\
             x, mystery(a, b)\n\
             y, implies(just, two)\n\
             s, some(galaxies, receding)\n",
            &mut kb,
        );
        assert_eq!(skipped, 3);
        assert_eq!(kb.len(), 1);
    }

    #[test]
    fn comments_and_blank_lines_are_free() {
        let mut kb = KnowledgeBase::new();
        let skipped = Loader::new().load_assumptions_str(
            "# cosmology assumptions\n\n   \ns, some(galaxies, receding)\n",
            &mut kb,
        );
        assert_eq!(skipped, 0);
        assert_eq!(kb.len(), 1);
    }

    #[test]
    fn custom_relation_handlers_dispatch() {
        let mut loader = Loader::new();
        loader.register_relation(
            "axiom",
            Box::new(|prefix, args, kb: &mut KnowledgeBase| {
                if args.len() != 1 {
                    return false;
                }
                let mut prop = Proposition::with_truth(prefix, Tripartite::True);
                prop.subject = args[0].clone();
                kb.insert(args[0].clone(), prop);
                true
            }),
        );
        assert!(loader.has_relation("axiom"));

        let mut kb = KnowledgeBase::new();
        let skipped = loader.load_assumptions_str("ax, axiom(foundation)\n", &mut kb);
        assert_eq!(skipped, 0);
        assert_eq!(kb.truth_value("foundation"), Tripartite::True);

        assert!(loader.unregister_relation("axiom"));
        assert!(!loader.has_relation("axiom"));
    }

    #[test]
    fn facts_simple_assertions() {
        let mut kb = KnowledgeBase::new();
        Loader::new().load_facts_str("p\n!q\n~r\n", &mut kb);
        assert_eq!(kb.truth_value("p"), Tripartite::True);
        assert_eq!(kb.truth_value("q"), Tripartite::False);
        assert_eq!(kb.truth_value("r"), Tripartite::False);
    }

    #[test]
    fn facts_assignment_evaluates_and_stores_expression() {
        let mut kb = KnowledgeBase::new();
        Loader::new().load_facts_str("a\nb\nt = a && b\n", &mut kb);

        assert_eq!(kb.truth_value("t"), Tripartite::True);
        assert_eq!(kb.expressions().len(), 1);
        assert_eq!(kb.expressions()[0].prefix(), "t");
        assert!(
            !kb.expressions()[0].is_evaluated(),
            "stored expression must be fresh for the deduction loop"
        );
    }

    #[test]
    fn facts_compound_line_asserts_and_keeps_expression() {
        let mut kb = KnowledgeBase::new();
        Loader::new().load_facts_str("p && !q\n", &mut kb);
        assert_eq!(kb.truth_value("p"), Tripartite::True);
        assert_eq!(kb.truth_value("q"), Tripartite::False);
        assert_eq!(kb.expressions().len(), 1);
        assert_eq!(kb.expressions()[0].prefix(), "");
    }

    #[test]
    fn facts_bad_line_is_skipped_and_counted() {
        let mut kb = KnowledgeBase::new();
        let skipped = Loader::new().load_facts_str("p\n$$$\nq\n", &mut kb);
        assert_eq!(skipped, 1);
        assert_eq!(kb.truth_value("p"), Tripartite::True);
        assert_eq!(kb.truth_value("q"), Tripartite::True);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut kb = KnowledgeBase::new();
        let err = Loader::new()
            .load_assumptions("/nonexistent/assumptions.txt", &mut kb)
            .unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
