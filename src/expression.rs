//! Logical expressions: token streams evaluated by operator-precedence scan.
//!
//! An [`Expression`] holds a flat infix token stream — operand references,
//! connectives, and parentheses — and evaluates it to a single
//! [`Tripartite`] with a shunting-yard style scan extended for the
//! right-associative unary NOT and nested grouping. Evaluation snapshots
//! each operand's truth value from the knowledge base at evaluation time
//! and caches the result; the deduction loop re-evaluates each pass by
//! invalidating the cache, never by mutating the token stream.

use serde::{Deserialize, Serialize};

use crate::error::ExprError;
use crate::kb::KnowledgeBase;
use crate::logic::{self, LogicalOperator, Tripartite};

/// An operand in an expression: a named knowledge-base reference or an
/// inline literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// Resolved against the knowledge base at evaluation time; a name
    /// absent from the knowledge base reads as UNKNOWN.
    Ref(String),
    /// A fixed truth value.
    Literal(Tripartite),
}

/// One token of an infix expression stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprToken {
    Operand(Operand),
    Operator(LogicalOperator),
}

/// A logical expression over knowledge-base propositions.
///
/// The `prefix` names the proposition this expression's result is committed
/// to during deduction (subject to the target's quantifier scope).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    prefix: String,
    tokens: Vec<ExprToken>,
    cached: Option<Tripartite>,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn tokens(&self) -> &[ExprToken] {
        &self.tokens
    }

    /// Append an operand token referencing a proposition by name.
    pub fn push_operand(&mut self, name: impl Into<String>) {
        self.tokens.push(ExprToken::Operand(Operand::Ref(name.into())));
    }

    /// Append an operand token with a fixed truth value.
    pub fn push_literal(&mut self, value: Tripartite) {
        self.tokens.push(ExprToken::Operand(Operand::Literal(value)));
    }

    /// Append a connective token (AND/OR/NOT/IMPLIES/EQUIVALENT).
    pub fn push_operator(&mut self, op: LogicalOperator) {
        self.tokens.push(ExprToken::Operator(op));
    }

    pub fn open_paren(&mut self) {
        self.tokens.push(ExprToken::Operator(LogicalOperator::LParen));
    }

    pub fn close_paren(&mut self) {
        self.tokens.push(ExprToken::Operator(LogicalOperator::RParen));
    }

    /// Whether `evaluate` has produced a cached result.
    pub fn is_evaluated(&self) -> bool {
        self.cached.is_some()
    }

    /// The cached result of the last evaluation, if any.
    pub fn evaluated_value(&self) -> Option<Tripartite> {
        self.cached
    }

    /// Drop the cached result so the next `evaluate` re-scans the tokens.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Clear tokens and cache.
    pub fn reset(&mut self) {
        self.tokens.clear();
        self.cached = None;
    }

    /// Evaluate the expression against the knowledge base.
    ///
    /// Idempotent: repeated calls return the cached value without
    /// recomputation until [`invalidate`](Self::invalidate) or
    /// [`reset`](Self::reset). An empty token stream evaluates to UNKNOWN.
    /// A malformed stream (mismatched parens, dangling operator) is an
    /// error and leaves the cache unset.
    pub fn evaluate(&mut self, kb: &KnowledgeBase) -> Result<Tripartite, ExprError> {
        if let Some(value) = self.cached {
            return Ok(value);
        }
        let value = self.scan(kb)?;
        self.cached = Some(value);
        Ok(value)
    }

    /// Single left-to-right scan over the token stream with an operator
    /// stack and a value stack. LPAREN is a barrier for precedence popping;
    /// NOT is applied as soon as its operand (or parenthesized group)
    /// completes, which makes it right-associative and tighter than every
    /// binary connective.
    fn scan(&self, kb: &KnowledgeBase) -> Result<Tripartite, ExprError> {
        if self.tokens.is_empty() {
            return Ok(Tripartite::Unknown);
        }

        let mut ops: Vec<LogicalOperator> = Vec::new();
        let mut vals: Vec<Tripartite> = Vec::new();

        for token in &self.tokens {
            match token {
                ExprToken::Operand(operand) => {
                    let value = match operand {
                        Operand::Ref(name) => kb.truth_value(name),
                        Operand::Literal(v) => *v,
                    };
                    vals.push(value);
                    Self::apply_pending_nots(&mut ops, &mut vals);
                }
                ExprToken::Operator(LogicalOperator::Not) => ops.push(LogicalOperator::Not),
                ExprToken::Operator(LogicalOperator::LParen) => ops.push(LogicalOperator::LParen),
                ExprToken::Operator(LogicalOperator::RParen) => {
                    loop {
                        match ops.pop() {
                            Some(LogicalOperator::LParen) => break,
                            Some(op) => Self::apply_binary(op, &mut vals)?,
                            None => {
                                return Err(ExprError::Malformed {
                                    reason: "unmatched ')'".into(),
                                });
                            }
                        }
                    }
                    // A NOT directly before the group applies to its result.
                    Self::apply_pending_nots(&mut ops, &mut vals);
                }
                ExprToken::Operator(op) if op.is_binary() => {
                    while let Some(&top) = ops.last() {
                        if top.is_binary() && top.precedence() >= op.precedence() {
                            ops.pop();
                            Self::apply_binary(top, &mut vals)?;
                        } else {
                            break;
                        }
                    }
                    ops.push(*op);
                }
                ExprToken::Operator(op) => {
                    return Err(ExprError::Malformed {
                        reason: format!("{op:?} is not an evaluable operator"),
                    });
                }
            }
        }

        while let Some(op) = ops.pop() {
            match op {
                LogicalOperator::LParen => {
                    return Err(ExprError::Malformed {
                        reason: "unmatched '('".into(),
                    });
                }
                LogicalOperator::Not => {
                    return Err(ExprError::Malformed {
                        reason: "dangling NOT with no operand".into(),
                    });
                }
                _ => Self::apply_binary(op, &mut vals)?,
            }
        }

        match (vals.pop(), vals.is_empty()) {
            (Some(result), true) => Ok(result),
            _ => Err(ExprError::Malformed {
                reason: "unbalanced operands and operators".into(),
            }),
        }
    }

    /// Pop and apply every NOT sitting on top of the operator stack to the
    /// value just completed.
    fn apply_pending_nots(ops: &mut Vec<LogicalOperator>, vals: &mut Vec<Tripartite>) {
        while ops.last() == Some(&LogicalOperator::Not) {
            ops.pop();
            if let Some(top) = vals.last_mut() {
                *top = logic::not(*top);
            }
        }
    }

    fn apply_binary(op: LogicalOperator, vals: &mut Vec<Tripartite>) -> Result<(), ExprError> {
        let right = vals.pop();
        let left = vals.pop();
        match (left, right) {
            (Some(l), Some(r)) => {
                let result = logic::apply_binary(op, l, r).ok_or_else(|| ExprError::Malformed {
                    reason: format!("{op:?} used as a binary connective"),
                })?;
                vals.push(result);
                Ok(())
            }
            _ => Err(ExprError::Malformed {
                reason: format!("insufficient operands for {op:?}"),
            }),
        }
    }
}
