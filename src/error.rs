//! Diagnostic error types for the ratiocinator engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the ratiocinator engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum RatioError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Expr(#[from] ExprError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Infer(#[from] InferError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

// ---------------------------------------------------------------------------
// Expression errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ExprError {
    #[error("malformed expression: {reason}")]
    #[diagnostic(
        code(ratio::expr::malformed),
        help(
            "The token stream is not a well-formed infix expression. \
             Check for unbalanced parentheses, a dangling operator, or \
             two operands with no connective between them."
        )
    )]
    Malformed { reason: String },
}

// ---------------------------------------------------------------------------
// Parse errors (lexer + loader)
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("unexpected character '{character}' at line {line}, column {column}")]
    #[diagnostic(
        code(ratio::parse::lex),
        help(
            "Valid tokens are identifiers (letters, digits, '_', '-'), the \
             operators && || ! ~ -> <->, parentheses, ',' and '='. \
             Lines starting with '#' are comments."
        )
    )]
    Lex {
        character: char,
        line: usize,
        column: usize,
    },

    #[error("unknown relation \"{relation}\" at line {line}")]
    #[diagnostic(
        code(ratio::parse::unknown_relation),
        help(
            "Built-in relations are implies/4, some/2, not/1, discovered/2. \
             Register a custom handler with Loader::register_relation before \
             loading the file."
        )
    )]
    UnknownRelation { relation: String, line: usize },

    #[error("relation \"{relation}\" expects {expected} argument(s), got {actual} at line {line}")]
    #[diagnostic(
        code(ratio::parse::arity),
        help("Check the argument list inside the parentheses on this line.")
    )]
    BadArity {
        relation: String,
        expected: usize,
        actual: usize,
        line: usize,
    },

    #[error("malformed line {line}: \"{content}\"")]
    #[diagnostic(
        code(ratio::parse::malformed_line),
        help(
            "Assumption lines must have the shape \
             `prefix, relation(arg1, ..., argN)`. \
             Check for unbalanced parentheses or a missing comma."
        )
    )]
    MalformedLine { line: usize, content: String },

    #[error("could not read {path}: {source}")]
    #[diagnostic(
        code(ratio::parse::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Inference errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum InferError {
    #[error("deduction did not converge within {passes} passes")]
    #[diagnostic(
        code(ratio::infer::no_convergence),
        help(
            "The fixed-point loop kept deriving changes on every pass. This \
             usually means two rules alternately assert opposing values for \
             the same proposition, or an expression unconditionally re-commits \
             a value under a particular-affirmative scope. Raise max_passes if \
             the knowledge base is simply large; otherwise inspect the conflict \
             lists of the propositions involved."
        )
    )]
    DidNotConverge { passes: usize },
}

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(ratio::engine::invalid_config),
        help("Check the EngineConfig fields. {message}")
    )]
    InvalidConfig { message: String },

    #[error("could not read config {path}: {source}")]
    #[diagnostic(
        code(ratio::engine::config_io),
        help("Check that the config file exists and is valid TOML.")
    )]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config {path}: {message}")]
    #[diagnostic(
        code(ratio::engine::config_parse),
        help("The config file must be TOML with keys max_passes and report_path.")
    )]
    ConfigParse { path: String, message: String },
}

/// Convenience alias for functions returning ratiocinator results.
pub type RatioResult<T> = std::result::Result<T, RatioError>;
