//! Engine facade: top-level API for the ratiocinator.
//!
//! The [`Ratiocinator`] owns the knowledge base and the loader and wires
//! the subsystems together: load assumptions and facts, run deduction to a
//! fixed point, then report or trace the results.
//!
//! ```no_run
//! use ratiocinator::engine::Ratiocinator;
//! use ratiocinator::report::ReportOptions;
//!
//! # fn run() -> ratiocinator::error::RatioResult<()> {
//! let mut engine = Ratiocinator::new();
//! engine.load_assumptions("assumptions.txt")?;
//! engine.load_facts("facts.txt")?;
//! engine.deduce()?;
//! println!("{}", engine.format_results(&ReportOptions::default()));
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, InferError, ParseError};
use crate::expression::Expression;
use crate::infer::{self, DeduceOutcome, DEFAULT_MAX_PASSES};
use crate::kb::KnowledgeBase;
use crate::logic::Tripartite;
use crate::parse::loader::{Loader, RelationHandler};
use crate::proposition::Proposition;
use crate::report::{self, ReportOptions};
use crate::trace::{self, InferenceStep};

/// Configuration for the reasoning engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deduction pass bound before reporting non-convergence.
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,
    /// Filename the CLI writes result reports to.
    #[serde(default = "default_report_path")]
    pub report_path: String,
}

fn default_max_passes() -> usize {
    DEFAULT_MAX_PASSES
}

fn default_report_path() -> String {
    "results.txt".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_passes: default_max_passes(),
            report_path: default_report_path(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|err| EngineError::ConfigParse {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_passes == 0 {
            return Err(EngineError::InvalidConfig {
                message: "max_passes must be > 0".into(),
            });
        }
        if self.report_path.is_empty() {
            return Err(EngineError::InvalidConfig {
                message: "report_path must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// The reasoning engine.
pub struct Ratiocinator {
    config: EngineConfig,
    loader: Loader,
    kb: KnowledgeBase,
}

impl Default for Ratiocinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Ratiocinator {
    /// An engine with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            loader: Loader::new(),
            kb: KnowledgeBase::new(),
        }
    }

    /// An engine with the given configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        tracing::info!(max_passes = config.max_passes, "initializing ratiocinator");
        Ok(Self {
            config,
            loader: Loader::new(),
            kb: KnowledgeBase::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a custom assumption relation handler.
    pub fn register_relation(&mut self, name: impl Into<String>, handler: RelationHandler) {
        self.loader.register_relation(name, handler);
    }

    /// Load proposition definitions from an assumptions file. Returns the
    /// number of skipped lines.
    pub fn load_assumptions(&mut self, path: impl AsRef<Path>) -> Result<usize, ParseError> {
        let skipped = self.loader.load_assumptions(path, &mut self.kb)?;
        tracing::info!(propositions = self.kb.len(), skipped, "assumptions loaded");
        Ok(skipped)
    }

    /// Load truth assertions and expressions from a facts file. Returns
    /// the number of skipped lines.
    pub fn load_facts(&mut self, path: impl AsRef<Path>) -> Result<usize, ParseError> {
        let skipped = self.loader.load_facts(path, &mut self.kb)?;
        tracing::info!(
            propositions = self.kb.len(),
            expressions = self.kb.expressions().len(),
            skipped,
            "facts loaded"
        );
        Ok(skipped)
    }

    /// Load assumptions from in-memory text.
    pub fn load_assumptions_str(&mut self, text: &str) -> usize {
        self.loader.load_assumptions_str(text, &mut self.kb)
    }

    /// Load facts from in-memory text.
    pub fn load_facts_str(&mut self, text: &str) -> usize {
        self.loader.load_facts_str(text, &mut self.kb)
    }

    /// Run deduction to a fixed point, bounded by the configured pass
    /// limit.
    pub fn deduce(&mut self) -> Result<DeduceOutcome, InferError> {
        infer::deduce_all(&mut self.kb, self.config.max_passes)
    }

    /// Format the current knowledge base per the given report options.
    pub fn format_results(&self, options: &ReportOptions) -> String {
        report::format_results(&self.kb, options)
    }

    /// Walk backward from `name` through provenance.
    pub fn trace(&self, name: &str) -> Vec<InferenceStep> {
        trace::trace_inference(&self.kb, name)
    }

    /// Render a derivation trace for `name`.
    pub fn format_trace(&self, name: &str) -> String {
        trace::format_trace(&self.trace(name))
    }

    // ------------------------------------------------------------------
    // Knowledge-base accessors
    // ------------------------------------------------------------------

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn knowledge_base_mut(&mut self) -> &mut KnowledgeBase {
        &mut self.kb
    }

    pub fn set_proposition(&mut self, name: impl Into<String>, prop: Proposition) {
        self.kb.insert(name, prop);
    }

    pub fn proposition(&self, name: &str) -> Option<&Proposition> {
        self.kb.get(name)
    }

    pub fn has_proposition(&self, name: &str) -> bool {
        self.kb.contains(name)
    }

    pub fn set_truth_value(&mut self, name: &str, value: Tripartite) {
        self.kb.set_truth_value(name, value);
    }

    pub fn truth_value(&self, name: &str) -> Tripartite {
        self.kb.truth_value(name)
    }

    pub fn add_expression(&mut self, expr: Expression) {
        self.kb.add_expression(expr);
    }
}
