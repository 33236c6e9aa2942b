//! ratio CLI: three-valued propositional reasoning.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use ratiocinator::engine::{EngineConfig, Ratiocinator};
use ratiocinator::logic::Tripartite;
use ratiocinator::report::{DerivationFilter, ReportOptions, SortOrder};
use ratiocinator::trace::InferenceStep;

#[derive(Parser)]
#[command(name = "ratio", version, about = "Three-valued propositional reasoning engine")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Deduction pass bound (overrides the config file).
    #[arg(long, global = true)]
    max_passes: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load assumptions and facts, deduce, and write a results report.
    Deduce {
        /// Path to the assumptions file.
        assumptions: PathBuf,

        /// Path to the facts file.
        #[arg(long)]
        facts: Option<PathBuf>,

        /// Only report these truth values.
        #[arg(long, value_enum)]
        truth: Vec<TruthArg>,

        /// Only report rule-derived propositions.
        #[arg(long, conflicts_with = "axioms_only")]
        derived_only: bool,

        /// Only report directly asserted propositions.
        #[arg(long)]
        axioms_only: bool,

        /// Only report names starting with this prefix.
        #[arg(long)]
        prefix: Option<String>,

        /// Only report names containing this substring.
        #[arg(long)]
        contains: Option<String>,

        /// Sort order for the report.
        #[arg(long, value_enum, default_value = "name")]
        sort: SortArg,

        /// Cap the number of reported propositions.
        #[arg(long)]
        limit: Option<usize>,

        /// Include a derivation trace under each proposition.
        #[arg(long)]
        traces: bool,
    },

    /// Explain how a proposition's truth value was derived.
    Trace {
        /// Path to the assumptions file.
        assumptions: PathBuf,

        /// Path to the facts file.
        #[arg(long)]
        facts: Option<PathBuf>,

        /// Proposition to trace.
        target: String,
    },

    /// Deduce and export the knowledge base as JSON.
    Export {
        /// Path to the assumptions file.
        assumptions: PathBuf,

        /// Path to the facts file.
        #[arg(long)]
        facts: Option<PathBuf>,

        /// Include full derivation traces per proposition.
        #[arg(long)]
        traces: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TruthArg {
    True,
    False,
    Unknown,
}

impl From<TruthArg> for Tripartite {
    fn from(arg: TruthArg) -> Self {
        match arg {
            TruthArg::True => Tripartite::True,
            TruthArg::False => Tripartite::False,
            TruthArg::Unknown => Tripartite::Unknown,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    NameDesc,
    Truth,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortOrder::NameAscending,
            SortArg::NameDesc => SortOrder::NameDescending,
            SortArg::Truth => SortOrder::TruthValue,
        }
    }
}

#[derive(Serialize)]
struct ExportEntry {
    name: String,
    value: Tripartite,
    rule: Option<String>,
    premises: Vec<String>,
    conflicts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<InferenceStep>>,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    if let Some(max_passes) = cli.max_passes {
        config.max_passes = max_passes;
    }

    match cli.command {
        Commands::Deduce {
            assumptions,
            facts,
            truth,
            derived_only,
            axioms_only,
            prefix,
            contains,
            sort,
            limit,
            traces,
        } => {
            let mut engine = load(config.clone(), &assumptions, facts.as_deref())?;
            let outcome = engine.deduce()?;
            println!("Converged after {} passes ({} changes).", outcome.passes, outcome.changes);

            let options = ReportOptions {
                truth_values: if truth.is_empty() {
                    None
                } else {
                    Some(truth.into_iter().map(Tripartite::from).collect())
                },
                derivation: if derived_only {
                    DerivationFilter::DerivedOnly
                } else if axioms_only {
                    DerivationFilter::AxiomsOnly
                } else {
                    DerivationFilter::All
                },
                name_prefix: prefix,
                name_contains: contains,
                sort: sort.into(),
                limit,
                include_traces: traces,
            };
            let report = engine.format_results(&options);
            std::fs::write(&config.report_path, &report).into_diagnostic()?;
            println!("Report written to {}", config.report_path);
        }

        Commands::Trace {
            assumptions,
            facts,
            target,
        } => {
            let mut engine = load(config, &assumptions, facts.as_deref())?;
            engine.deduce()?;
            print!("{}", engine.format_trace(&target));
        }

        Commands::Export {
            assumptions,
            facts,
            traces,
        } => {
            let mut engine = load(config, &assumptions, facts.as_deref())?;
            engine.deduce()?;

            let entries: Vec<ExportEntry> = engine
                .knowledge_base()
                .iter()
                .map(|(name, prop)| ExportEntry {
                    name: name.clone(),
                    value: prop.truth_value(),
                    rule: prop.provenance().map(|p| p.rule_fired.clone()),
                    premises: prop
                        .provenance()
                        .map(|p| p.premises.clone())
                        .unwrap_or_default(),
                    conflicts: prop.conflicts().len(),
                    trace: traces.then(|| engine.trace(name)),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
        }
    }

    Ok(())
}

fn load(
    config: EngineConfig,
    assumptions: &std::path::Path,
    facts: Option<&std::path::Path>,
) -> Result<Ratiocinator> {
    let mut engine = Ratiocinator::with_config(config)?;
    let skipped = engine.load_assumptions(assumptions)?;
    if skipped > 0 {
        eprintln!("Warning: {skipped} assumption line(s) skipped.");
    }
    if let Some(facts) = facts {
        let skipped = engine.load_facts(facts)?;
        if skipped > 0 {
            eprintln!("Warning: {skipped} facts line(s) skipped.");
        }
    }
    Ok(engine)
}
