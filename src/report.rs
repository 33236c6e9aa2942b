//! Result reporting: filter, sort, and format the knowledge base.

use crate::kb::KnowledgeBase;
use crate::logic::Tripartite;
use crate::proposition::Proposition;
use crate::trace;

/// Which propositions to include by derivation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DerivationFilter {
    #[default]
    All,
    /// Only rule-derived propositions (provenance present).
    DerivedOnly,
    /// Only directly asserted propositions (no provenance).
    AxiomsOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NameAscending,
    NameDescending,
    /// TRUE first, then FALSE, then UNKNOWN; name-ordered within a value.
    TruthValue,
}

/// Filters and options for [`format_results`].
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Restrict to these truth values; `None` includes all three.
    pub truth_values: Option<Vec<Tripartite>>,
    pub derivation: DerivationFilter,
    /// Keep only names starting with this prefix.
    pub name_prefix: Option<String>,
    /// Keep only names containing this substring.
    pub name_contains: Option<String>,
    pub sort: SortOrder,
    /// Cap the number of reported propositions.
    pub limit: Option<usize>,
    /// Append a full derivation trace under each reported proposition.
    pub include_traces: bool,
}

impl ReportOptions {
    fn admits(&self, name: &str, prop: &Proposition) -> bool {
        if let Some(values) = &self.truth_values {
            if !values.contains(&prop.truth_value()) {
                return false;
            }
        }
        match self.derivation {
            DerivationFilter::All => {}
            DerivationFilter::DerivedOnly => {
                if !prop.is_derived() {
                    return false;
                }
            }
            DerivationFilter::AxiomsOnly => {
                if prop.is_derived() {
                    return false;
                }
            }
        }
        if let Some(prefix) = &self.name_prefix {
            if !name.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            if !name.contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}

fn truth_rank(value: Tripartite) -> u8 {
    match value {
        Tripartite::True => 0,
        Tripartite::False => 1,
        Tripartite::Unknown => 2,
    }
}

/// Render the knowledge base as `name: Value` lines, annotated with
/// `[derived via <rule>]` where provenance exists.
pub fn format_results(kb: &KnowledgeBase, options: &ReportOptions) -> String {
    let mut selected: Vec<(&String, &Proposition)> = kb
        .iter()
        .filter(|(name, prop)| options.admits(name, prop))
        .collect();

    match options.sort {
        SortOrder::NameAscending => {} // BTreeMap iteration order.
        SortOrder::NameDescending => selected.reverse(),
        SortOrder::TruthValue => {
            selected.sort_by(|a, b| {
                truth_rank(a.1.truth_value())
                    .cmp(&truth_rank(b.1.truth_value()))
                    .then_with(|| a.0.cmp(b.0))
            });
        }
    }

    if let Some(limit) = options.limit {
        selected.truncate(limit);
    }

    let mut out = String::new();
    for (name, prop) in selected {
        out.push_str(&format!("{name}: {}", prop.truth_value()));
        if let Some(prov) = prop.provenance() {
            out.push_str(&format!(" [derived via {}]", prov.rule_fired));
        }
        out.push('\n');

        if options.include_traces {
            let steps = trace::trace_inference(kb, name);
            for line in trace::format_trace(&steps).lines() {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}
