//! Rule-table evaluation.

use crate::rules::{RuleTable, StateRule};
use rlens_models::{AggregatedSignal, StateLabel};
use std::fmt;

/// Which tier produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTier {
    Complex,
    Single,
}

impl fmt::Display for RuleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTier::Complex => write!(f, "complex"),
            RuleTier::Single => write!(f, "single"),
        }
    }
}

/// The rule that matched, when one did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedRule {
    pub tier: RuleTier,
    pub name: &'static str,
}

/// Outcome of one classification call.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub state: StateLabel,
    pub description: String,
    /// `None` when a fallback resolved the tick
    pub matched: Option<MatchedRule>,
}

/// Evaluates a rule catalog against aggregated signals.
///
/// Evaluation order is complex tier then single tier, each in declaration
/// order; the first rule whose conditions all hold wins. When nothing
/// matches, an empty scene resolves to the catalog's sentinel state and a
/// populated one to its residual fallback. Those two are distinct by
/// catalog validation, so "nobody in frame" and "present but unremarkable"
/// never conflate.
#[derive(Debug, Clone, Copy)]
pub struct StateClassifier {
    table: &'static RuleTable,
}

impl StateClassifier {
    /// Create a classifier over a catalog.
    pub fn new(table: &'static RuleTable) -> Self {
        Self { table }
    }

    /// The catalog in use.
    pub fn table(&self) -> &'static RuleTable {
        self.table
    }

    /// Classify one tick. Never fails; every signal resolves to a state.
    pub fn classify(&self, signal: &AggregatedSignal) -> Classification {
        if let Some(rule) = first_match(self.table.complex, signal) {
            return Classification {
                state: StateLabel::from(rule.name),
                description: rule.description.to_string(),
                matched: Some(MatchedRule {
                    tier: RuleTier::Complex,
                    name: rule.name,
                }),
            };
        }

        if let Some(rule) = first_match(self.table.single, signal) {
            return Classification {
                state: StateLabel::from(rule.name),
                description: rule.description.to_string(),
                matched: Some(MatchedRule {
                    tier: RuleTier::Single,
                    name: rule.name,
                }),
            };
        }

        if signal.active_count == 0 {
            Classification {
                state: StateLabel::from(self.table.empty_state),
                description: self.table.empty_description.to_string(),
                matched: None,
            }
        } else {
            Classification {
                state: StateLabel::from(self.table.fallback_state),
                description: self.table.fallback_description.to_string(),
                matched: None,
            }
        }
    }
}

fn first_match<'a>(rules: &'a [StateRule], signal: &AggregatedSignal) -> Option<&'a StateRule> {
    rules.iter().find(|rule| rule.matches(signal))
}
