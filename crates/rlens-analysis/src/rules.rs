//! Declarative classification rules.
//!
//! Rules are pure configuration: static tables of threshold bands over the
//! averaged emotion scores, partitioned into a complex tier (multi-condition,
//! evaluated first) and a single tier (one dominant emotion). Within a tier,
//! declaration order is the only tie-break.
//!
//! All intensities are on a 0-100 scale and required-band comparisons are
//! inclusive on both ends.

use std::collections::HashSet;

use crate::error::{AnalysisError, AnalysisResult};
use rlens_models::{AggregatedSignal, EmotionLabel};

/// Inclusive intensity band a score must lie inside. An absent bound leaves
/// that side unconstrained; a label absent from the signal scores as 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBand {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ScoreBand {
    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// `min <= value <= max`, inclusive on both ends.
    pub fn holds(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    fn is_well_formed(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

/// Exclusion band on a score.
///
/// `floor` names the first disallowed level: the score must stay strictly
/// below it. `ceiling` is a hard admissible maximum: the score must not
/// exceed it. Both apply when both are present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForbiddenBand {
    pub floor: Option<f64>,
    pub ceiling: Option<f64>,
}

impl ForbiddenBand {
    pub const fn stays_below(floor: f64) -> Self {
        Self {
            floor: Some(floor),
            ceiling: None,
        }
    }

    pub const fn capped_at(ceiling: f64) -> Self {
        Self {
            floor: None,
            ceiling: Some(ceiling),
        }
    }

    pub fn holds(&self, value: f64) -> bool {
        self.floor.map_or(true, |floor| value < floor)
            && self.ceiling.map_or(true, |ceiling| value <= ceiling)
    }
}

/// Inclusive bounds on the active identity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRange {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl SizeRange {
    pub const fn at_least(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn at_most(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub const fn exactly(count: usize) -> Self {
        Self {
            min: Some(count),
            max: Some(count),
        }
    }

    pub fn holds(&self, count: usize) -> bool {
        self.min.map_or(true, |min| count >= min) && self.max.map_or(true, |max| count <= max)
    }

    fn is_well_formed(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

/// One entry in a prioritized rule table.
#[derive(Debug, Clone, Copy)]
pub struct StateRule {
    /// State name returned when the rule matches
    pub name: &'static str,
    /// Human description carried into timeline entries
    pub description: &'static str,
    /// Bands every listed label must lie inside
    pub required: &'static [(EmotionLabel, ScoreBand)],
    /// Exclusion bands every listed label must satisfy
    pub forbidden: &'static [(EmotionLabel, ForbiddenBand)],
    /// Optional bounds on the active identity count
    pub audience: Option<SizeRange>,
}

impl StateRule {
    /// Whether every condition of this rule holds for the signal.
    pub fn matches(&self, signal: &AggregatedSignal) -> bool {
        self.required
            .iter()
            .all(|(label, band)| band.holds(signal.average_scores.get(*label)))
            && self
                .forbidden
                .iter()
                .all(|(label, band)| band.holds(signal.average_scores.get(*label)))
            && self
                .audience
                .map_or(true, |range| range.holds(signal.active_count))
    }

    fn validate(&self) -> AnalysisResult<()> {
        if self.name.is_empty() {
            return Err(AnalysisError::invalid_rule("<unnamed>", "empty name"));
        }
        if self.description.is_empty() {
            return Err(AnalysisError::invalid_rule(self.name, "empty description"));
        }
        if self.required.is_empty() && self.forbidden.is_empty() && self.audience.is_none() {
            return Err(AnalysisError::invalid_rule(
                self.name,
                "rule has no conditions and would shadow everything after it",
            ));
        }
        for (label, band) in self.required {
            if !band.is_well_formed() {
                return Err(AnalysisError::invalid_rule(
                    self.name,
                    format!("inverted required band on {}", label),
                ));
            }
        }
        if let Some(range) = self.audience {
            if !range.is_well_formed() {
                return Err(AnalysisError::invalid_rule(
                    self.name,
                    "inverted audience range",
                ));
            }
        }
        Ok(())
    }
}

/// A full, versioned rule catalog for one session mode.
///
/// Tables are immutable configuration. They are built as statics, loaded
/// once, and shared read-only across concurrent classification calls.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable {
    /// Catalog name for logs and diagnostics
    pub name: &'static str,
    /// Threshold revision; bump when any band value changes
    pub version: &'static str,
    /// Multi-condition tier, evaluated first
    pub complex: &'static [StateRule],
    /// Dominant-emotion tier, evaluated second
    pub single: &'static [StateRule],
    /// Residual state when faces are present but nothing matched
    pub fallback_state: &'static str,
    pub fallback_description: &'static str,
    /// Sentinel state when no face is tracked at all
    pub empty_state: &'static str,
    pub empty_description: &'static str,
}

impl RuleTable {
    /// Validate the table's structural invariants. Run by tests against
    /// every shipped catalog; threshold values themselves are data, not
    /// logic, and are not second-guessed here.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.complex.is_empty() && self.single.is_empty() {
            return Err(AnalysisError::invalid_table(self.name, "no rules"));
        }
        if self.fallback_state == self.empty_state {
            return Err(AnalysisError::invalid_table(
                self.name,
                "fallback and empty-scene states must be distinguishable",
            ));
        }
        let mut seen = HashSet::new();
        for rule in self.complex.iter().chain(self.single.iter()) {
            rule.validate()?;
            if rule.name == self.fallback_state || rule.name == self.empty_state {
                return Err(AnalysisError::invalid_table(
                    self.name,
                    format!("rule '{}' collides with a fallback state", rule.name),
                ));
            }
            if !seen.insert(rule.name) {
                return Err(AnalysisError::invalid_table(
                    self.name,
                    format!("duplicate rule name '{}'", rule.name),
                ));
            }
        }
        Ok(())
    }

    /// Total number of rules across both tiers.
    pub fn rule_count(&self) -> usize {
        self.complex.len() + self.single.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlens_models::EmotionScores;

    fn signal_with(label: EmotionLabel, value: f64, active_count: usize) -> AggregatedSignal {
        let mut scores = EmotionScores::zero();
        scores.set(label, value);
        AggregatedSignal {
            timestamp_ms: 0,
            average_scores: scores,
            active_count,
            scored_count: active_count,
        }
    }

    #[test]
    fn test_score_band_inclusive_bounds() {
        let band = ScoreBand::between(30.0, 60.0);
        assert!(!band.holds(29.9));
        assert!(band.holds(30.0));
        assert!(band.holds(60.0));
        assert!(!band.holds(60.1));

        assert!(ScoreBand::at_least(50.0).holds(50.0));
        assert!(ScoreBand::at_most(50.0).holds(50.0));
    }

    #[test]
    fn test_forbidden_floor_is_strict() {
        let band = ForbiddenBand::stays_below(25.0);
        assert!(band.holds(24.9));
        assert!(!band.holds(25.0));
        assert!(!band.holds(80.0));
    }

    #[test]
    fn test_forbidden_ceiling_is_inclusive() {
        let band = ForbiddenBand::capped_at(70.0);
        assert!(band.holds(70.0));
        assert!(!band.holds(70.1));
    }

    #[test]
    fn test_size_range() {
        assert!(SizeRange::at_least(2).holds(2));
        assert!(!SizeRange::at_least(2).holds(1));
        assert!(SizeRange::exactly(1).holds(1));
        assert!(!SizeRange::exactly(1).holds(2));
        assert!(SizeRange::at_most(3).holds(0));
    }

    #[test]
    fn test_rule_matching_absent_label_is_zero() {
        static RULE: StateRule = StateRule {
            name: "Test",
            description: "test rule",
            required: &[(EmotionLabel::Happiness, ScoreBand::at_least(40.0))],
            forbidden: &[(EmotionLabel::Anger, ForbiddenBand::stays_below(25.0))],
            audience: None,
        };

        // Anger is zero-filled, which satisfies "stays below 25".
        assert!(RULE.matches(&signal_with(EmotionLabel::Happiness, 40.0, 1)));
        assert!(!RULE.matches(&signal_with(EmotionLabel::Happiness, 39.9, 1)));
    }

    #[test]
    fn test_rule_audience_constraint() {
        static RULE: StateRule = StateRule {
            name: "Crowd",
            description: "crowd rule",
            required: &[(EmotionLabel::Happiness, ScoreBand::at_least(10.0))],
            forbidden: &[],
            audience: Some(SizeRange::at_least(2)),
        };

        assert!(!RULE.matches(&signal_with(EmotionLabel::Happiness, 50.0, 1)));
        assert!(RULE.matches(&signal_with(EmotionLabel::Happiness, 50.0, 2)));
    }

    #[test]
    fn test_table_validation_rejects_fallback_collision() {
        static RULES: &[StateRule] = &[StateRule {
            name: "Basic Attention",
            description: "colliding rule",
            required: &[(EmotionLabel::Neutral, ScoreBand::at_least(10.0))],
            forbidden: &[],
            audience: None,
        }];
        let table = RuleTable {
            name: "test",
            version: "0.0",
            complex: RULES,
            single: &[],
            fallback_state: "Basic Attention",
            fallback_description: "fallback",
            empty_state: "No Audience Detected",
            empty_description: "empty",
        };

        assert!(table.validate().is_err());
    }

    #[test]
    fn test_table_validation_rejects_duplicate_rule_names() {
        static RULES: &[StateRule] = &[
            StateRule {
                name: "Amusement",
                description: "first",
                required: &[(EmotionLabel::Happiness, ScoreBand::at_least(40.0))],
                forbidden: &[],
                audience: None,
            },
            StateRule {
                name: "Amusement",
                description: "second",
                required: &[(EmotionLabel::Happiness, ScoreBand::at_least(60.0))],
                forbidden: &[],
                audience: None,
            },
        ];
        let table = RuleTable {
            name: "test",
            version: "0.0",
            complex: RULES,
            single: &[],
            fallback_state: "Basic Attention",
            fallback_description: "fallback",
            empty_state: "No Audience Detected",
            empty_description: "empty",
        };

        assert!(table.validate().is_err());
    }

    #[test]
    fn test_table_validation_rejects_equal_fallbacks() {
        static RULES: &[StateRule] = &[StateRule {
            name: "Anything",
            description: "rule",
            required: &[(EmotionLabel::Neutral, ScoreBand::at_least(10.0))],
            forbidden: &[],
            audience: None,
        }];
        let table = RuleTable {
            name: "test",
            version: "0.0",
            complex: RULES,
            single: &[],
            fallback_state: "Same",
            fallback_description: "fallback",
            empty_state: "Same",
            empty_description: "empty",
        };

        assert!(table.validate().is_err());
    }
}
