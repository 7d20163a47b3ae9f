//! The shipped rule catalogs.
//!
//! Two tables, one per session mode. These are pure data: every threshold
//! was tuned against recorded sessions, so values are preserved exactly
//! across ports. Order within a tier is the priority order. Change a band
//! and bump [`RULES_VERSION`].

use crate::rules::{ForbiddenBand, RuleTable, ScoreBand, SizeRange, StateRule};
use rlens_models::EmotionLabel::*;
use rlens_models::SessionMode;

/// Catalog revision. Bump on any threshold change.
pub const RULES_VERSION: &str = "2.1";

/// The catalog for `mode`.
pub fn rules_for_mode(mode: SessionMode) -> &'static RuleTable {
    match mode {
        SessionMode::Audience => &AUDIENCE_RULES,
        SessionMode::SingleViewer => &VIEWER_RULES,
    }
}

/// Rules for live multi-person audience sessions.
pub static AUDIENCE_RULES: RuleTable = RuleTable {
    name: "audience",
    version: RULES_VERSION,
    complex: AUDIENCE_COMPLEX,
    single: AUDIENCE_SINGLE,
    fallback_state: "Basic Attention",
    fallback_description: "Viewers are present with no strong collective pattern.",
    empty_state: "No Audience Detected",
    empty_description: "No faces are currently visible to the camera.",
};

static AUDIENCE_COMPLEX: &[StateRule] = &[
    StateRule {
        name: "High Engagement",
        description: "The audience is strongly engaged and reacting positively.",
        required: &[
            (Happiness, ScoreBand::at_least(60.0)),
            (Surprise, ScoreBand::at_least(30.0)),
        ],
        forbidden: &[
            (Sadness, ForbiddenBand::stays_below(25.0)),
            (Anger, ForbiddenBand::stays_below(25.0)),
        ],
        audience: Some(SizeRange::at_least(2)),
    },
    StateRule {
        name: "Collective Amusement",
        description: "Amusement is spreading through the audience.",
        required: &[
            (Happiness, ScoreBand::at_least(45.0)),
            (Neutral, ScoreBand::at_most(40.0)),
        ],
        forbidden: &[(Fear, ForbiddenBand::stays_below(20.0))],
        audience: Some(SizeRange::at_least(2)),
    },
    StateRule {
        name: "Shock Wave",
        description: "A sudden moment has caught the audience off guard.",
        required: &[(Surprise, ScoreBand::at_least(55.0))],
        forbidden: &[(Happiness, ForbiddenBand::stays_below(35.0))],
        audience: Some(SizeRange::at_least(2)),
    },
    StateRule {
        name: "Tense Anticipation",
        description: "The audience is bracing for what comes next.",
        required: &[
            (Fear, ScoreBand::at_least(20.0)),
            (Surprise, ScoreBand::at_least(15.0)),
        ],
        forbidden: &[(Happiness, ForbiddenBand::stays_below(30.0))],
        audience: None,
    },
    StateRule {
        name: "Collective Displeasure",
        description: "Displeasure is visible across much of the audience.",
        required: &[
            (Anger, ScoreBand::at_least(30.0)),
            (Disgust, ScoreBand::at_least(15.0)),
        ],
        forbidden: &[(Happiness, ForbiddenBand::stays_below(25.0))],
        audience: Some(SizeRange::at_least(2)),
    },
    StateRule {
        name: "Shared Sorrow",
        description: "A somber mood has settled over the audience.",
        required: &[(Sadness, ScoreBand::at_least(40.0))],
        forbidden: &[
            (Happiness, ForbiddenBand::stays_below(20.0)),
            (Anger, ForbiddenBand::stays_below(30.0)),
        ],
        audience: None,
    },
    StateRule {
        name: "Mixed Reactions",
        description: "The audience is split between positive and negative reactions.",
        required: &[
            (Happiness, ScoreBand::at_least(25.0)),
            (Sadness, ScoreBand::at_least(25.0)),
        ],
        forbidden: &[],
        audience: Some(SizeRange::at_least(3)),
    },
    StateRule {
        name: "Divided Response",
        description: "Part of the audience approves while another part pushes back.",
        required: &[
            (Happiness, ScoreBand::at_least(25.0)),
            (Anger, ScoreBand::at_least(20.0)),
        ],
        forbidden: &[],
        audience: Some(SizeRange::at_least(3)),
    },
    StateRule {
        name: "Quiet Focus",
        description: "The audience is watching calmly and attentively.",
        required: &[(Neutral, ScoreBand::between(50.0, 70.0))],
        forbidden: &[
            (Surprise, ForbiddenBand::stays_below(20.0)),
            (Happiness, ForbiddenBand::capped_at(25.0)),
        ],
        audience: Some(SizeRange::at_least(2)),
    },
    StateRule {
        name: "Waning Interest",
        description: "Attention is drifting and reactions have gone flat.",
        required: &[(Neutral, ScoreBand::at_least(70.0))],
        forbidden: &[
            (Happiness, ForbiddenBand::stays_below(15.0)),
            (Surprise, ForbiddenBand::stays_below(10.0)),
        ],
        audience: None,
    },
];

static AUDIENCE_SINGLE: &[StateRule] = &[
    StateRule {
        name: "Joyful Response",
        description: "Happiness is the dominant reaction in the room.",
        required: &[(Happiness, ScoreBand::at_least(50.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Surprised Reaction",
        description: "Surprise stands out as the main reaction.",
        required: &[(Surprise, ScoreBand::at_least(40.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Saddened Mood",
        description: "Sadness is the prevailing reaction.",
        required: &[(Sadness, ScoreBand::at_least(40.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Irritated Mood",
        description: "Irritation is building in the audience.",
        required: &[(Anger, ScoreBand::at_least(35.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Averse Reaction",
        description: "Aversion dominates the audience reaction.",
        required: &[(Disgust, ScoreBand::at_least(35.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Anxious Mood",
        description: "Unease is the dominant reaction.",
        required: &[(Fear, ScoreBand::at_least(35.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Neutral Attention",
        description: "The audience is present and watching without strong emotion.",
        required: &[(Neutral, ScoreBand::at_least(40.0))],
        forbidden: &[],
        audience: None,
    },
];

/// Rules for single-viewer review sessions.
pub static VIEWER_RULES: RuleTable = RuleTable {
    name: "viewer",
    version: RULES_VERSION,
    complex: VIEWER_COMPLEX,
    single: VIEWER_SINGLE,
    fallback_state: "Basic Attention",
    fallback_description: "The viewer is present with no pronounced reaction.",
    empty_state: "No Face Detected",
    empty_description: "No face is currently visible to the camera.",
};

static VIEWER_COMPLEX: &[StateRule] = &[
    StateRule {
        name: "Delighted Viewing",
        description: "The viewer is visibly delighted by what they are watching.",
        required: &[
            (Happiness, ScoreBand::at_least(60.0)),
            (Surprise, ScoreBand::at_least(20.0)),
        ],
        forbidden: &[(Sadness, ForbiddenBand::stays_below(20.0))],
        audience: None,
    },
    StateRule {
        name: "Amused Viewing",
        description: "The viewer finds the material amusing.",
        required: &[(Happiness, ScoreBand::at_least(45.0))],
        forbidden: &[
            (Anger, ForbiddenBand::stays_below(20.0)),
            (Disgust, ForbiddenBand::stays_below(20.0)),
        ],
        audience: None,
    },
    StateRule {
        name: "Startled Response",
        description: "Something just startled the viewer.",
        required: &[(Surprise, ScoreBand::at_least(55.0))],
        forbidden: &[(Happiness, ForbiddenBand::stays_below(30.0))],
        audience: None,
    },
    StateRule {
        name: "Uneasy Viewing",
        description: "The viewer appears uneasy about what is on screen.",
        required: &[
            (Fear, ScoreBand::at_least(25.0)),
            (Surprise, ScoreBand::at_least(10.0)),
        ],
        forbidden: &[(Happiness, ForbiddenBand::stays_below(30.0))],
        audience: None,
    },
    StateRule {
        name: "Moved Response",
        description: "The viewer is emotionally moved.",
        required: &[(Sadness, ScoreBand::at_least(45.0))],
        forbidden: &[(Disgust, ForbiddenBand::stays_below(25.0))],
        audience: None,
    },
    StateRule {
        name: "Displeased Viewing",
        description: "The viewer is reacting with displeasure.",
        required: &[
            (Anger, ScoreBand::at_least(25.0)),
            (Disgust, ScoreBand::at_least(15.0)),
        ],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Conflicted Response",
        description: "The viewer is showing mixed feelings.",
        required: &[
            (Happiness, ScoreBand::at_least(20.0)),
            (Sadness, ScoreBand::at_least(20.0)),
        ],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Absorbed Viewing",
        description: "The viewer is absorbed and watching closely.",
        required: &[(Neutral, ScoreBand::between(45.0, 80.0))],
        forbidden: &[(Surprise, ForbiddenBand::stays_below(15.0))],
        audience: Some(SizeRange::exactly(1)),
    },
];

static VIEWER_SINGLE: &[StateRule] = &[
    StateRule {
        name: "Enjoying",
        description: "Enjoyment is the viewer's main reaction.",
        required: &[(Happiness, ScoreBand::at_least(40.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Surprised",
        description: "Surprise is the viewer's main reaction.",
        required: &[(Surprise, ScoreBand::at_least(40.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Saddened",
        description: "Sadness is the viewer's main reaction.",
        required: &[(Sadness, ScoreBand::at_least(35.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Frustrated",
        description: "Frustration is the viewer's main reaction.",
        required: &[(Anger, ScoreBand::at_least(30.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Disgusted",
        description: "Disgust is the viewer's main reaction.",
        required: &[(Disgust, ScoreBand::at_least(30.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Tense",
        description: "Tension is the viewer's main reaction.",
        required: &[(Fear, ScoreBand::at_least(30.0))],
        forbidden: &[],
        audience: None,
    },
    StateRule {
        name: "Composed",
        description: "The viewer is composed and showing little emotion.",
        required: &[(Neutral, ScoreBand::at_least(45.0))],
        forbidden: &[],
        audience: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rlens_models::{AggregatedSignal, EmotionLabel, EmotionScores};

    fn signal(entries: &[(EmotionLabel, f64)], active_count: usize) -> AggregatedSignal {
        let mut scores = EmotionScores::zero();
        for (label, value) in entries {
            scores.set(*label, *value);
        }
        AggregatedSignal {
            timestamp_ms: 0,
            average_scores: scores,
            active_count,
            scored_count: active_count,
        }
    }

    #[test]
    fn test_shipped_catalogs_validate() {
        AUDIENCE_RULES.validate().unwrap();
        VIEWER_RULES.validate().unwrap();
    }

    #[test]
    fn test_mode_selects_table() {
        assert_eq!(rules_for_mode(SessionMode::Audience).name, "audience");
        assert_eq!(rules_for_mode(SessionMode::SingleViewer).name, "viewer");
    }

    #[test]
    fn test_high_engagement_is_first_complex_rule() {
        let rule = &AUDIENCE_RULES.complex[0];
        assert_eq!(rule.name, "High Engagement");

        let s = signal(&[(Happiness, 70.0), (Surprise, 45.0), (Neutral, 20.0)], 2);
        assert!(rule.matches(&s));

        // A lone viewer can't produce it.
        let s = signal(&[(Happiness, 70.0), (Surprise, 45.0)], 1);
        assert!(!rule.matches(&s));

        // Strong sadness disqualifies it.
        let s = signal(&[(Happiness, 70.0), (Surprise, 45.0), (Sadness, 25.0)], 2);
        assert!(!rule.matches(&s));
    }

    #[test]
    fn test_quiet_focus_yields_to_waning_interest_above_ceiling() {
        let quiet = signal(&[(Neutral, 65.0), (Happiness, 10.0)], 2);
        let flat = signal(&[(Neutral, 75.0), (Happiness, 10.0)], 2);

        let quiet_focus = &AUDIENCE_RULES.complex[8];
        let waning = &AUDIENCE_RULES.complex[9];
        assert_eq!(quiet_focus.name, "Quiet Focus");
        assert_eq!(waning.name, "Waning Interest");

        assert!(quiet_focus.matches(&quiet));
        assert!(!waning.matches(&quiet));

        assert!(!quiet_focus.matches(&flat));
        assert!(waning.matches(&flat));
    }

    #[test]
    fn test_absorbed_viewing_requires_exactly_one_face() {
        let absorbed = &VIEWER_RULES.complex[7];
        assert_eq!(absorbed.name, "Absorbed Viewing");

        assert!(absorbed.matches(&signal(&[(Neutral, 60.0)], 1)));
        assert!(!absorbed.matches(&signal(&[(Neutral, 60.0)], 2)));
    }

    #[test]
    fn test_tables_share_fallback_but_not_sentinel() {
        assert_eq!(AUDIENCE_RULES.fallback_state, VIEWER_RULES.fallback_state);
        assert_ne!(AUDIENCE_RULES.empty_state, VIEWER_RULES.empty_state);
    }
}
