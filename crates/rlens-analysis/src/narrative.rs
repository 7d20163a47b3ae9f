//! End-of-session narrative generation.
//!
//! The digest watches the aggregated signal stream and keeps the peak
//! intensity reached by each label. At session end the single highest peak,
//! paired with its qualitative band, selects a canned narrative line.

use rlens_models::{
    AggregatedSignal, EmotionLabel, EmotionScores, IntensityBand, SessionSummary, SignalStrength,
};

/// Narrative when no signal ever cleared the reporting floor.
pub const QUIET_NARRATIVE: &str =
    "The session passed without a clear emotional reaction. Expressions stayed near baseline throughout.";

/// Narrative line for a dominant label at a given band.
pub fn narrative_for(label: EmotionLabel, band: IntensityBand) -> &'static str {
    use EmotionLabel::*;
    use IntensityBand::*;

    match (label, band) {
        (Happiness, Mild) => "Occasional smiles surfaced, but the mood stayed low-key overall.",
        (Happiness, Moderate) => {
            "The session drew steady amusement, with clearly positive stretches."
        }
        (Happiness, Strong) => {
            "A strongly positive session. Viewers were visibly delighted for much of the runtime."
        }
        (Happiness, Intense) => {
            "An overwhelmingly positive session. Delight peaked near the top of the scale."
        }

        (Surprise, Mild) => "A few moments landed unexpectedly, though surprise never built far.",
        (Surprise, Moderate) => {
            "Viewers were caught off guard more than once. Surprise was the defining reaction."
        }
        (Surprise, Strong) => {
            "The session kept catching viewers off guard, with surprise driving the biggest spikes."
        }
        (Surprise, Intense) => "Jaw-drop territory. Surprise spiked to near-maximum intensity.",

        (Sadness, Mild) => "A faint somber undertone showed through at points.",
        (Sadness, Moderate) => {
            "The session carried a noticeably somber weight. Sadness led the reactions."
        }
        (Sadness, Strong) => {
            "A deeply moving session. Viewers registered strong sadness at its heaviest moments."
        }
        (Sadness, Intense) => {
            "Profoundly affecting. Sadness reached near-maximum intensity during the session."
        }

        (Anger, Mild) => "Mild irritation flickered through without taking hold.",
        (Anger, Moderate) => {
            "Frustration built over the session. Anger was the strongest recurring signal."
        }
        (Anger, Strong) => {
            "The session provoked strong displeasure. Anger dominated the sharpest reactions."
        }
        (Anger, Intense) => "Openly hostile reception. Anger peaked near the top of the scale.",

        (Disgust, Mild) => "Brief flashes of distaste appeared, but never amounted to much.",
        (Disgust, Moderate) => {
            "Viewers recoiled at parts of the session. Distaste was the leading reaction."
        }
        (Disgust, Strong) => {
            "A strongly off-putting session, with aversion driving the peak reactions."
        }
        (Disgust, Intense) => "Viscerally repellent. Disgust spiked to near-maximum intensity.",

        (Fear, Mild) => "A slight unease crept in at moments without building further.",
        (Fear, Moderate) => {
            "Tension ran through the session. Unease was the most pronounced reaction."
        }
        (Fear, Strong) => {
            "A gripping, tense session. Fear carried the strongest moments."
        }
        (Fear, Intense) => "Edge-of-seat intensity. Fear peaked near the top of the scale.",

        (Neutral, Mild) => "Expressions barely moved. The session played to a flat room.",
        (Neutral, Moderate) => {
            "A composed audience. Attention held without strong expression either way."
        }
        (Neutral, Strong) => {
            "Steady, focused viewing. Faces stayed composed through nearly the whole session."
        }
        (Neutral, Intense) => {
            "Complete stillness. Viewers watched with undivided, expressionless focus."
        }
    }
}

/// Rolling per-label peaks across a session.
#[derive(Debug, Clone, Default)]
pub struct SessionDigest {
    peaks: EmotionScores,
    tick_count: u64,
}

impl SessionDigest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tick's aggregated signal into the per-label peaks.
    pub fn observe(&mut self, signal: &AggregatedSignal) {
        for (label, value) in signal.average_scores.iter() {
            if value > self.peaks.get(label) {
                self.peaks.set(label, value);
            }
        }
        self.tick_count += 1;
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Peak intensities seen so far.
    pub fn peaks(&self) -> &EmotionScores {
        &self.peaks
    }

    /// Produce the end-of-session verdict.
    pub fn summarize(&self, segment_count: usize, duration_ms: u64) -> SessionSummary {
        let dominant = self
            .peaks
            .dominant()
            .and_then(|(label, intensity)| {
                IntensityBand::from_intensity(intensity).map(|band| (label, intensity, band))
            });

        match dominant {
            Some((label, intensity, band)) => SessionSummary {
                dominant: Some(SignalStrength {
                    label,
                    intensity,
                }),
                band: Some(band),
                narrative: narrative_for(label, band).to_string(),
                segment_count,
                tick_count: self.tick_count,
                duration_ms,
            },
            None => SessionSummary {
                dominant: None,
                band: None,
                narrative: QUIET_NARRATIVE.to_string(),
                segment_count,
                tick_count: self.tick_count,
                duration_ms,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal_with(pairs: &[(EmotionLabel, f64)]) -> AggregatedSignal {
        let mut scores = EmotionScores::zero();
        for &(label, value) in pairs {
            scores.set(label, value);
        }
        AggregatedSignal {
            timestamp_ms: 0,
            average_scores: scores,
            active_count: 1,
            scored_count: 1,
        }
    }

    #[test]
    fn test_digest_keeps_per_label_peaks() {
        let mut digest = SessionDigest::new();
        digest.observe(&signal_with(&[(EmotionLabel::Happiness, 40.0)]));
        digest.observe(&signal_with(&[
            (EmotionLabel::Happiness, 25.0),
            (EmotionLabel::Surprise, 60.0),
        ]));
        digest.observe(&signal_with(&[(EmotionLabel::Happiness, 55.0)]));

        assert_eq!(digest.peaks().get(EmotionLabel::Happiness), 55.0);
        assert_eq!(digest.peaks().get(EmotionLabel::Surprise), 60.0);
        assert_eq!(digest.tick_count(), 3);
    }

    #[test]
    fn test_summarize_picks_highest_peak() {
        let mut digest = SessionDigest::new();
        digest.observe(&signal_with(&[
            (EmotionLabel::Happiness, 72.0),
            (EmotionLabel::Surprise, 48.0),
        ]));

        let summary = digest.summarize(3, 60_000);
        let dominant = summary.dominant.expect("peak cleared the floor");
        assert_eq!(dominant.label, EmotionLabel::Happiness);
        assert_eq!(dominant.intensity, 72.0);
        assert_eq!(summary.band, Some(IntensityBand::Strong));
        assert_eq!(summary.narrative, narrative_for(EmotionLabel::Happiness, IntensityBand::Strong));
        assert_eq!(summary.segment_count, 3);
        assert_eq!(summary.duration_ms, 60_000);
    }

    #[test]
    fn test_summarize_quiet_session() {
        let mut digest = SessionDigest::new();
        digest.observe(&signal_with(&[(EmotionLabel::Happiness, 3.0)]));

        let summary = digest.summarize(1, 10_000);
        assert!(summary.dominant.is_none());
        assert!(summary.band.is_none());
        assert_eq!(summary.narrative, QUIET_NARRATIVE);
    }

    #[test]
    fn test_summarize_empty_digest() {
        let digest = SessionDigest::new();
        let summary = digest.summarize(0, 0);
        assert!(summary.dominant.is_none());
        assert_eq!(summary.tick_count, 0);
    }

    #[test]
    fn test_each_band_changes_the_story() {
        let bands = [
            IntensityBand::Mild,
            IntensityBand::Moderate,
            IntensityBand::Strong,
            IntensityBand::Intense,
        ];
        for label in EmotionLabel::ALL {
            let mut seen: Vec<&str> = bands.iter().map(|&b| narrative_for(label, b)).collect();
            seen.dedup();
            assert_eq!(seen.len(), bands.len(), "duplicate narrative for {label}");
        }
    }
}
