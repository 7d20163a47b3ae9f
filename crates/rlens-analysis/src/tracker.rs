//! Center-distance tracker for maintaining face identity across frames.
//!
//! Uses greedy nearest-center matching to associate detections with
//! existing tracks between consecutive frames. Matching is first-come in
//! detection order, not a global optimal assignment.

use crate::models::{BoundingBox, Detection, Track, TrackId};
use rlens_models::EmotionScores;
use tracing::{debug, trace};

/// Tracker tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackerConfig {
    /// Detections with `min(width, height)` below this are discarded as
    /// spurious (pixels)
    pub min_box_size: f64,

    /// A detection matches a track only when their center distance is
    /// below `match_gate * max(det.width, det.height)`
    pub match_gate: f64,

    /// Weight of the incoming detection when smoothing a matched track's
    /// box; the remainder stays on the old box
    pub detection_weight: f64,

    /// Tracks unseen for this long are evicted (milliseconds)
    pub timeout_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_box_size: 20.0,
            match_gate: 0.75,
            detection_weight: 0.7,
            timeout_ms: 1200,
        }
    }
}

/// Maintains the set of currently tracked identities.
///
/// One instance per session. Callers must supply monotonically
/// non-decreasing `now_ms` values; the smoothing and timeout logic rely on
/// it.
#[derive(Debug)]
pub struct FaceTracker {
    config: TrackerConfig,
    /// Live tracks in creation order
    tracks: Vec<Track>,
    /// Next track ID to assign
    next_track_id: TrackId,
    created_total: u64,
    evicted_total: u64,
}

impl FaceTracker {
    /// Create a new tracker.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            tracks: Vec::new(),
            next_track_id: 0,
            created_total: 0,
            evicted_total: 0,
        }
    }

    /// Update tracks with the detections observed in the most recent frame.
    ///
    /// Returns the full current set of live tracks: matched-and-updated,
    /// newly created, and still-within-timeout-but-unmatched. An empty
    /// detection list is valid and only ages out stale tracks.
    pub fn update(&mut self, detections: &[Detection], now_ms: u64) -> &[Track] {
        let mut matched = vec![false; self.tracks.len()];
        let mut new_tracks: Vec<Track> = Vec::new();

        for det in detections {
            if !self.accepts(det) {
                trace!(?det.bbox, "Discarded malformed or undersized detection");
                continue;
            }

            // Nearest unmatched track within the size-relative gate.
            let gate = self.config.match_gate * det.bbox.width.max(det.bbox.height);
            let mut best: Option<(usize, f64)> = None;
            for (idx, track) in self.tracks.iter().enumerate() {
                if matched[idx] {
                    continue;
                }
                let dist = track.bbox.center_distance(&det.bbox);
                if dist < gate && best.map_or(true, |(_, d)| dist < d) {
                    best = Some((idx, dist));
                }
            }

            match best {
                Some((idx, _)) => {
                    let track = &mut self.tracks[idx];
                    track.bbox = track.bbox.blend(&det.bbox, self.config.detection_weight);
                    track.last_seen_ms = now_ms;
                    matched[idx] = true;
                }
                None => {
                    let id = self.next_track_id;
                    self.next_track_id += 1;
                    self.created_total += 1;
                    new_tracks.push(Track {
                        id,
                        bbox: det.bbox,
                        last_seen_ms: now_ms,
                        emotion: None,
                        last_emotion_ms: None,
                    });
                }
            }
        }

        // Evict tracks unseen for the timeout or longer.
        let before = self.tracks.len();
        let timeout = self.config.timeout_ms;
        self.tracks
            .retain(|t| now_ms.saturating_sub(t.last_seen_ms) < timeout);
        let evicted = before - self.tracks.len();
        if evicted > 0 {
            self.evicted_total += evicted as u64;
            debug!(evicted, remaining = self.tracks.len(), "Evicted stale tracks");
        }

        self.tracks.extend(new_tracks);
        &self.tracks
    }

    /// Attach emotion scores to a track by id.
    ///
    /// Returns `false` when the track was evicted between selection and
    /// inference completion; the result is simply dropped in that case.
    pub fn apply_emotion(&mut self, id: TrackId, scores: EmotionScores, now_ms: u64) -> bool {
        match self.tracks.iter_mut().find(|t| t.id == id) {
            Some(track) => {
                track.emotion = Some(scores.sanitized());
                track.last_emotion_ms = Some(now_ms);
                true
            }
            None => false,
        }
    }

    /// Select up to `limit` tracks for the next emotion round,
    /// oldest-processed first. Tracks never processed come before all
    /// processed ones; ties keep creation order.
    pub fn emotion_batch(&self, limit: usize) -> Vec<(TrackId, BoundingBox)> {
        let mut candidates: Vec<&Track> = self.tracks.iter().collect();
        candidates.sort_by_key(|t| (t.last_emotion_ms.is_some(), t.last_emotion_ms.unwrap_or(0)));
        candidates
            .into_iter()
            .take(limit)
            .map(|t| (t.id, t.bbox))
            .collect()
    }

    /// Current live tracks in creation order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of live tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Number of live tracks carrying emotion data.
    pub fn scored_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.emotion.is_some()).count()
    }

    /// Total tracks created and evicted over the tracker's lifetime.
    pub fn lifetime_counts(&self) -> (u64, u64) {
        (self.created_total, self.evicted_total)
    }

    /// Clear the track table and the id counter. Required when the input
    /// device changes; ids from the previous device must never reappear.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.next_track_id = 0;
        debug!("Tracker reset");
    }

    fn accepts(&self, det: &Detection) -> bool {
        det.bbox.is_valid() && det.bbox.width.min(det.bbox.height) >= self.config.min_box_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlens_models::EmotionLabel;

    fn det(x: f64, y: f64, size: f64, now_ms: u64) -> Detection {
        Detection::new(BoundingBox::new(x, y, size, size), now_ms)
    }

    #[test]
    fn test_new_detections_get_sequential_ids() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());

        let tracks = tracker.update(&[det(100.0, 100.0, 50.0, 0), det(400.0, 100.0, 50.0, 0)], 0);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, 0);
        assert_eq!(tracks[1].id, 1);
    }

    #[test]
    fn test_id_stable_under_small_motion() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());

        // 50px box moving 10px per frame stays well under the
        // 0.75 * 50 = 37.5px gate.
        let mut now = 0;
        tracker.update(&[det(100.0, 100.0, 50.0, now)], now);
        for step in 1..=20u64 {
            now = step * 150;
            let x = 100.0 + step as f64 * 10.0;
            let tracks = tracker.update(&[det(x, 100.0, 50.0, now)], now);
            assert_eq!(tracks.len(), 1);
            assert_eq!(tracks[0].id, 0);
        }
    }

    #[test]
    fn test_gate_scales_with_detection_size() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());
        tracker.update(&[det(100.0, 100.0, 40.0, 0)], 0);

        // Center jump of 35px exceeds 0.75 * 40 = 30, so a new identity
        // is created and the old one survives until timeout.
        let tracks = tracker.update(&[det(135.0, 100.0, 40.0, 150)], 150);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks.iter().filter(|t| t.id == 0).count(), 1);
        assert_eq!(tracks.iter().filter(|t| t.id == 1).count(), 1);
    }

    #[test]
    fn test_matched_box_is_smoothed() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());
        tracker.update(&[det(100.0, 100.0, 50.0, 0)], 0);

        let tracks = tracker.update(&[det(110.0, 100.0, 50.0, 150)], 150);
        // 0.3 * 100 + 0.7 * 110
        assert!((tracks[0].bbox.x - 107.0).abs() < 1e-9);
        assert_eq!(tracks[0].last_seen_ms, 150);
    }

    #[test]
    fn test_greedy_matching_is_first_come() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());
        tracker.update(&[det(100.0, 100.0, 60.0, 0)], 0);

        // Both detections are within gate of track 0; the first one in
        // detection order claims it, the second becomes a new track.
        let tracks = tracker.update(&[det(110.0, 100.0, 60.0, 150), det(95.0, 100.0, 60.0, 150)], 150);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, 0);
        assert_eq!(tracks[1].id, 1);
    }

    #[test]
    fn test_eviction_at_timeout_boundary() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());
        tracker.update(&[det(100.0, 100.0, 50.0, 0)], 0);

        // Just under the timeout: still present.
        let tracks = tracker.update(&[], 1199);
        assert_eq!(tracks.len(), 1);

        // At the timeout exactly: evicted.
        let tracks = tracker.update(&[], 1200);
        assert!(tracks.is_empty());
    }

    #[test]
    fn test_gap_then_return_keeps_id() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());
        tracker.update(&[det(100.0, 100.0, 50.0, 0)], 0);

        // Unseen for 900ms, then reappears nearby.
        tracker.update(&[], 900);
        let tracks = tracker.update(&[det(105.0, 102.0, 50.0, 1000)], 1000);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, 0);
    }

    #[test]
    fn test_ids_never_reused_after_eviction() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());
        tracker.update(&[det(100.0, 100.0, 50.0, 0)], 0);
        tracker.update(&[], 2000);

        let tracks = tracker.update(&[det(100.0, 100.0, 50.0, 2100)], 2100);
        assert_eq!(tracks[0].id, 1);
    }

    #[test]
    fn test_malformed_and_tiny_detections_filtered() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());

        let bad = vec![
            Detection::new(BoundingBox::new(f64::NAN, 0.0, 50.0, 50.0), 0),
            Detection::new(BoundingBox::new(0.0, 0.0, -10.0, 50.0), 0),
            det(100.0, 100.0, 10.0, 0), // below the 20px floor
        ];
        assert!(tracker.update(&bad, 0).is_empty());
    }

    #[test]
    fn test_emotion_join_and_batch_order() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());
        tracker.update(
            &[
                det(100.0, 100.0, 50.0, 0),
                det(300.0, 100.0, 50.0, 0),
                det(500.0, 100.0, 50.0, 0),
            ],
            0,
        );

        let mut scores = EmotionScores::zero();
        scores.set(EmotionLabel::Happiness, 70.0);
        assert!(tracker.apply_emotion(1, scores, 300));

        // Never-processed tracks come first, in creation order.
        let batch = tracker.emotion_batch(2);
        let ids: Vec<TrackId> = batch.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 2]);

        // With a larger limit the processed track trails.
        let batch = tracker.emotion_batch(10);
        let ids: Vec<TrackId> = batch.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 2, 1]);
    }

    #[test]
    fn test_apply_emotion_to_evicted_track_is_dropped() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());
        tracker.update(&[det(100.0, 100.0, 50.0, 0)], 0);
        tracker.update(&[], 2000);

        assert!(!tracker.apply_emotion(0, EmotionScores::zero(), 2100));
    }

    #[test]
    fn test_matched_track_carries_emotion_forward() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());
        tracker.update(&[det(100.0, 100.0, 50.0, 0)], 0);

        let mut scores = EmotionScores::zero();
        scores.set(EmotionLabel::Surprise, 45.0);
        tracker.apply_emotion(0, scores, 300);

        let tracks = tracker.update(&[det(105.0, 100.0, 50.0, 450)], 450);
        let emotion = tracks[0].emotion.unwrap();
        assert_eq!(emotion.surprise, 45.0);
        assert_eq!(tracks[0].last_emotion_ms, Some(300));
    }

    #[test]
    fn test_reset_clears_table_and_id_counter() {
        let mut tracker = FaceTracker::new(TrackerConfig::default());
        tracker.update(&[det(100.0, 100.0, 50.0, 0), det(300.0, 100.0, 50.0, 0)], 0);

        tracker.reset();
        assert_eq!(tracker.track_count(), 0);

        let tracks = tracker.update(&[det(100.0, 100.0, 50.0, 100)], 100);
        assert_eq!(tracks[0].id, 0);
    }
}
