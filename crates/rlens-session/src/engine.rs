//! Analysis session engine.
//!
//! One session owns two periodic tasks over a shared pipeline state:
//!
//! - the detection task keeps track identities current;
//! - the emotion task scores a bounded face batch, re-aggregates, classifies,
//!   advances the timeline and meters, and emits events.
//!
//! Each task is a sequential loop, so a slow tick body skips that timer's
//! missed ticks instead of overlapping them. All inference awaits happen
//! with the state lock released; results apply in a single lock
//! acquisition, so no half-updated tick is ever observable.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use rlens_analysis::{
    aggregate, rules_for_mode, EngagementMeters, FaceTracker, SessionDigest, StateClassifier,
    TimelineSegmenter, Track, TrackId,
};
use rlens_models::{
    EmotionScores, SessionId, SessionMode, SessionSummary, SessionTimeline, SignalRecord,
};
use rlens_store::{BatchWriter, TelemetrySink, WriterFeed, WriterStats};

use crate::clock::SessionClock;
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::events::SessionEvent;
use crate::perception::{FacePerception, FaceRegion};

/// Mutable pipeline state shared by the two timer tasks.
struct PipelineState {
    tracker: FaceTracker,
    classifier: StateClassifier,
    segmenter: TimelineSegmenter,
    meters: EngagementMeters,
    digest: SessionDigest,
    seq: u64,
}

/// Everything the emotion task needs per tick.
struct EmotionContext {
    perception: Arc<dyn FacePerception>,
    state: Arc<Mutex<PipelineState>>,
    clock: SessionClock,
    max_faces: usize,
    crop_padding: f64,
    session_id: SessionId,
    events: mpsc::UnboundedSender<SessionEvent>,
    feed: WriterFeed,
}

/// Everything a finished session leaves behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub mode: SessionMode,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub timeline: SessionTimeline,
    pub summary: SessionSummary,
    pub stats: SessionStats,
}

/// Lifetime counters attached to the report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub tracks_created: u64,
    pub tracks_evicted: u64,
    pub writer: WriterStats,
}

/// A running analysis session.
///
/// Created with [`AnalysisSession::start`], torn down with
/// [`AnalysisSession::stop`]. Track state lives and dies with the session.
pub struct AnalysisSession {
    session_id: SessionId,
    mode: SessionMode,
    clock: SessionClock,
    state: Arc<Mutex<PipelineState>>,
    shutdown: watch::Sender<bool>,
    detect_task: JoinHandle<()>,
    emotion_task: JoinHandle<()>,
    writer: BatchWriter,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl AnalysisSession {
    /// Validate config, spawn the timer tasks, and start the clock.
    ///
    /// Returns the session handle and the event stream. Dropping the
    /// receiver does not stall the session; events are simply discarded.
    pub fn start(
        config: SessionConfig,
        perception: Arc<dyn FacePerception>,
        sink: Arc<dyn TelemetrySink>,
    ) -> SessionResult<(Self, mpsc::UnboundedReceiver<SessionEvent>)> {
        config.validate()?;
        let table = rules_for_mode(config.mode);
        table.validate()?;

        let session_id = SessionId::new();
        let clock = SessionClock::start();
        let state = Arc::new(Mutex::new(PipelineState {
            tracker: FaceTracker::new(config.tracker),
            classifier: StateClassifier::new(table),
            segmenter: TimelineSegmenter::new(session_id.clone(), config.mode),
            meters: EngagementMeters::new(config.meters),
            digest: SessionDigest::new(),
            seq: 0,
        }));

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, _) = watch::channel(false);
        let writer = BatchWriter::spawn(sink, config.writer.clone());

        info!(
            session_id = %session_id,
            mode = %config.mode,
            perception = perception.name(),
            "Starting analysis session"
        );

        let detect_task = Self::spawn_detection(
            Arc::clone(&perception),
            Arc::clone(&state),
            shutdown_tx.subscribe(),
            clock,
            &config,
        );
        let emotion_ctx = EmotionContext {
            perception,
            state: Arc::clone(&state),
            clock,
            max_faces: config.max_faces_per_emotion_tick,
            crop_padding: config.crop_padding,
            session_id: session_id.clone(),
            events: events_tx.clone(),
            feed: writer.feed(),
        };
        let emotion_task =
            Self::spawn_emotion(emotion_ctx, shutdown_tx.subscribe(), config.emotion_interval);

        let session = Self {
            session_id,
            mode: config.mode,
            clock,
            state,
            shutdown: shutdown_tx,
            detect_task,
            emotion_task,
            writer,
            events: events_tx,
        };
        Ok((session, events_rx))
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Snapshot of the live tracks.
    pub async fn current_tracks(&self) -> Vec<Track> {
        self.state.lock().await.tracker.tracks().to_vec()
    }

    /// Clear the track table and the id counter.
    ///
    /// For camera device switches: stale identities must never reappear in
    /// front of a new lens. Timers keep running; the next detection tick
    /// starts from an empty scene with fresh ids.
    pub async fn reset_tracking(&self) {
        let mut state = self.state.lock().await;
        state.tracker.reset();
        info!(session_id = %self.session_id, "Tracking state reset");
    }

    /// Stop the timers, flush the trailing timeline segment and queued
    /// telemetry, and return the final report.
    pub async fn stop(self) -> SessionResult<SessionReport> {
        let Self {
            session_id,
            mode,
            clock,
            state,
            shutdown,
            detect_task,
            emotion_task,
            writer,
            events,
        } = self;

        info!(session_id = %session_id, "Stopping analysis session");
        let _ = shutdown.send(true);
        let detect_res = detect_task.await;
        let emotion_res = emotion_task.await;

        let mut state = match Arc::try_unwrap(state) {
            Ok(mutex) => mutex.into_inner(),
            Err(_) => {
                return Err(SessionError::task_failed(
                    "pipeline state still shared after task shutdown",
                ));
            }
        };

        // One last classify pass so a state reached between the final
        // emotion tick and stop still lands on the timeline.
        let now_ms = clock.now_ms();
        let signal = aggregate(state.tracker.tracks(), now_ms);
        let classification = state.classifier.classify(&signal);
        if let Some(entry) = state.segmenter.observe(now_ms, &classification, &signal) {
            let _ = events.send(SessionEvent::segment_started(entry));
        }

        let duration_ms = now_ms;
        let timeline = state.segmenter.into_timeline(duration_ms);
        let summary = state.digest.summarize(timeline.len(), duration_ms);
        let (tracks_created, tracks_evicted) = state.tracker.lifetime_counts();

        let writer_stats = writer.close().await;
        let _ = events.send(SessionEvent::stopped(summary.clone()));

        if let Err(e) = detect_res {
            return Err(SessionError::task_failed(format!("detection task: {}", e)));
        }
        if let Err(e) = emotion_res {
            return Err(SessionError::task_failed(format!("emotion task: {}", e)));
        }

        info!(
            session_id = %session_id,
            duration_ms,
            segments = timeline.len(),
            "Session stopped"
        );

        Ok(SessionReport {
            session_id,
            mode,
            started_at: clock.started_at(),
            duration_ms,
            timeline,
            summary,
            stats: SessionStats {
                tracks_created,
                tracks_evicted,
                writer: writer_stats,
            },
        })
    }

    fn spawn_detection(
        perception: Arc<dyn FacePerception>,
        state: Arc<Mutex<PipelineState>>,
        mut shutdown_rx: watch::Receiver<bool>,
        clock: SessionClock,
        config: &SessionConfig,
    ) -> JoinHandle<()> {
        let period = config.detect_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        // Detection runs with the state lock released.
                        match perception.detect_faces().await {
                            Ok(detections) => {
                                let now_ms = clock.now_ms();
                                let mut state = state.lock().await;
                                state.tracker.update(&detections, now_ms);
                            }
                            Err(e) => {
                                warn!("Face detection failed, skipping tick: {}", e);
                            }
                        }
                    }
                }
            }
            debug!("Detection task stopped");
        })
    }

    fn spawn_emotion(
        ctx: EmotionContext,
        mut shutdown_rx: watch::Receiver<bool>,
        period: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        Self::emotion_tick(&ctx).await;
                    }
                }
            }
            debug!("Emotion task stopped");
        })
    }

    async fn emotion_tick(ctx: &EmotionContext) {
        // Snapshot the crop batch under the lock, oldest-scored first.
        let regions: Vec<FaceRegion> = {
            let state = ctx.state.lock().await;
            state
                .tracker
                .emotion_batch(ctx.max_faces)
                .into_iter()
                .map(|(track_id, bbox)| FaceRegion {
                    track_id,
                    bbox: bbox.pad(ctx.crop_padding),
                })
                .collect()
        };

        // Inference with the lock released. A failed face keeps its
        // last-known scores; the tick itself continues.
        let mut scored: Vec<(TrackId, EmotionScores)> = Vec::with_capacity(regions.len());
        for region in &regions {
            match ctx.perception.classify_emotion(region).await {
                Ok(scores) => scored.push((region.track_id, scores)),
                Err(e) => {
                    warn!(
                        track_id = region.track_id,
                        "Emotion inference failed, keeping last known scores: {}", e
                    );
                }
            }
        }

        // Apply the whole round in one lock acquisition.
        let (event, new_segment, record) = {
            let mut state = ctx.state.lock().await;
            let now_ms = ctx.clock.now_ms();

            for (track_id, scores) in scored {
                if !state.tracker.apply_emotion(track_id, scores, now_ms) {
                    debug!(track_id, "Track vanished before its scores arrived");
                }
            }

            let signal = aggregate(state.tracker.tracks(), now_ms);
            let classification = state.classifier.classify(&signal);
            let new_segment = state.segmenter.observe(now_ms, &classification, &signal);
            let meters = state.meters.observe(&signal);
            state.digest.observe(&signal);

            let record = SignalRecord {
                session_id: ctx.session_id.clone(),
                seq: state.seq,
                offset_ms: now_ms,
                recorded_at: Utc::now(),
                scores: signal.average_scores.clone(),
                active_count: signal.active_count,
                state: classification.state.clone(),
            };
            state.seq += 1;

            let tracks = state.tracker.tracks().to_vec();
            (SessionEvent::tick(signal, tracks, meters), new_segment, record)
        };

        ctx.feed.enqueue(record);
        let _ = ctx.events.send(event);
        if let Some(entry) = new_segment {
            info!(state = %entry.state, offset = %entry.offset, "Session entered new state");
            let _ = ctx.events.send(SessionEvent::segment_started(entry));
        }
    }
}
