//! Activation-to-clip capture policy.
//!
//! [`CaptureController`] turns the continuous stream of per-chunk detection
//! scores into discrete "save a clip now" decisions.  It owns the only
//! cross-chunk mutable state in the pipeline: the pending first-crossing
//! timestamps per model and the time of the last save.
//!
//! # Policy
//!
//! A clip for a model is saved once three conditions hold on the same chunk:
//!
//! 1. at least one threshold crossing has been recorded for the model,
//! 2. the global cooldown has elapsed since the last save of *any* model,
//! 3. the save delay has elapsed since the model's *first* recorded
//!    crossing — this is what lets post-activation audio accumulate in the
//!    ring buffer before the snapshot is cut.
//!
//! `last_save` is updated the moment a save fires, so within one chunk a
//! save for model A suppresses model B even when B's delay has elapsed.
//! B's pending crossings are kept, not cleared: B fires as soon as the
//! cooldown next permits it, evaluated against its original first crossing.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::CaptureConfig;
use crate::detect::Scores;

// ---------------------------------------------------------------------------
// SaveEvent
// ---------------------------------------------------------------------------

/// A decision to persist a clip for one model.
///
/// Emitting the event is the controller's only output; cutting the buffer
/// snapshot and writing the file are left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEvent {
    /// Model whose activation triggered the save.
    pub model: String,
    /// The chunk timestamp at which the save condition held.
    pub at: Instant,
}

// ---------------------------------------------------------------------------
// CaptureController
// ---------------------------------------------------------------------------

/// Per-chunk save decision logic.
///
/// # Example
///
/// ```rust
/// use std::time::{Duration, Instant};
/// use wake_capture::activation::CaptureController;
/// use wake_capture::config::CaptureConfig;
/// use wake_capture::detect::Scores;
///
/// let origin = Instant::now();
/// let mut controller = CaptureController::with_origin(&CaptureConfig::default(), origin);
///
/// let mut scores = Scores::new();
/// scores.insert("alexa".into(), 0.9);
///
/// // Crossing recorded, but the save delay has not elapsed yet.
/// assert!(controller
///     .on_chunk(&scores, origin + Duration::from_secs(10))
///     .is_empty());
///
/// // One second later the delay has elapsed — the save fires.
/// let events = controller.on_chunk(&scores, origin + Duration::from_secs(11));
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].model, "alexa");
/// ```
pub struct CaptureController {
    threshold: f32,
    cooldown: Duration,
    save_delay: Duration,
    /// Time of the most recent save across all models.
    last_save: Instant,
    /// Threshold-crossing timestamps per model, oldest first.  Cleared
    /// wholesale when that model saves; retained while cooldown suppresses
    /// it.
    pending: HashMap<String, Vec<Instant>>,
}

impl CaptureController {
    /// Create a controller whose cooldown clock starts now.
    ///
    /// The first save cannot fire until one full cooldown after creation.
    pub fn new(config: &CaptureConfig) -> Self {
        Self::with_origin(config, Instant::now())
    }

    /// Create a controller with an explicit creation instant.
    ///
    /// Tests inject `origin` so the cooldown clock can be placed
    /// arbitrarily far in the simulated past.
    pub fn with_origin(config: &CaptureConfig, origin: Instant) -> Self {
        Self {
            threshold: config.threshold,
            // Negative config values behave as zero.
            cooldown: Duration::from_secs_f32(config.cooldown_secs.max(0.0)),
            save_delay: Duration::from_secs_f32(config.save_delay_secs.max(0.0)),
            last_save: origin,
            pending: HashMap::new(),
        }
    }

    /// Evaluate one chunk's scores at time `now`.
    ///
    /// Returns the save events this chunk triggers — zero or more, at most
    /// one per distinct model.  `now` should be non-decreasing across calls;
    /// an out-of-order (earlier) `now` is not an error, it simply cannot
    /// satisfy the elapsed-time conditions.
    pub fn on_chunk(&mut self, scores: &Scores, now: Instant) -> Vec<SaveEvent> {
        let mut events = Vec::new();

        for (model, &score) in scores {
            // NaN fails the comparison and is simply not an activation.
            if score >= self.threshold {
                self.pending.entry(model.clone()).or_default().push(now);
            }

            let ready = match self.pending.get(model) {
                Some(crossings) if !crossings.is_empty() => {
                    now.saturating_duration_since(self.last_save) >= self.cooldown
                        && now.saturating_duration_since(crossings[0]) >= self.save_delay
                }
                _ => false,
            };

            if ready {
                self.last_save = now;
                self.pending.insert(model.clone(), Vec::new());
                events.push(SaveEvent {
                    model: model.clone(),
                    at: now,
                });
            }
        }

        events
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    fn scores(pairs: &[(&str, f32)]) -> Scores {
        pairs
            .iter()
            .map(|&(name, score)| (name.to_string(), score))
            .collect()
    }

    /// Controller with the reference configuration (threshold 0.5,
    /// cooldown 4 s, delay 1 s) created at `origin`.
    fn controller(origin: Instant) -> CaptureController {
        CaptureController::with_origin(&CaptureConfig::default(), origin)
    }

    // ---- No-activation sequences -------------------------------------------

    #[test]
    fn below_threshold_never_saves() {
        let origin = Instant::now();
        let mut ctl = controller(origin);

        for i in 0..200 {
            let events = ctl.on_chunk(&scores(&[("m", 0.49)]), origin + secs(i as f32 * 0.08));
            assert!(events.is_empty(), "chunk {i} emitted unexpectedly");
        }
    }

    #[test]
    fn empty_score_map_is_a_noop() {
        let origin = Instant::now();
        let mut ctl = controller(origin);

        let empty = Scores::new();
        for i in 0..10 {
            assert!(ctl.on_chunk(&empty, origin + secs(i as f32)).is_empty());
        }

        // State was untouched: a fresh crossing still needs the full delay.
        assert!(ctl
            .on_chunk(&scores(&[("m", 0.9)]), origin + secs(20.0))
            .is_empty());
        let events = ctl.on_chunk(&scores(&[("m", 0.1)]), origin + secs(21.0));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn nan_score_is_not_an_activation() {
        let origin = Instant::now();
        let mut ctl = controller(origin);

        for i in 0..100 {
            let events = ctl.on_chunk(&scores(&[("m", f32::NAN)]), origin + secs(i as f32));
            assert!(events.is_empty());
        }
    }

    #[test]
    fn single_crossing_without_time_advance_never_saves() {
        let origin = Instant::now();
        let mut ctl = controller(origin);
        let at = origin + secs(10.0);

        // The same `now` over and over: the delay can never elapse.
        for _ in 0..50 {
            assert!(ctl.on_chunk(&scores(&[("m", 0.9)]), at).is_empty());
        }
    }

    // ---- Reference save scenario -------------------------------------------

    #[test]
    fn save_fires_when_delay_elapses() {
        let origin = Instant::now();
        let mut ctl = controller(origin);

        // Crossing at t=10 (cooldown from creation long since elapsed).
        assert!(ctl
            .on_chunk(&scores(&[("m", 0.6)]), origin + secs(10.0))
            .is_empty());
        // t=10.5: score back under threshold, delay not yet elapsed.
        assert!(ctl
            .on_chunk(&scores(&[("m", 0.1)]), origin + secs(10.5))
            .is_empty());
        // t=11.0: one second since the first crossing — save fires.
        let events = ctl.on_chunk(&scores(&[("m", 0.1)]), origin + secs(11.0));
        assert_eq!(
            events,
            vec![SaveEvent {
                model: "m".into(),
                at: origin + secs(11.0),
            }]
        );
    }

    #[test]
    fn score_exactly_at_threshold_counts() {
        let origin = Instant::now();
        let mut ctl = controller(origin);

        ctl.on_chunk(&scores(&[("m", 0.5)]), origin + secs(10.0));
        let events = ctl.on_chunk(&scores(&[("m", 0.0)]), origin + secs(11.0));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn delay_runs_from_first_crossing_not_latest() {
        let origin = Instant::now();
        let mut ctl = controller(origin);

        ctl.on_chunk(&scores(&[("m", 0.6)]), origin + secs(10.0));
        // A second, later crossing must not push the save back.
        ctl.on_chunk(&scores(&[("m", 0.9)]), origin + secs(10.5));
        let events = ctl.on_chunk(&scores(&[("m", 0.9)]), origin + secs(11.0));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].at, origin + secs(11.0));
    }

    #[test]
    fn pending_is_cleared_by_save() {
        let origin = Instant::now();
        let mut ctl = controller(origin);

        ctl.on_chunk(&scores(&[("m", 0.9)]), origin + secs(10.0));
        assert_eq!(
            ctl.on_chunk(&scores(&[("m", 0.1)]), origin + secs(11.0)).len(),
            1
        );

        // No new crossings: nothing left to fire, even well past cooldown.
        for i in 0..100 {
            let at = origin + secs(12.0 + i as f32);
            assert!(ctl.on_chunk(&scores(&[("m", 0.1)]), at).is_empty());
        }
    }

    #[test]
    fn refire_requires_new_crossing_and_cooldown() {
        let origin = Instant::now();
        let mut ctl = controller(origin);

        // First save at t=11.
        ctl.on_chunk(&scores(&[("m", 0.9)]), origin + secs(10.0));
        assert_eq!(
            ctl.on_chunk(&scores(&[("m", 0.1)]), origin + secs(11.0)).len(),
            1
        );

        // New crossing at t=16 (cooldown from t=11 already elapsed);
        // fires once its own delay elapses at t=17.
        assert!(ctl
            .on_chunk(&scores(&[("m", 0.8)]), origin + secs(16.0))
            .is_empty());
        let events = ctl.on_chunk(&scores(&[("m", 0.1)]), origin + secs(17.0));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].at, origin + secs(17.0));
    }

    // ---- Cooldown semantics ------------------------------------------------

    #[test]
    fn first_save_waits_out_cooldown_from_creation() {
        let origin = Instant::now();
        let mut ctl = controller(origin);

        // Crossing almost immediately after startup.
        ctl.on_chunk(&scores(&[("m", 0.9)]), origin + secs(0.5));
        // Delay elapsed at t=1.5, but the creation-time cooldown has not.
        assert!(ctl
            .on_chunk(&scores(&[("m", 0.1)]), origin + secs(1.5))
            .is_empty());
        assert!(ctl
            .on_chunk(&scores(&[("m", 0.1)]), origin + secs(3.9))
            .is_empty());
        // t=4.0: cooldown from creation satisfied.
        let events = ctl.on_chunk(&scores(&[("m", 0.1)]), origin + secs(4.0));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn save_for_one_model_suppresses_the_other_within_cooldown() {
        let origin = Instant::now();
        let mut ctl = controller(origin);

        // Both models cross at t=10.
        assert!(ctl
            .on_chunk(&scores(&[("a", 0.9), ("b", 0.9)]), origin + secs(10.0))
            .is_empty());

        // t=11: both delays elapsed, but A's save (first in order) moves
        // `last_save` and suppresses B inside the same call.
        let events = ctl.on_chunk(&scores(&[("a", 0.1), ("b", 0.1)]), origin + secs(11.0));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].model, "a");

        // t=14.5: 3.5 s since A's save — B is still suppressed.
        assert!(ctl
            .on_chunk(&scores(&[("a", 0.1), ("b", 0.1)]), origin + secs(14.5))
            .is_empty());

        // t=15: cooldown over.  B fires immediately against its stale
        // first crossing — no second delay wait.
        let events = ctl.on_chunk(&scores(&[("a", 0.1), ("b", 0.1)]), origin + secs(15.0));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].model, "b");
    }

    #[test]
    fn zero_cooldown_lets_both_models_save_in_one_call() {
        let origin = Instant::now();
        let config = CaptureConfig {
            cooldown_secs: 0.0,
            ..CaptureConfig::default()
        };
        let mut ctl = CaptureController::with_origin(&config, origin);

        ctl.on_chunk(&scores(&[("a", 0.9), ("b", 0.9)]), origin + secs(10.0));
        let events = ctl.on_chunk(&scores(&[("a", 0.1), ("b", 0.1)]), origin + secs(11.0));

        let models: Vec<&str> = events.iter().map(|e| e.model.as_str()).collect();
        assert_eq!(models, vec!["a", "b"]);
    }

    #[test]
    fn at_most_one_event_per_model_per_call() {
        let origin = Instant::now();
        let config = CaptureConfig {
            cooldown_secs: 0.0,
            save_delay_secs: 0.0,
            ..CaptureConfig::default()
        };
        let mut ctl = CaptureController::with_origin(&config, origin);

        // Zero delay + zero cooldown: the save condition holds on the very
        // chunk that records the crossing — still exactly one event.
        let events = ctl.on_chunk(&scores(&[("m", 0.9)]), origin + secs(10.0));
        assert_eq!(events.len(), 1);
    }

    // ---- Clock edge cases --------------------------------------------------

    #[test]
    fn out_of_order_now_is_not_an_error() {
        let origin = Instant::now();
        let mut ctl = controller(origin);

        ctl.on_chunk(&scores(&[("m", 0.9)]), origin + secs(10.0));
        // Clock steps backwards: conditions cannot hold, nothing fires.
        assert!(ctl
            .on_chunk(&scores(&[("m", 0.1)]), origin + secs(5.0))
            .is_empty());
        // Clock recovers: the original crossing still governs the delay.
        let events = ctl.on_chunk(&scores(&[("m", 0.1)]), origin + secs(11.0));
        assert_eq!(events.len(), 1);
    }
}
