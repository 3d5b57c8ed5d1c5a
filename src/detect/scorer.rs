//! Wake scorer trait and implementations.
//!
//! # Overview
//!
//! [`WakeScorer`] is the seam between the capture pipeline and whatever
//! produces per-model detection scores.  It is object-safe and `Send` so a
//! boxed scorer can be moved onto the capture thread.
//!
//! [`EnergyScorer`] is the built-in implementation: an energy-spike
//! heuristic over a rolling baseline.  It stands in for a real wake-word
//! model — the pipeline only ever sees the score map, so swapping in a
//! neural scorer is a matter of implementing this trait.
//!
//! [`MockScorer`] (available under `#[cfg(test)]`) replays a scripted score
//! sequence — useful for unit-testing the capture loop deterministically.

use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Per-chunk detection scores, keyed by model name.
///
/// Scores are in `[0.0, 1.0]`.  A `BTreeMap` keeps iteration order stable,
/// which makes multi-model save ordering deterministic.
pub type Scores = BTreeMap<String, f32>;

// ---------------------------------------------------------------------------
// WakeScorer trait
// ---------------------------------------------------------------------------

/// Object-safe interface for wake-word scorers.
///
/// # Contract
///
/// - `chunk` is **16 kHz mono `i16`** PCM, one fixed-size frame (1280
///   samples in the default configuration).
/// - Every call returns a score for **every** model the scorer knows about,
///   even when the score is `0.0` — the capture controller evaluates each
///   model present in the map.
/// - Scorers may keep internal rolling state across calls (`&mut self`).
pub trait WakeScorer: Send {
    /// Score one audio chunk.
    fn score(&mut self, chunk: &[i16]) -> Scores;
}

// Compile-time assertion: Box<dyn WakeScorer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn WakeScorer>) {}
};

// ---------------------------------------------------------------------------
// EnergyScorer
// ---------------------------------------------------------------------------

/// Energy-spike scorer: a sudden rise in RMS energy over the rolling
/// baseline maps to a detection score.
///
/// The baseline is an exponential moving average of per-chunk RMS.  A chunk
/// scores above zero only when the baseline sits above `rms_floor` (so a
/// silent room never triggers) and the chunk's RMS exceeds
/// `baseline × spike_ratio`.  The excess ratio is normalised into `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use wake_capture::detect::{EnergyScorer, WakeScorer};
///
/// let mut scorer = EnergyScorer::new("energy", 3.0, 100.0);
/// let quiet = vec![0i16; 1_280];
/// assert_eq!(scorer.score(&quiet)["energy"], 0.0);
/// ```
pub struct EnergyScorer {
    /// Model name reported in the score map.
    name: String,
    /// Energy ratio over baseline that counts as a spike.
    spike_ratio: f32,
    /// Baseline floor below which nothing is scored.
    rms_floor: f32,
    /// Smoothed RMS baseline.
    prev_energy: f32,
}

impl EnergyScorer {
    /// Create a scorer reporting under `name`.
    pub fn new(name: impl Into<String>, spike_ratio: f32, rms_floor: f32) -> Self {
        Self {
            name: name.into(),
            spike_ratio,
            rms_floor,
            prev_energy: 0.0,
        }
    }

    /// Build from the detector section of the application config.
    pub fn from_config(config: &crate::config::DetectorConfig) -> Self {
        Self::new(
            config.model_name.clone(),
            config.spike_ratio,
            config.rms_floor,
        )
    }

    /// Reset the rolling baseline (e.g. after a device change).
    pub fn reset(&mut self) {
        self.prev_energy = 0.0;
    }

    fn rms(chunk: &[i16]) -> f32 {
        if chunk.is_empty() {
            return 0.0;
        }
        let mean_sq: f32 = chunk
            .iter()
            .map(|&s| {
                let s = s as f32;
                s * s
            })
            .sum::<f32>()
            / chunk.len() as f32;
        mean_sq.sqrt()
    }
}

impl WakeScorer for EnergyScorer {
    fn score(&mut self, chunk: &[i16]) -> Scores {
        let rms = Self::rms(chunk);

        let score = if self.prev_energy > self.rms_floor && rms > self.prev_energy * self.spike_ratio
        {
            let ratio = rms / self.prev_energy;
            ((ratio - self.spike_ratio) / self.spike_ratio).clamp(0.0, 1.0)
        } else {
            0.0
        };

        // Exponential moving average for the baseline.
        self.prev_energy = self.prev_energy * 0.9 + rms * 0.1;

        let mut scores = Scores::new();
        scores.insert(self.name.clone(), score);
        scores
    }
}

// ---------------------------------------------------------------------------
// MockScorer  (test-only)
// ---------------------------------------------------------------------------

/// A test double that replays a scripted score sequence for a single model,
/// returning `0.0` once the script is exhausted.
#[cfg(test)]
pub struct MockScorer {
    model: String,
    script: std::collections::VecDeque<f32>,
}

#[cfg(test)]
impl MockScorer {
    /// Create a mock for `model` that emits `script` scores in order.
    pub fn new(model: impl Into<String>, script: &[f32]) -> Self {
        Self {
            model: model.into(),
            script: script.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl WakeScorer for MockScorer {
    fn score(&mut self, _chunk: &[i16]) -> Scores {
        let score = self.script.pop_front().unwrap_or(0.0);
        let mut scores = Scores::new();
        scores.insert(self.model.clone(), score);
        scores
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
