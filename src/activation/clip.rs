//! Clip extraction — the boundary between a save decision and the WAV sink.
//!
//! Given a save event, the clip is the tail of the rolling audio buffer:
//! the last `clip_secs` of audio as it existed at extraction time (5 s ×
//! 16 000 Hz = 80 000 samples in the default configuration).  Right after
//! startup the buffer may hold less than a full clip; whatever is available
//! is saved as-is — shorter clips are expected, not an error, and nothing
//! is padded.

use crate::audio::RingBuffer;

/// Number of samples a clip of `clip_secs` seconds covers at `sample_rate`.
pub fn clip_samples(clip_secs: f32, sample_rate: u32) -> usize {
    (clip_secs * sample_rate as f32) as usize
}

/// Snapshot the most recent `samples` samples of `buffer`.
///
/// Returns `min(samples, buffer.len())` samples in chronological order;
/// the buffer itself is left untouched and keeps rolling.
pub fn extract(buffer: &RingBuffer<i16>, samples: usize) -> Vec<i16> {
    buffer.tail(samples)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
