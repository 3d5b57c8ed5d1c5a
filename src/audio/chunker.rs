//! Fixed-size chunk assembly for the wake scorer.
//!
//! Scoring operates on fixed 1280-sample frames of 16 kHz mono `i16` audio
//! (80 ms per frame), while cpal delivers variable-length `f32` buffers at
//! the device's native rate and channel count.  [`Chunker`] bridges the two:
//! each incoming buffer is downmixed, resampled and quantised, and complete
//! frames are emitted as soon as enough samples have accumulated.  Remainder
//! samples carry over to the next call so frame boundaries are exact.

use super::resample::{resample, stereo_to_mono};

/// Convert a normalised `f32` sample in `[-1.0, 1.0]` to `i16` PCM.
///
/// Out-of-range input (possible after interpolation overshoot) is clamped
/// rather than wrapped.
pub fn quantize_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

// ---------------------------------------------------------------------------
// Chunker
// ---------------------------------------------------------------------------

/// Accumulates device audio into fixed-size scorer chunks.
///
/// # Example
///
/// ```rust
/// use wake_capture::audio::Chunker;
///
/// let mut chunker = Chunker::new(1_280, 16_000);
///
/// // One second of mono 16 kHz audio → exactly 12 full chunks,
/// // 640 samples held back for the next call.
/// let chunks = chunker.push(&vec![0.0_f32; 16_000], 16_000, 1);
/// assert_eq!(chunks.len(), 12);
/// assert_eq!(chunker.buffered(), 640);
/// ```
pub struct Chunker {
    chunk_samples: usize,
    target_rate: u32,
    /// Quantised samples waiting for a full chunk.
    pending: Vec<i16>,
}

impl Chunker {
    /// Create a chunker emitting `chunk_samples`-sized frames at
    /// `target_rate` Hz.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_samples == 0`.
    pub fn new(chunk_samples: usize, target_rate: u32) -> Self {
        assert!(chunk_samples > 0, "chunk_samples must be > 0");
        Self {
            chunk_samples,
            target_rate,
            pending: Vec::with_capacity(chunk_samples * 2),
        }
    }

    /// Feed one device buffer and collect every chunk it completes.
    ///
    /// `samples` are interleaved `f32` at `source_rate` Hz with `channels`
    /// channels, exactly as delivered by the cpal callback.  Returns zero or
    /// more complete chunks in arrival order; leftover samples are retained.
    pub fn push(&mut self, samples: &[f32], source_rate: u32, channels: u16) -> Vec<Vec<i16>> {
        let mono = stereo_to_mono(samples, channels);
        let at_rate = resample(&mono, source_rate, self.target_rate);

        self.pending.extend(at_rate.iter().copied().map(quantize_i16));

        let mut chunks = Vec::new();
        while self.pending.len() >= self.chunk_samples {
            let rest = self.pending.split_off(self.chunk_samples);
            chunks.push(std::mem::replace(&mut self.pending, rest));
        }
        chunks
    }

    /// Number of samples currently held back waiting for a full chunk.
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    /// Size of the emitted chunks in samples.
    pub fn chunk_samples(&self) -> usize {
        self.chunk_samples
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
