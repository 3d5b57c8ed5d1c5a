//! Clip persistence — WAV encoding and output naming.
//!
//! [`ClipSink`] is the boundary the capture loop writes through; the
//! production implementation is [`WavClipSink`], which encodes mono 16-bit
//! PCM via `hound`.  A failed write loses one clip, never the capture loop
//! — the runner logs the error and keeps listening.

use std::path::Path;

use chrono::{DateTime, Local};
use thiserror::Error;

// ---------------------------------------------------------------------------
// PersistError
// ---------------------------------------------------------------------------

/// Errors that can occur while writing a clip to disk.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("WAV write failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("clip I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// ClipSink trait
// ---------------------------------------------------------------------------

/// Object-safe interface for clip writers.
///
/// # Contract
///
/// - `samples` are mono `i16` PCM at `sample_rate` Hz.
/// - A short sample slice (buffer not yet full at save time) is written
///   as-is.
/// - Failures are reported to the caller; implementations must not panic
///   on filesystem errors.
pub trait ClipSink: Send {
    /// Write `samples` as a single-channel PCM file at `path`.
    fn write(&self, path: &Path, sample_rate: u32, samples: &[i16]) -> Result<(), PersistError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn ClipSink>) {}
};

// ---------------------------------------------------------------------------
// WavClipSink
// ---------------------------------------------------------------------------

/// Writes clips as 16-bit mono WAV files via `hound`.
pub struct WavClipSink;

impl ClipSink for WavClipSink {
    fn write(&self, path: &Path, sample_rate: u32, samples: &[i16]) -> Result<(), PersistError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// Filename for a clip detected at `at` by `model`:
/// `{%Y_%m_%d_%H_%M_%S}_{model}.wav`.
pub fn clip_filename(model: &str, at: DateTime<Local>) -> String {
    format!("{}_{}.wav", at.format("%Y_%m_%d_%H_%M_%S"), model)
}

// ---------------------------------------------------------------------------
// MockSink  (test-only)
// ---------------------------------------------------------------------------

/// A test double that records every write, optionally failing each call.
#[cfg(test)]
pub struct MockSink {
    /// Recorded `(path, sample_rate, sample_count)` per write call.
    pub calls: std::sync::Arc<std::sync::Mutex<Vec<(std::path::PathBuf, u32, usize)>>>,
    fail: bool,
}

#[cfg(test)]
impl MockSink {
    pub fn new() -> Self {
        Self {
            calls: Default::default(),
            fail: false,
        }
    }

    /// A sink whose every write fails with an I/O error.
    pub fn failing() -> Self {
        Self {
            calls: Default::default(),
            fail: true,
        }
    }
}

#[cfg(test)]
impl ClipSink for MockSink {
    fn write(&self, path: &Path, sample_rate: u32, samples: &[i16]) -> Result<(), PersistError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), sample_rate, samples.len()));
        if self.fail {
            return Err(PersistError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "mock sink failure",
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
