//! Capture loop — drives chunk scoring, save decisions and clip writes.
//!
//! [`CaptureLoop`] owns the rolling audio buffer, the scorer, the
//! [`CaptureController`] and the clip sink.  The loop is a single logical
//! thread of control: one chunk is buffered, scored and evaluated before
//! the next is taken.
//!
//! # Flow per chunk
//!
//! ```text
//! chunk ─▶ RingBuffer.push ─▶ WakeScorer.score ─▶ CaptureController.on_chunk
//!                                   │                       │
//!                                   └── rolling state ──────┴─▶ SaveEvent*
//!                                                               └─▶ clip::extract ─▶ ClipSink.write
//! ```
//!
//! A failed clip write is logged and skipped — losing one clip must not
//! stop detection.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

use chrono::Local;

use crate::activation::{clip, CaptureController};
use crate::audio::RingBuffer;
use crate::config::AppConfig;
use crate::detect::WakeScorer;
use crate::persist::{clip_filename, ClipSink};

// ---------------------------------------------------------------------------
// CaptureLoop
// ---------------------------------------------------------------------------

/// Drives the complete activation-capture pipeline.
///
/// Create with [`CaptureLoop::new`], then either call
/// [`run`](Self::run) with the chunk channel, or feed chunks directly via
/// [`process_chunk`](Self::process_chunk) (used by tests to inject time).
pub struct CaptureLoop {
    controller: CaptureController,
    scorer: Box<dyn WakeScorer>,
    sink: Box<dyn ClipSink>,
    /// Rolling buffer holding the last `clip_secs` of audio.
    ring: RingBuffer<i16>,
    output_dir: PathBuf,
    clip_len: usize,
    sample_rate: u32,
}

impl CaptureLoop {
    /// Build a capture loop from the application config and its two
    /// collaborators.
    ///
    /// The controller's cooldown clock starts now: the first clip cannot be
    /// saved until one full cooldown after startup.
    pub fn new(config: &AppConfig, scorer: Box<dyn WakeScorer>, sink: Box<dyn ClipSink>) -> Self {
        let clip_len = config.clip_samples();

        Self {
            controller: CaptureController::new(&config.capture),
            scorer,
            sink,
            // A degenerate zero-length clip config still needs a live buffer.
            ring: RingBuffer::new(clip_len.max(1)),
            output_dir: config.capture.output_dir.clone(),
            clip_len,
            sample_rate: config.audio.sample_rate,
        }
    }

    /// Process one fixed-size chunk at time `now`.
    ///
    /// Returns the number of clips successfully written (0 on quiet chunks;
    /// failed writes are logged and not counted).
    pub fn process_chunk(&mut self, chunk: &[i16], now: Instant) -> usize {
        self.ring.push_slice(chunk);

        let scores = self.scorer.score(chunk);
        let events = self.controller.on_chunk(&scores, now);

        let mut saved = 0;
        for event in &events {
            let detected_at = Local::now();
            log::info!(
                "activation from {:?} model at {}",
                event.model,
                detected_at.format("%Y-%m-%d %H:%M:%S")
            );

            let samples = clip::extract(&self.ring, self.clip_len);
            let path = self
                .output_dir
                .join(clip_filename(&event.model, detected_at));

            match self.sink.write(&path, self.sample_rate, &samples) {
                Ok(()) => {
                    log::info!(
                        "saved {:.2}s clip to {}",
                        samples.len() as f32 / self.sample_rate as f32,
                        path.display()
                    );
                    saved += 1;
                }
                Err(e) => {
                    // Losing one clip must not stop detection.
                    log::warn!("failed to save clip {}: {e}", path.display());
                }
            }
        }
        saved
    }

    /// Drain `chunks` until the sending side closes.
    ///
    /// Each received chunk is stamped with the wall-clock arrival instant.
    /// Returns the total number of clips written.
    pub fn run(&mut self, chunks: mpsc::Receiver<Vec<i16>>) -> usize {
        log::info!("listening for wake words");

        let mut total = 0;
        while let Ok(chunk) = chunks.recv() {
            total += self.process_chunk(&chunk, Instant::now());
        }

        log::info!("audio channel closed, capture loop exiting ({total} clips saved)");
        total
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
