//! Audio front-end — microphone capture → chunking → rolling buffer.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → Chunker
//!           → fixed i16 chunks (16 kHz mono) → RingBuffer / WakeScorer
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::mpsc;
//! use wake_capture::audio::{AudioCapture, AudioChunk, Chunker};
//!
//! let (tx, rx) = mpsc::channel::<AudioChunk>();
//! let capture = AudioCapture::new().unwrap();
//! let _handle = capture.start(tx).unwrap(); // drop handle → stop stream
//!
//! let mut chunker = Chunker::new(1_280, 16_000);
//! while let Ok(chunk) = rx.recv() {
//!     for frame in chunker.push(&chunk.samples, chunk.sample_rate, chunk.channels) {
//!         println!("scorer frame: {} samples", frame.len());
//!     }
//! }
//! ```

pub mod buffer;
pub mod capture;
pub mod chunker;
pub mod resample;

pub use buffer::RingBuffer;
pub use capture::{AudioCapture, AudioChunk, CaptureError, StreamHandle};
pub use chunker::{quantize_i16, Chunker};
pub use resample::{resample, stereo_to_mono};
