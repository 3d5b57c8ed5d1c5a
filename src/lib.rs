//! wake-capture — continuous wake-word activation capture.
//!
//! Listens to the microphone, scores each fixed-size audio chunk with a
//! wake-word scorer, and saves a short WAV clip of the most recent audio
//! whenever a model's score crosses the activation threshold.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → Chunker (mono / 16 kHz / i16 × 1280)
//!           → RingBuffer (last 5 s) → WakeScorer → CaptureController
//!           → SaveEvent → clip::extract → ClipSink (WAV)
//! ```
//!
//! The decision logic lives in [`activation::CaptureController`]: an
//! activation is only persisted after a short delay (so post-activation
//! audio context lands in the ring buffer) and never within the global
//! cooldown window of the previous save.

pub mod activation;
pub mod audio;
pub mod cli;
pub mod config;
pub mod detect;
pub mod persist;
pub mod pipeline;
