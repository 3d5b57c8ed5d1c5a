//! Activation capture core — save decisions and clip extraction.
//!
//! [`CaptureController`] decides *when* to save (debounce + cooldown over
//! per-chunk scores); [`clip`] decides *what* to save (the tail of the
//! rolling audio buffer).  Neither touches the filesystem.

pub mod clip;
pub mod controller;

pub use controller::{CaptureController, SaveEvent};
