//! Command-line interface.
//!
//! Mirrors the capture tool's minimal surface: a required output directory
//! plus optional overrides for the values that change between runs.  CLI
//! flags win over `settings.toml`.

use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Continuous wake-word capture: listens on the microphone and saves a
/// short WAV clip whenever a detection score crosses the threshold.
#[derive(Parser, Debug)]
#[command(name = "wake-capture", version)]
pub struct Cli {
    /// Where to save the audio that resulted in an activation.
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// The score threshold for an activation (overrides settings.toml).
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Input device name; the system default device when omitted.
    #[arg(long)]
    pub device: Option<String>,

    /// Explicit settings file; the platform config dir when omitted.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Fold CLI overrides into a loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        config.capture.output_dir = self.output_dir.clone();
        if let Some(threshold) = self.threshold {
            config.capture.threshold = threshold;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
