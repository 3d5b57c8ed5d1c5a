//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// CaptureConfig
// ---------------------------------------------------------------------------

/// Settings for the activation-to-clip capture policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Score threshold for an activation (0.0 – 1.0); a chunk whose score
    /// meets or exceeds this value counts as a threshold crossing.
    pub threshold: f32,
    /// Minimum seconds between any two saved clips, regardless of which
    /// model triggered them.
    pub cooldown_secs: f32,
    /// Seconds to wait after the first threshold crossing before the clip
    /// is saved, so audio context after the activation lands in the buffer.
    pub save_delay_secs: f32,
    /// Length of the saved clip in seconds (tail of the rolling buffer).
    pub clip_secs: f32,
    /// Directory activation clips are written to.
    pub output_dir: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            cooldown_secs: 4.0,
            save_delay_secs: 1.0,
            clip_secs: 5.0,
            output_dir: PathBuf::from("."),
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for the audio front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate the scorer expects, in Hz (must be 16 000).
    pub sample_rate: u32,
    /// Fixed chunk size fed to the scorer, in samples.  1280 samples at
    /// 16 kHz is 80 ms — one scorer frame.
    pub chunk_samples: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            chunk_samples: 1_280,
        }
    }
}

// ---------------------------------------------------------------------------
// DetectorConfig
// ---------------------------------------------------------------------------

/// Settings for the built-in energy-spike scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Model name reported in score maps and clip filenames.
    pub model_name: String,
    /// Energy ratio over the rolling baseline that maps to a full-confidence
    /// score.  Lower values make the scorer more sensitive.
    pub spike_ratio: f32,
    /// RMS floor below which a chunk is never scored as an activation,
    /// keeping idle-room noise from producing spurious spikes.
    pub rms_floor: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_name: "energy".into(),
            spike_ratio: 3.0,
            rms_floor: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use wake_capture::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Capture policy settings.
    pub capture: CaptureConfig,
    /// Audio front-end settings.
    pub audio: AudioConfig,
    /// Built-in scorer settings.
    pub detector: DetectorConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Number of samples a saved clip covers (`clip_secs × sample_rate`).
    pub fn clip_samples(&self) -> usize {
        (self.capture.clip_secs * self.audio.sample_rate as f32) as usize
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
