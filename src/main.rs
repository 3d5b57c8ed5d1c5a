//! Application entry point — wake-capture.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse CLI arguments and load [`AppConfig`] from disk (defaults on
//!    first run); CLI flags override file values.
//! 3. Create the output directory.
//! 4. Open the input device and start the cpal stream.
//! 5. Spawn the chunker thread (device buffers → fixed 16 kHz i16 chunks).
//! 6. Run the capture loop on the main thread until the stream ends.

use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;

use wake_capture::{
    audio::{AudioCapture, AudioChunk, Chunker},
    cli::Cli,
    config::AppConfig,
    detect::EnergyScorer,
    persist::WavClipSink,
    pipeline::CaptureLoop,
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. CLI + configuration
    let cli = Cli::parse();

    let mut config = match &cli.config {
        // An explicitly requested settings file must load cleanly.
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    cli.apply(&mut config);

    // 3. Output directory
    std::fs::create_dir_all(&config.capture.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.capture.output_dir.display()
        )
    })?;

    // 4. Input device
    let capture = AudioCapture::with_device(cli.device.as_deref())?;
    log::info!(
        "input device ready ({} Hz, {} ch)",
        capture.sample_rate(),
        capture.channels()
    );

    let (raw_tx, raw_rx) = mpsc::channel::<AudioChunk>();
    let (chunk_tx, chunk_rx) = mpsc::channel::<Vec<i16>>();

    // 5. Chunker thread — device buffers in, fixed scorer chunks out.
    let chunk_samples = config.audio.chunk_samples;
    let target_rate = config.audio.sample_rate;
    std::thread::Builder::new()
        .name("audio-chunker".into())
        .spawn(move || {
            let mut chunker = Chunker::new(chunk_samples, target_rate);
            while let Ok(raw) = raw_rx.recv() {
                for frame in chunker.push(&raw.samples, raw.sample_rate, raw.channels) {
                    if chunk_tx.send(frame).is_err() {
                        return; // capture loop gone — shut the thread down
                    }
                }
            }
        })
        .context("failed to spawn audio-chunker thread")?;

    let _stream = capture.start(raw_tx)?;
    log::info!("audio capture started");

    // 6. Capture loop (runs until the chunk channel closes)
    let scorer = EnergyScorer::from_config(&config.detector);
    let mut capture_loop = CaptureLoop::new(&config, Box::new(scorer), Box::new(WavClipSink));
    capture_loop.run(chunk_rx);

    Ok(())
}
