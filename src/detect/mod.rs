//! Wake-word scoring seam.
//!
//! The pipeline treats scoring as an opaque function from audio chunk to a
//! per-model score map; [`WakeScorer`] is that boundary.  [`EnergyScorer`]
//! is the built-in implementation.

pub mod scorer;

pub use scorer::{EnergyScorer, Scores, WakeScorer};

#[cfg(test)]
pub use scorer::MockScorer;
