//! Chirp - pocket polyphonic synthesizer engine
//!
//! A small real-time synth: a fixed bank of oscillator voices driven
//! by two knobs and a waveform menu, mixed into interleaved 16-bit
//! stereo buffers and paced by a blocking output sink. Feedback beeps
//! temporarily override playback for UI confirmation cues.

pub mod config;
pub mod control;
pub mod engine;
pub mod mapping;
pub mod synth;

pub use config::ChirpConfig;
pub use engine::Engine;
