//! Synthesis core
//!
//! Waveform generators, the voice bank, and the feedback tone override.

mod bank;
mod feedback;
mod voice;
mod waveform;

pub use bank::{VoiceBank, VOICE_COUNT};
pub use feedback::FeedbackTone;
pub use voice::Voice;
pub use waveform::{Waveform, WAVEFORM_MODES};
