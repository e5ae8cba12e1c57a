//! Fixed-size bank of voices
//!
//! The bank is the only owner of the voices. Indices are stable
//! identities; out-of-range indices are silently ignored rather than
//! faulting, matching how the rest of the control path degrades.

use super::{Voice, Waveform};

/// Number of simultaneously-playing voices.
pub const VOICE_COUNT: usize = 4;

/// Fixed-capacity collection of voices
#[derive(Debug, Clone)]
pub struct VoiceBank {
    voices: [Voice; VOICE_COUNT],
}

impl VoiceBank {
    /// Create a bank of inactive voices.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: std::array::from_fn(|_| Voice::new(sample_rate)),
        }
    }

    /// Number of voice slots (always `VOICE_COUNT`).
    pub fn len(&self) -> usize {
        VOICE_COUNT
    }

    /// Always false; the bank is fixed-size and non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Start a note on the given voice. No-op if out of range.
    pub fn note_on(&mut self, index: usize, frequency: f32, amplitude: f32) {
        if let Some(voice) = self.voices.get_mut(index) {
            voice.note_on(frequency, amplitude);
        }
    }

    /// Stop the given voice. No-op if out of range.
    pub fn note_off(&mut self, index: usize) {
        if let Some(voice) = self.voices.get_mut(index) {
            voice.note_off();
        }
    }

    /// Set one voice's frequency. No-op if out of range.
    pub fn set_frequency(&mut self, index: usize, frequency: f32) {
        if let Some(voice) = self.voices.get_mut(index) {
            voice.set_frequency(frequency);
        }
    }

    /// Set one voice's amplitude. No-op if out of range.
    pub fn set_amplitude(&mut self, index: usize, amplitude: f32) {
        if let Some(voice) = self.voices.get_mut(index) {
            voice.set_amplitude(amplitude);
        }
    }

    /// Set one voice's waveform. No-op if out of range.
    pub fn set_waveform(&mut self, index: usize, waveform: Waveform) {
        if let Some(voice) = self.voices.get_mut(index) {
            voice.set_waveform(waveform);
        }
    }

    /// Give every voice the same waveform.
    pub fn set_waveform_all(&mut self, waveform: Waveform) {
        for voice in &mut self.voices {
            voice.set_waveform(waveform);
        }
    }

    /// Sum one sample from every voice. Inactive voices contribute
    /// exactly 0 and do not advance.
    pub fn mix_sample(&mut self) -> f32 {
        let mut mixed = 0.0;
        for voice in &mut self.voices {
            mixed += voice.next_sample();
        }
        mixed
    }

    /// Whether any voice is currently sounding.
    pub fn any_active(&self) -> bool {
        self.voices.iter().any(Voice::is_active)
    }

    /// Read access to one voice.
    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }
}
