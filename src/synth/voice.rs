//! A single polyphonic voice
//!
//! Each voice owns a phase accumulator and renders one oscillator.
//! Parameter changes never touch the phase, which is what keeps
//! knob-driven pitch and timbre sweeps free of clicks.

use super::Waveform;
use std::f32::consts::TAU;

/// One oscillator voice
#[derive(Debug, Clone)]
pub struct Voice {
    waveform: Option<Waveform>,
    frequency: f32,
    amplitude: f32,
    phase: f32,
    phase_increment: f32,
    active: bool,
    sample_rate: f32,
}

impl Voice {
    /// Create an inactive voice.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            waveform: None,
            frequency: 0.0,
            amplitude: 0.0,
            phase: 0.0,
            phase_increment: 0.0,
            active: false,
            sample_rate,
        }
    }

    /// Start a note: reset phase, set frequency and amplitude, activate.
    pub fn note_on(&mut self, frequency: f32, amplitude: f32) {
        self.phase = 0.0;
        self.frequency = frequency.max(0.0);
        self.amplitude = amplitude.clamp(0.0, 1.0);
        self.active = true;
        self.update_phase_increment();
    }

    /// Stop the note. Phase and frequency are kept so a later
    /// `note_on` resumes cleanly.
    pub fn note_off(&mut self) {
        self.active = false;
    }

    /// Change frequency without resetting phase.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.max(0.0);
        self.update_phase_increment();
    }

    /// Change waveform without resetting phase.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = Some(waveform);
    }

    /// Change amplitude without resetting phase.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude.clamp(0.0, 1.0);
    }

    /// Whether the voice is currently sounding.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current phase in [0, 2π). Exposed for tests and diagnostics.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Render one sample and advance the phase.
    ///
    /// An inactive or waveform-less voice returns 0.0 and does not
    /// advance, so repeated calls on a silent voice are idempotent.
    pub fn next_sample(&mut self) -> f32 {
        let waveform = match (self.active, self.waveform) {
            (true, Some(wf)) => wf,
            _ => return 0.0,
        };

        let sample = waveform.sample(self.phase) * self.amplitude;

        // Single conditional wrap; the increment is always well below
        // 2π at supported frequencies.
        self.phase += self.phase_increment;
        if self.phase >= TAU {
            self.phase -= TAU;
        }

        sample
    }

    fn update_phase_increment(&mut self) {
        self.phase_increment = TAU * self.frequency / self.sample_rate;
    }
}
