//! Feedback tone controller
//!
//! A transient damped-volume sine used for UI confirmation beeps. While
//! active it fully replaces the mixed voice output; it terminates by
//! sample count and hands playback back on the next cycle.

use std::f32::consts::TAU;

/// Two-state override: `Normal` playback or an in-flight feedback tone.
#[derive(Debug, Clone)]
pub struct FeedbackTone {
    active: bool,
    frequency: f32,
    samples_remaining: u32,
    phase: f32,
    sample_rate: f32,
}

/// Hard ceiling on the beep amplitude, regardless of master volume.
const MAX_AMPLITUDE: f32 = 0.15;

impl FeedbackTone {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            active: false,
            frequency: 0.0,
            samples_remaining: 0,
            phase: 0.0,
            sample_rate,
        }
    }

    /// Start (or restart) a tone. A trigger while one is already
    /// playing resets the countdown and phase; tones never stack.
    pub fn trigger(&mut self, frequency: f32, duration_ms: u32) {
        self.active = true;
        self.frequency = frequency.max(0.0);
        // Integer math: duration_ms/1000 * sample_rate must come out
        // exact (10 ms at 44100 Hz is 441 samples, not 440.99).
        self.samples_remaining =
            (duration_ms as u64 * self.sample_rate as u64 / 1000) as u32;
        self.phase = 0.0;
    }

    /// Whether a tone is currently overriding playback.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Render one frame of the tone.
    ///
    /// The frame on which the countdown is exhausted transitions back
    /// to `Normal` and is silent, so the hand-off has no discontinuity.
    pub fn next_sample(&mut self, master_volume: f32) -> f32 {
        if self.samples_remaining == 0 {
            self.active = false;
            self.phase = 0.0;
            return 0.0;
        }

        let amplitude = (master_volume * 0.5).min(MAX_AMPLITUDE);
        let sample = self.phase.sin() * amplitude;

        self.phase += TAU * self.frequency / self.sample_rate;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        self.samples_remaining -= 1;

        sample
    }
}
