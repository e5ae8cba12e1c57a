//! Logarithmic control-to-frequency mapping
//!
//! Pitch perception is logarithmic, so the knob maps exponentially:
//! equal knob travel gives equal pitch intervals. Dead zones at both
//! rails snap to the exact endpoint frequencies, compensating for ADC
//! non-linearity and filter lag near the limits.

/// Maps a filtered control value onto a frequency range.
///
/// Formula inside the live span: `min_freq * (max_freq/min_freq)^t`
/// with `t = control / control_max`.
#[derive(Debug, Clone)]
pub struct LogMap {
    control_max: u16,
    min_freq: f32,
    max_freq: f32,
    dead_zone_low: u16,
    dead_zone_high: u16,
}

impl LogMap {
    /// Create a mapper with symmetric or asymmetric dead zones.
    ///
    /// `min_freq` is forced positive; a zero floor would stall the
    /// phase accumulators downstream.
    pub fn new(
        control_max: u16,
        min_freq: f32,
        max_freq: f32,
        dead_zone_low: u16,
        dead_zone_high: u16,
    ) -> Self {
        let min_freq = min_freq.max(0.001);
        Self {
            control_max,
            min_freq,
            max_freq: max_freq.max(min_freq),
            dead_zone_low,
            dead_zone_high,
        }
    }

    /// Map a control value to a frequency in Hz.
    pub fn map(&self, control: u16) -> f32 {
        let control = control.min(self.control_max);

        if control <= self.dead_zone_low {
            return self.min_freq;
        }
        if control >= self.control_max.saturating_sub(self.dead_zone_high) {
            return self.max_freq;
        }

        let t = control as f32 / self.control_max as f32;
        let ratio = self.max_freq / self.min_freq;
        self.min_freq * ratio.powf(t)
    }

    /// Same map against a different ceiling, keeping the dead zones.
    /// Used for the noise mode's lower spectral ceiling.
    pub fn with_max_freq(&self, max_freq: f32) -> Self {
        Self {
            max_freq: max_freq.max(self.min_freq),
            ..self.clone()
        }
    }

    pub fn min_freq(&self) -> f32 {
        self.min_freq
    }

    pub fn max_freq(&self) -> f32 {
        self.max_freq
    }
}
