//! Waveform generators
//!
//! Pure phase-to-sample functions for the fixed waveform set.
//! Phase is in [0, 2π); output is in [-1.0, 1.0].

use rand::Rng;
use std::f32::consts::PI;

/// Waveform types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Saw,
    /// White noise (uniform random, phase is ignored)
    Noise,
}

/// Menu order of the waveform modes.
pub const WAVEFORM_MODES: [Waveform; 5] = [
    Waveform::Sine,
    Waveform::Triangle,
    Waveform::Square,
    Waveform::Saw,
    Waveform::Noise,
];

impl Waveform {
    /// Compute the sample for the given phase.
    ///
    /// The generators hold no state, so a single `Waveform` value is
    /// safely shared across every voice at once. Noise draws from the
    /// thread RNG and ignores the phase entirely.
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Triangle => {
                if phase < PI {
                    // Rising: -1 -> 1
                    -1.0 + (2.0 * phase / PI)
                } else {
                    // Falling: 1 -> -1
                    3.0 - (2.0 * phase / PI)
                }
            }
            Waveform::Square => {
                if phase < PI {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => -1.0 + (phase / PI),
            Waveform::Noise => rand::thread_rng().gen_range(-1.0..=1.0),
        }
    }

    /// Look up a waveform by menu index. Out-of-range indices map to
    /// `None` so a bad mode selection degrades to silence.
    pub fn from_mode_index(index: usize) -> Option<Waveform> {
        WAVEFORM_MODES.get(index).copied()
    }

    /// Parse a waveform from its lowercase name.
    pub fn from_name(name: &str) -> Option<Waveform> {
        match name.to_ascii_lowercase().as_str() {
            "sine" => Some(Waveform::Sine),
            "triangle" => Some(Waveform::Triangle),
            "square" => Some(Waveform::Square),
            "saw" | "sawtooth" => Some(Waveform::Saw),
            "noise" => Some(Waveform::Noise),
            _ => None,
        }
    }

    /// Position of this waveform in the menu order.
    pub fn mode_index(self) -> usize {
        WAVEFORM_MODES
            .iter()
            .position(|&w| w == self)
            .unwrap_or(0)
    }

    /// Display name, as shown on the menu.
    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "SINE",
            Waveform::Triangle => "TRIANGLE",
            Waveform::Square => "SQUARE",
            Waveform::Saw => "SAW",
            Waveform::Noise => "NOISE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PI: f32 = 2.0 * PI;

    #[test]
    fn test_sine_key_phases() {
        assert!((Waveform::Sine.sample(0.0)).abs() < 1e-6);
        assert!((Waveform::Sine.sample(PI / 2.0) - 1.0).abs() < 1e-6);
        assert!(Waveform::Sine.sample(PI).abs() < 1e-5);
        assert!((Waveform::Sine.sample(3.0 * PI / 2.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_ramps() {
        assert!((Waveform::Triangle.sample(0.0) + 1.0).abs() < 1e-6);
        assert!((Waveform::Triangle.sample(PI / 2.0)).abs() < 1e-6);
        assert!((Waveform::Triangle.sample(PI) - 1.0).abs() < 1e-5);
        assert!((Waveform::Triangle.sample(3.0 * PI / 2.0)).abs() < 1e-5);
        // Just before wrap it returns to -1
        let near_end = Waveform::Triangle.sample(TWO_PI - 1e-4);
        assert!((near_end + 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_square_duty_cycle() {
        assert_eq!(Waveform::Square.sample(0.0), 1.0);
        assert_eq!(Waveform::Square.sample(PI - 1e-4), 1.0);
        assert_eq!(Waveform::Square.sample(PI), -1.0);
        assert_eq!(Waveform::Square.sample(TWO_PI - 1e-4), -1.0);
    }

    #[test]
    fn test_saw_full_cycle_ramp() {
        assert!((Waveform::Saw.sample(0.0) + 1.0).abs() < 1e-6);
        assert!(Waveform::Saw.sample(PI).abs() < 1e-5);
        let near_end = Waveform::Saw.sample(TWO_PI - 1e-4);
        assert!((near_end - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_noise_range_and_mean() {
        let mut sum = 0.0f64;
        for _ in 0..1000 {
            let s = Waveform::Noise.sample(0.0);
            assert!((-1.0..=1.0).contains(&s), "sample out of range: {}", s);
            sum += s as f64;
        }
        let mean = sum / 1000.0;
        assert!(mean.abs() < 0.1, "mean too far from 0: {}", mean);
    }

    #[test]
    fn test_all_waveforms_bounded() {
        for wf in WAVEFORM_MODES {
            for i in 0..64 {
                let phase = TWO_PI * i as f32 / 64.0;
                let s = wf.sample(phase);
                assert!(
                    (-1.0..=1.0).contains(&s),
                    "{:?} out of range at phase {}: {}",
                    wf,
                    phase,
                    s
                );
            }
        }
    }

    #[test]
    fn test_mode_index_lookup() {
        assert_eq!(Waveform::from_mode_index(0), Some(Waveform::Sine));
        assert_eq!(Waveform::from_mode_index(4), Some(Waveform::Noise));
        assert_eq!(Waveform::from_mode_index(5), None);
    }

    #[test]
    fn test_name_round_trip() {
        for wf in WAVEFORM_MODES {
            assert_eq!(Waveform::from_name(wf.name()), Some(wf));
        }
        assert_eq!(Waveform::from_name("sawtooth"), Some(Waveform::Saw));
        assert_eq!(Waveform::from_name("dc"), None);
    }
}
