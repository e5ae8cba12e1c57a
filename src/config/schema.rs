//! Configuration schema definitions

use crate::synth::VOICE_COUNT;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for Chirp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChirpConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Control input (knob) settings
    #[serde(default)]
    pub controls: ControlsConfig,

    /// Master mix settings
    #[serde(default)]
    pub master: MasterConfig,
}

impl Default for ChirpConfig {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            controls: ControlsConfig::default(),
            master: MasterConfig::default(),
        }
    }
}

impl ChirpConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.buffer_size < 64 || self.audio.buffer_size > 8192 {
            bail!("Buffer size must be between 64 and 8192 frames");
        }

        if self.controls.min_freq <= 0.0 {
            bail!("Minimum frequency must be positive");
        }
        if self.controls.max_freq <= self.controls.min_freq {
            bail!("Maximum frequency must be above the minimum");
        }
        if self.controls.noise_max_freq < self.controls.min_freq {
            bail!("Noise frequency ceiling must be at or above the minimum");
        }
        let dead_zones =
            self.controls.dead_zone_low as u32 + self.controls.dead_zone_high as u32;
        if dead_zones >= self.controls.control_max as u32 {
            bail!("Dead zones cover the whole control range");
        }

        if self.master.output_scale <= 0.0 || self.master.output_scale > 1.0 {
            bail!("Output scale must be in (0.0, 1.0]");
        }
        if self.master.note_amplitude < 0.0 || self.master.note_amplitude > 1.0 {
            bail!("Note amplitude must be between 0.0 and 1.0");
        }
        if self.master.harmonic_ratios.is_empty() {
            bail!("At least one harmonic ratio is required");
        }
        if self.master.harmonic_ratios.len() > VOICE_COUNT {
            bail!(
                "At most {} harmonic ratios are supported",
                VOICE_COUNT
            );
        }
        if self.master.harmonic_ratios.iter().any(|&r| r <= 0.0) {
            bail!("Harmonic ratios must be positive");
        }

        Ok(())
    }
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Buffer size in frames per cycle (default: 256)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Output device name (None = default device)
    #[serde(default)]
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
            device: None,
        }
    }
}

fn default_sample_rate() -> u32 {
    44100
}
fn default_buffer_size() -> usize {
    256
}

/// Control input configuration
///
/// The knobs arrive as already-filtered integer readings in
/// `0..=control_max`, like a 12-bit ADC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Top of the control value range (default: 4095)
    #[serde(default = "default_control_max")]
    pub control_max: u16,

    /// Dead zone at the low rail, in control units (default: 50)
    #[serde(default = "default_dead_zone_low")]
    pub dead_zone_low: u16,

    /// Dead zone at the high rail, in control units (default: 150)
    #[serde(default = "default_dead_zone_high")]
    pub dead_zone_high: u16,

    /// Lowest pitch in Hz (default: 20)
    #[serde(default = "default_min_freq")]
    pub min_freq: f32,

    /// Highest pitch for tonal modes in Hz (default: 20000)
    #[serde(default = "default_max_freq")]
    pub max_freq: f32,

    /// Highest ceiling for noise mode in Hz (default: 5000).
    ///
    /// Noise has no periodicity; its "pitch" sets a spectral ceiling,
    /// and a lower one keeps the texture audible without harshness.
    #[serde(default = "default_noise_max_freq")]
    pub noise_max_freq: f32,

    /// Seconds of menu inactivity before returning to playing
    /// (default: 10)
    #[serde(default = "default_menu_timeout_secs")]
    pub menu_timeout_secs: u64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            control_max: default_control_max(),
            dead_zone_low: default_dead_zone_low(),
            dead_zone_high: default_dead_zone_high(),
            min_freq: default_min_freq(),
            max_freq: default_max_freq(),
            noise_max_freq: default_noise_max_freq(),
            menu_timeout_secs: default_menu_timeout_secs(),
        }
    }
}

fn default_control_max() -> u16 {
    4095
}
fn default_dead_zone_low() -> u16 {
    50
}
fn default_dead_zone_high() -> u16 {
    150
}
fn default_min_freq() -> f32 {
    20.0
}
fn default_max_freq() -> f32 {
    20000.0
}
fn default_noise_max_freq() -> f32 {
    5000.0
}
fn default_menu_timeout_secs() -> u64 {
    10
}

/// Master mix configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Scale applied to the tone knob's volume fraction, keeping the
    /// output at a safe listening level (default: 0.1)
    #[serde(default = "default_output_scale")]
    pub output_scale: f32,

    /// Per-voice amplitude used when notes start (default: 0.5)
    #[serde(default = "default_note_amplitude")]
    pub note_amplitude: f32,

    /// Frequency ratios of the sounding voices relative to the mapped
    /// base pitch (default: unison plus a major third and a fifth)
    #[serde(default = "default_harmonic_ratios")]
    pub harmonic_ratios: Vec<f32>,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            output_scale: default_output_scale(),
            note_amplitude: default_note_amplitude(),
            harmonic_ratios: default_harmonic_ratios(),
        }
    }
}

fn default_output_scale() -> f32 {
    0.1
}
fn default_note_amplitude() -> f32 {
    0.5
}
fn default_harmonic_ratios() -> Vec<f32> {
    vec![1.0, 1.25, 1.5]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ChirpConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.controls.control_max, 4095);
        assert_eq!(config.master.harmonic_ratios, vec![1.0, 1.25, 1.5]);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "audio:\n  sample_rate: 48000\n";
        let config: ChirpConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.audio.sample_rate, 48000);
        assert_eq!(config.audio.buffer_size, 256);
        assert_eq!(config.controls.min_freq, 20.0);
    }

    #[test]
    fn test_zero_min_freq_rejected() {
        let mut config = ChirpConfig::default();
        config.controls.min_freq = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_freq_range_rejected() {
        let mut config = ChirpConfig::default();
        config.controls.min_freq = 2000.0;
        config.controls.max_freq = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_too_many_ratios_rejected() {
        let mut config = ChirpConfig::default();
        config.master.harmonic_ratios = vec![1.0; VOICE_COUNT + 1];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dead_zones_covering_range_rejected() {
        let mut config = ChirpConfig::default();
        config.controls.dead_zone_low = 2048;
        config.controls.dead_zone_high = 2048;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_scale_bounds() {
        let mut config = ChirpConfig::default();
        config.master.output_scale = 0.0;
        assert!(config.validate().is_err());
        config.master.output_scale = 1.5;
        assert!(config.validate().is_err());
        config.master.output_scale = 1.0;
        assert!(config.validate().is_ok());
    }
}
