//! Audio engine
//!
//! Per-cycle orchestration: read the control snapshot, update the
//! voice bank, fill one interleaved stereo buffer, and hand it to the
//! blocking output sink.

mod player;
mod recorder;
mod sink;

pub use player::{default_device_name, list_output_devices, Player};
pub use recorder::WavSink;
pub use sink::{MemorySink, OutputSink, SinkError};

use crate::config::ChirpConfig;
use crate::control::{ControlFrame, PlayState};
use crate::mapping::{LinearMap, LogMap};
use crate::synth::{FeedbackTone, VoiceBank, Waveform, VOICE_COUNT};

/// The synthesis engine
///
/// Owns the voice bank, the feedback tone override, and one stereo
/// buffer allocated at startup and overwritten every cycle. The hot
/// path never allocates.
pub struct Engine {
    bank: VoiceBank,
    feedback: FeedbackTone,
    master_volume: f32,
    /// Interleaved (left, right) 16-bit samples.
    buffer: Vec<i16>,
    pitch_map: LogMap,
    noise_pitch_map: LogMap,
    volume_map: LinearMap,
    harmonic_ratios: Vec<f32>,
    sample_rate: f32,
}

impl Engine {
    /// Create an engine from configuration. The voices that carry the
    /// harmonic ratios start active; they stay silent until a mode is
    /// selected and a waveform assigned.
    pub fn new(config: &ChirpConfig) -> Self {
        let sample_rate = config.audio.sample_rate as f32;
        let pitch_map = LogMap::new(
            config.controls.control_max,
            config.controls.min_freq,
            config.controls.max_freq,
            config.controls.dead_zone_low,
            config.controls.dead_zone_high,
        );
        let noise_pitch_map = pitch_map.with_max_freq(config.controls.noise_max_freq);

        let mut bank = VoiceBank::new(sample_rate);
        for (index, &ratio) in config.master.harmonic_ratios.iter().enumerate() {
            bank.note_on(index, 440.0 * ratio, config.master.note_amplitude);
        }

        Self {
            bank,
            feedback: FeedbackTone::new(sample_rate),
            master_volume: 0.0,
            buffer: vec![0; config.audio.buffer_size * 2],
            pitch_map,
            noise_pitch_map,
            volume_map: LinearMap::new(
                config.controls.control_max,
                config.master.output_scale,
            ),
            harmonic_ratios: config.master.harmonic_ratios.clone(),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The output buffer as last filled.
    pub fn buffer(&self) -> &[i16] {
        &self.buffer
    }

    pub fn bank(&self) -> &VoiceBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut VoiceBank {
        &mut self.bank
    }

    /// Set the master volume directly (the driver normally derives it
    /// from the tone knob each cycle).
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Start a UI feedback tone. It overrides normal playback until
    /// its sample countdown ends; re-triggering restarts it.
    pub fn play_feedback_tone(&mut self, frequency_hz: f32, duration_ms: u32) {
        self.feedback.trigger(frequency_hz, duration_ms);
    }

    pub fn feedback_active(&self) -> bool {
        self.feedback.is_active()
    }

    /// Run one audio cycle against a control snapshot and emit the
    /// buffer. Parameter updates all happen here, before the fill, so
    /// a voice never changes waveform or frequency mid-buffer.
    pub fn run_cycle(
        &mut self,
        frame: &ControlFrame,
        sink: &mut dyn OutputSink,
    ) -> Result<(), SinkError> {
        if self.feedback.is_active() {
            self.fill_feedback_buffer();
            return sink.write(&self.buffer);
        }

        if frame.state == PlayState::Mute {
            self.buffer.fill(0);
            return sink.write(&self.buffer);
        }

        // No selection yet, or an out-of-range mode index: silence,
        // never an undefined waveform.
        let waveform = match frame.mode.and_then(Waveform::from_mode_index) {
            Some(waveform) => waveform,
            None => {
                self.buffer.fill(0);
                return sink.write(&self.buffer);
            }
        };

        self.bank.set_waveform_all(waveform);

        // Noise has no pitch; its knob sets a spectral ceiling, which
        // stays lower than the tonal range.
        let base_freq = if waveform == Waveform::Noise {
            self.noise_pitch_map.map(frame.pitch)
        } else {
            self.pitch_map.map(frame.pitch)
        };
        for (index, &ratio) in self.harmonic_ratios.iter().enumerate() {
            self.bank.set_frequency(index, base_freq * ratio);
        }

        self.master_volume = self.volume_map.map(frame.tone);

        self.fill_buffer();
        sink.write(&self.buffer)
    }

    /// Fill the buffer from the voice bank.
    ///
    /// The sum is normalized by the fixed voice count, not by how many
    /// are active, so volume does not jump as voices start and stop.
    /// Silence takes the same path as sound.
    pub fn fill_buffer(&mut self) {
        let frames = self.buffer.len() / 2;
        for i in 0..frames {
            let mixed = self.bank.mix_sample();
            let scaled = mixed * self.master_volume / VOICE_COUNT as f32;
            let value = (scaled.clamp(-1.0, 1.0) * 32767.0) as i16;
            self.buffer[i * 2] = value;
            self.buffer[i * 2 + 1] = value;
        }
    }

    /// Fill the buffer from the feedback tone. The voices are neither
    /// read nor advanced, so playback resumes exactly where it left
    /// off.
    fn fill_feedback_buffer(&mut self) {
        let frames = self.buffer.len() / 2;
        for i in 0..frames {
            let sample = self.feedback.next_sample(self.master_volume);
            let value = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
            self.buffer[i * 2] = value;
            self.buffer[i * 2 + 1] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChirpConfig;
    use crate::control::{ControlFrame, PlayState};

    fn test_config() -> ChirpConfig {
        ChirpConfig::default()
    }

    fn playing_frame(mode: Option<usize>, pitch: u16, tone: u16) -> ControlFrame {
        ControlFrame {
            state: PlayState::Playing,
            mode,
            pitch,
            tone,
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = Engine::new(&test_config());
        assert_eq!(engine.sample_rate(), 44100.0);
        assert_eq!(engine.buffer().len(), 256 * 2);
        assert!(engine.bank().any_active());
    }

    #[test]
    fn test_mute_produces_all_zero_buffer() {
        let mut engine = Engine::new(&test_config());
        let mut sink = MemorySink::new();

        // Voices are live and the knobs are up; mute still wins.
        let frame = ControlFrame {
            state: PlayState::Mute,
            mode: Some(2),
            pitch: 2048,
            tone: 4095,
        };
        engine.run_cycle(&frame, &mut sink).unwrap();

        assert!(sink.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_no_mode_selected_is_silent() {
        let mut engine = Engine::new(&test_config());
        let mut sink = MemorySink::new();

        engine
            .run_cycle(&playing_frame(None, 2048, 4095), &mut sink)
            .unwrap();

        assert!(sink.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_out_of_range_mode_degrades_to_silence() {
        let mut engine = Engine::new(&test_config());
        let mut sink = MemorySink::new();

        engine
            .run_cycle(&playing_frame(Some(99), 2048, 4095), &mut sink)
            .unwrap();

        assert!(sink.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_playing_produces_audio() {
        let mut engine = Engine::new(&test_config());
        let mut sink = MemorySink::new();

        engine
            .run_cycle(&playing_frame(Some(2), 2048, 4095), &mut sink)
            .unwrap();

        assert!(sink.samples().iter().any(|&s| s != 0));
    }

    #[test]
    fn test_output_is_mono_duplicated_to_both_channels() {
        let mut engine = Engine::new(&test_config());
        let mut sink = MemorySink::new();

        engine
            .run_cycle(&playing_frame(Some(0), 2048, 4095), &mut sink)
            .unwrap();

        let samples = sink.samples();
        for frame in samples.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn test_zero_tone_knob_is_silent_but_voices_advance() {
        let mut engine = Engine::new(&test_config());
        let mut sink = MemorySink::new();

        engine
            .run_cycle(&playing_frame(Some(0), 2048, 0), &mut sink)
            .unwrap();
        assert!(sink.samples().iter().all(|&s| s == 0));

        // The voices kept advancing; phase is non-zero.
        assert!(engine.bank().voice(0).unwrap().phase() > 0.0);
    }

    #[test]
    fn test_unison_voices_do_not_clip_relative_to_one_voice() {
        // With all voices active at amplitude 1.0 on the same waveform
        // and frequency, the /VOICE_COUNT normalization cancels the
        // N-way sum: the mix equals a single full-scale voice.
        let config = test_config();
        let mut engine = Engine::new(&config);
        for i in 0..VOICE_COUNT {
            engine.bank_mut().note_on(i, 440.0, 1.0);
        }
        engine.bank_mut().set_waveform_all(Waveform::Square);
        engine.set_master_volume(1.0);
        engine.fill_buffer();

        // Square at phase 0 is +1.0; full scale after normalization.
        assert_eq!(engine.buffer()[0], 32767);
    }

    #[test]
    fn test_single_voice_is_quarter_scale() {
        let config = test_config();
        let mut engine = Engine::new(&config);
        for i in 0..VOICE_COUNT {
            engine.bank_mut().note_off(i);
        }
        engine.bank_mut().note_on(0, 440.0, 1.0);
        engine.bank_mut().set_waveform_all(Waveform::Square);
        engine.set_master_volume(1.0);
        engine.fill_buffer();

        let expected = (32767.0 / VOICE_COUNT as f32) as i16;
        assert_eq!(engine.buffer()[0], expected);
    }

    #[test]
    fn test_feedback_tone_overrides_and_resumes() {
        let mut config = test_config();
        config.audio.buffer_size = 256;
        let mut engine = Engine::new(&config);
        let mut sink = MemorySink::new();
        let frame = playing_frame(Some(0), 2048, 4095);

        // Prime master volume, then note the voice phase before the
        // beep interrupts playback.
        engine.run_cycle(&frame, &mut sink).unwrap();
        let phase_before = engine.bank().voice(0).unwrap().phase();

        // 10 ms at 44100 Hz = 441 tone frames = 2 buffers of 256.
        engine.play_feedback_tone(440.0, 10);
        engine.run_cycle(&frame, &mut sink).unwrap();
        assert!(engine.feedback_active());
        assert_eq!(engine.bank().voice(0).unwrap().phase(), phase_before);

        engine.run_cycle(&frame, &mut sink).unwrap();
        assert!(!engine.feedback_active());

        // Normal mixing resumes on the next cycle and the voices pick
        // up from their preserved phase.
        engine.run_cycle(&frame, &mut sink).unwrap();
        assert!(engine.bank().voice(0).unwrap().phase() != phase_before);
        assert!(sink.buffers()[3].iter().any(|&s| s != 0));
    }

    #[test]
    fn test_feedback_tone_sample_count() {
        // playFeedbackTone(440, 10) at 44100 Hz is exactly 441 tone
        // frames; everything from the transition frame on is silent.
        let mut config = test_config();
        config.audio.buffer_size = 512;
        let mut engine = Engine::new(&config);
        let mut sink = MemorySink::new();
        let frame = playing_frame(Some(0), 2048, 4095);

        // One cycle to derive master volume from the tone knob.
        engine.run_cycle(&frame, &mut sink).unwrap();

        engine.play_feedback_tone(440.0, 10);
        engine.run_cycle(&frame, &mut sink).unwrap();
        assert!(!engine.feedback_active());

        let left: Vec<i16> = sink.buffers()[1].iter().step_by(2).copied().collect();
        let nonzero_tone = left[..441].iter().filter(|&&s| s != 0).count();
        assert!(nonzero_tone > 400, "only {} tone frames", nonzero_tone);
        assert!(left[441..].iter().all(|&s| s == 0));
    }

    #[test]
    fn test_noise_mode_uses_lower_ceiling() {
        let config = test_config();
        let mut engine = Engine::new(&config);
        let mut sink = MemorySink::new();

        // Pitch pinned to the top rail: tonal modes map to max_freq,
        // noise mode to noise_max_freq.
        engine
            .run_cycle(&playing_frame(Some(0), 4095, 2048), &mut sink)
            .unwrap();
        assert_eq!(engine.bank().voice(0).unwrap().frequency(), 20000.0);

        engine
            .run_cycle(&playing_frame(Some(4), 4095, 2048), &mut sink)
            .unwrap();
        assert_eq!(engine.bank().voice(0).unwrap().frequency(), 5000.0);
    }

    #[test]
    fn test_harmonic_ratios_spread_across_voices() {
        let config = test_config();
        let mut engine = Engine::new(&config);
        let mut sink = MemorySink::new();

        engine
            .run_cycle(&playing_frame(Some(0), 2048, 2048), &mut sink)
            .unwrap();

        let base = engine.bank().voice(0).unwrap().frequency();
        assert!(base > 0.0);
        let second = engine.bank().voice(1).unwrap().frequency();
        let third = engine.bank().voice(2).unwrap().frequency();
        assert!((second / base - 1.25).abs() < 1e-3);
        assert!((third / base - 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_square_mode_fundamental_via_zero_crossings() {
        // End to end: square mode, mid pitch, max tone. A single
        // sounding voice gives a clean square whose zero-crossing
        // count over 0.1 s matches the mapped base frequency.
        let mut config = test_config();
        config.audio.buffer_size = 4410;
        config.master.harmonic_ratios = vec![1.0];
        let mut engine = Engine::new(&config);
        let mut sink = MemorySink::new();

        engine
            .run_cycle(&playing_frame(Some(2), 2048, 4095), &mut sink)
            .unwrap();

        let expected_freq =
            20.0 * (20000.0f64 / 20.0).powf(2048.0 / 4095.0);

        let samples = sink.samples();
        let left: Vec<i16> = samples.iter().step_by(2).copied().collect();
        let mut crossings = 0;
        for pair in left.windows(2) {
            if (pair[0] >= 0) != (pair[1] >= 0) {
                crossings += 1;
            }
        }

        // A square crosses zero twice per period.
        let expected = 2.0 * expected_freq * 4410.0 / 44100.0;
        let diff = (crossings as f64 - expected).abs();
        assert!(
            diff <= 4.0,
            "crossings {} vs expected ~{:.1} (freq {:.1} Hz)",
            crossings,
            expected,
            expected_freq
        );
    }
}
