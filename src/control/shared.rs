//! Shared control block between the UI thread and the audio thread
//!
//! Every value the audio thread reads is a single-word atomic, so the
//! UI thread can update them without locks and the audio thread can
//! never observe a torn value. The audio thread takes one snapshot per
//! buffer cycle; parameter changes therefore land exactly on buffer
//! boundaries.

use std::sync::atomic::{AtomicU16, AtomicU32, AtomicU8, Ordering};

/// High-level playback state, as published by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    Menu,
    Mute,
}

impl PlayState {
    fn to_u8(self) -> u8 {
        match self {
            PlayState::Playing => 0,
            PlayState::Menu => 1,
            PlayState::Mute => 2,
        }
    }

    fn from_u8(value: u8) -> PlayState {
        match value {
            1 => PlayState::Menu,
            2 => PlayState::Mute,
            _ => PlayState::Playing,
        }
    }
}

/// Sentinel for "no mode selected yet".
const MODE_NONE: u8 = u8::MAX;

/// One consistent view of the controls, taken per audio cycle.
#[derive(Debug, Clone, Copy)]
pub struct ControlFrame {
    pub state: PlayState,
    pub mode: Option<usize>,
    pub pitch: u16,
    pub tone: u16,
}

/// Lock-free control state shared with the audio thread.
#[derive(Debug)]
pub struct Controls {
    state: AtomicU8,
    mode: AtomicU8,
    pitch: AtomicU16,
    tone: AtomicU16,
    /// Pending beep request, `frequency << 16 | duration_ms`.
    /// Zero means none; a new request overwrites an unconsumed one.
    beep: AtomicU32,
}

impl Controls {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(PlayState::Playing.to_u8()),
            mode: AtomicU8::new(MODE_NONE),
            pitch: AtomicU16::new(0),
            tone: AtomicU16::new(0),
            beep: AtomicU32::new(0),
        }
    }

    pub fn set_state(&self, state: PlayState) {
        self.state.store(state.to_u8(), Ordering::Relaxed);
    }

    pub fn set_mode(&self, mode: Option<usize>) {
        let value = match mode {
            Some(index) if index < MODE_NONE as usize => index as u8,
            _ => MODE_NONE,
        };
        self.mode.store(value, Ordering::Relaxed);
    }

    pub fn set_pitch(&self, pitch: u16) {
        self.pitch.store(pitch, Ordering::Relaxed);
    }

    pub fn set_tone(&self, tone: u16) {
        self.tone.store(tone, Ordering::Relaxed);
    }

    /// Queue a feedback beep. Fire-and-forget: a beep requested while
    /// another is pending replaces it, and the audio thread restarts
    /// an already-playing tone rather than stacking a second one.
    pub fn request_beep(&self, frequency_hz: u16, duration_ms: u16) {
        // A frequency of zero would collide with the "none" encoding.
        let frequency = frequency_hz.max(1) as u32;
        let packed = (frequency << 16) | duration_ms as u32;
        self.beep.store(packed, Ordering::Release);
    }

    /// Consume the pending beep request, if any. Called once per audio
    /// cycle by the engine driver.
    pub fn take_beep(&self) -> Option<(f32, u32)> {
        let packed = self.beep.swap(0, Ordering::Acquire);
        if packed == 0 {
            return None;
        }
        let frequency = (packed >> 16) as f32;
        let duration_ms = packed & 0xFFFF;
        Some((frequency, duration_ms))
    }

    /// Snapshot the control values for one buffer cycle.
    pub fn snapshot(&self) -> ControlFrame {
        let mode = match self.mode.load(Ordering::Relaxed) {
            MODE_NONE => None,
            index => Some(index as usize),
        };
        ControlFrame {
            state: PlayState::from_u8(self.state.load(Ordering::Relaxed)),
            mode,
            pitch: self.pitch.load(Ordering::Relaxed),
            tone: self.tone.load(Ordering::Relaxed),
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}
