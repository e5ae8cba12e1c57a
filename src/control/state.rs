//! Mode/mute state machine
//!
//! Runs on the UI thread and owns the menu. Input events move it
//! between Playing, Menu, and Mute; the menu falls back to Playing
//! after a period of inactivity. Events that deserve an audible cue
//! return a [`Beep`] for the caller to forward to the engine.

use super::menu::Menu;
use super::shared::{Controls, PlayState};
use std::time::{Duration, Instant};

/// An audible UI cue emitted by a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Beep {
    pub frequency_hz: u16,
    pub duration_ms: u16,
}

/// Selecting a mode: short confirmation chirp.
const BEEP_SELECT: Beep = Beep {
    frequency_hz: 500,
    duration_ms: 100,
};
/// Entering mute: low and long.
const BEEP_MUTE: Beep = Beep {
    frequency_hz: 300,
    duration_ms: 150,
};
/// Leaving mute: high and long.
const BEEP_UNMUTE: Beep = Beep {
    frequency_hz: 1500,
    duration_ms: 150,
};

/// The mode/mute state machine
#[derive(Debug)]
pub struct StateMachine {
    state: PlayState,
    menu: Menu,
    last_interaction: Instant,
    menu_timeout: Duration,
}

impl StateMachine {
    pub fn new(menu_timeout: Duration) -> Self {
        Self {
            state: PlayState::Menu,
            menu: Menu::new(),
            last_interaction: Instant::now(),
            menu_timeout,
        }
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut Menu {
        &mut self.menu
    }

    /// Periodic tick: collapse an idle menu back to playing.
    pub fn update(&mut self) {
        if self.state == PlayState::Menu
            && self.last_interaction.elapsed() > self.menu_timeout
        {
            self.state = PlayState::Playing;
        }
    }

    /// Encoder movement navigates the menu. Ignored while muted
    /// (unmuting requires a long press).
    pub fn on_encoder_moved(&mut self, direction: i32) {
        if self.state == PlayState::Mute {
            return;
        }

        self.state = PlayState::Menu;
        if direction > 0 {
            self.menu.next_item();
        } else if direction < 0 {
            self.menu.previous_item();
        }
        self.last_interaction = Instant::now();
    }

    /// Short press commits the menu selection. Ignored elsewhere.
    pub fn on_button_short_press(&mut self) -> Option<Beep> {
        if self.state != PlayState::Menu {
            return None;
        }

        self.menu.select_current_item();
        self.state = PlayState::Playing;
        self.last_interaction = Instant::now();
        Some(BEEP_SELECT)
    }

    /// Long press toggles mute from any state.
    pub fn on_button_long_press(&mut self) -> Option<Beep> {
        if self.state == PlayState::Mute {
            self.state = PlayState::Playing;
            Some(BEEP_UNMUTE)
        } else {
            self.state = PlayState::Mute;
            Some(BEEP_MUTE)
        }
    }

    /// Publish the current state and selection to the shared block
    /// read by the audio thread.
    pub fn publish(&self, controls: &Controls) {
        controls.set_state(self.state);
        controls.set_mode(self.menu.selected_mode());
    }
}
