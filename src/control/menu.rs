//! Waveform mode menu
//!
//! A cursor over the fixed waveform list plus the committed selection.
//! Nothing sounds until the first selection is committed.

use crate::synth::{Waveform, WAVEFORM_MODES};

/// Menu over the waveform modes
#[derive(Debug, Clone, Default)]
pub struct Menu {
    cursor: usize,
    selected: Option<usize>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the cursor forward, wrapping.
    pub fn next_item(&mut self) {
        self.cursor = (self.cursor + 1) % WAVEFORM_MODES.len();
    }

    /// Move the cursor backward, wrapping.
    pub fn previous_item(&mut self) {
        self.cursor = (self.cursor + WAVEFORM_MODES.len() - 1) % WAVEFORM_MODES.len();
    }

    /// Commit the cursor position as the selected mode.
    pub fn select_current_item(&mut self) {
        self.selected = Some(self.cursor);
    }

    /// Jump the cursor (and selection) straight to a waveform.
    pub fn select_waveform(&mut self, waveform: Waveform) {
        if let Some(index) = WAVEFORM_MODES.iter().position(|&w| w == waveform) {
            self.cursor = index;
            self.selected = Some(index);
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Selected mode index, `None` before the first selection.
    pub fn selected_mode(&self) -> Option<usize> {
        self.selected
    }

    /// Waveform under the cursor.
    pub fn current_item(&self) -> Waveform {
        WAVEFORM_MODES[self.cursor]
    }

    pub fn item_count(&self) -> usize {
        WAVEFORM_MODES.len()
    }
}
