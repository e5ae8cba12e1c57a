//! Linear control mapping
//!
//! Used for the tone knob -> master volume path, where a straight
//! fraction of the control range scaled by a safe output level is all
//! that is needed.

/// Maps a control value linearly onto [0, scale].
#[derive(Debug, Clone)]
pub struct LinearMap {
    control_max: u16,
    scale: f32,
}

impl LinearMap {
    pub fn new(control_max: u16, scale: f32) -> Self {
        Self {
            control_max: control_max.max(1),
            scale,
        }
    }

    /// Map a control value; output is in [0, scale].
    pub fn map(&self, control: u16) -> f32 {
        let t = control.min(self.control_max) as f32 / self.control_max as f32;
        t * self.scale
    }
}
