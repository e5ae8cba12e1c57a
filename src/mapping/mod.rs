//! Control-value mapping
//!
//! Converts filtered knob readings into audio parameters.

mod linear;
mod logarithmic;

pub use linear::LinearMap;
pub use logarithmic::LogMap;
