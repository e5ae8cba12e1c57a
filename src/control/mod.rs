//! Control-side state: menu, state machine, and the shared block the
//! audio thread reads.

mod menu;
mod shared;
mod state;

pub use menu::Menu;
pub use shared::{ControlFrame, Controls, PlayState};
pub use state::{Beep, StateMachine};
