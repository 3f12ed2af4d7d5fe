pub mod focus;
pub mod keymap;

pub use focus::{FocusRegistry, FocusTarget, ScreenLocalFocus, TopBarItem};
