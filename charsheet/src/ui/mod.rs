//! UI module for the character builder TUI

pub mod layout;
pub mod render;
pub mod theme;

pub use render::{FocusedPanel, Overlay};
