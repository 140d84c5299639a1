//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::QuizAction`]. Screens
//! interpret the actions; this crate knows nothing about rounds or menus.

pub mod map;

pub use tui_times_types as types;

pub use map::{handle_key_event, should_quit};
