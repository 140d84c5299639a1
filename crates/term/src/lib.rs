//! Terminal rendering for the quiz.
//!
//! Screens render into a simple framebuffer that the renderer diffs and
//! flushes to the terminal, without a widget toolkit in between.
//!
//! - Views are pure: snapshot in, cells out, so they are unit-testable
//! - The renderer only emits cells that changed since the last frame

pub mod bell;
pub mod fb;
pub mod quiz_view;
pub mod renderer;
pub mod screens;
pub mod theme;

pub use tui_times_core as core;
pub use tui_times_engine as engine;
pub use tui_times_types as types;

pub use bell::BellAudio;
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use quiz_view::{Hud, QuizView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use screens::{
    BoardScreen, BoardView, MenuScreen, MenuView, ProfileScreen, ProfileView, ResultScreen,
    ResultView, ScoreRow,
};
