//! TUI Times (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_times::{core,adapter,term,input,engine,types}`
//! and holds the pieces only the binary needs: configuration, log setup and
//! the screen state machine.

pub mod app;
pub mod config;
pub mod logging;

pub use tui_times_adapter as adapter;
pub use tui_times_core as core;
pub use tui_times_engine as engine;
pub use tui_times_input as input;
pub use tui_times_term as term;
pub use tui_times_types as types;
