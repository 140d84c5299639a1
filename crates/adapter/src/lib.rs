//! Persistence for the quiz.
//!
//! - [`JsonFileStore`]: string key-value pairs (audio preferences) in one JSON file
//! - [`ScoreBook`]: finished rounds plus per-player totals
//! - [`ScoreWriter`] / [`ScoreHandle`]: writes scores on a background tokio runtime so the game
//!   loop never waits on the disk
//!
//! # Files
//!
//! Both stores live in the configured data directory:
//!
//! - `preferences.json`: `{"musicMuted":"false","musicVolume":"0.30",...}`
//! - `scores.json`: `{"players":[...],"scores":[...]}`
//!
//! Every write goes to `<file>.tmp` first and is renamed over the original.

pub mod error;
pub mod runtime;
pub mod scores;
pub mod store;

pub use tui_times_core as core;
pub use tui_times_engine as engine;
pub use tui_times_types as types;

pub use error::{StoreError, StoreResult};
pub use runtime::{ScoreHandle, ScoreWriter};
pub use scores::{validate, PlayerRecord, Profile, ScoreBook, ScoreRecord};
pub use store::JsonFileStore;

pub const PREFERENCES_FILE: &str = "preferences.json";
pub const SCORES_FILE: &str = "scores.json";
