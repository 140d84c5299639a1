//! Round orchestration: audio, score saving and the round-end callback.
//!
//! `tui-times-core` decides what happens in a round; this crate decides what
//! the rest of the program hears about it. Everything outside the round is
//! reached through the traits in [`ports`].

pub mod audio;
pub mod ports;
pub mod session;

pub use tui_times_core as core;
pub use tui_times_types as types;

pub use audio::{AudioController, AudioPreferences};
pub use ports::{
    AudioSink, DiscardScores, KeyValueStore, MemoryStore, ScoreSink, ScoreSubmission,
    SilentAudio,
};
pub use session::{RoundEndCallback, RoundSession, Services};
