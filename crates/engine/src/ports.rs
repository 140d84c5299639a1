//! Collaborator interfaces.
//!
//! The round never talks to speakers, disks or servers directly; it goes
//! through these traits so the terminal build, tests and any future front end
//! can plug in their own implementations.

use std::collections::HashMap;

use anyhow::Result;

use crate::types::{AudioCue, RoundResult, Table};

/// Plays cues and background music. Every call is fire-and-forget.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);

    fn start_music(&mut self, volume: f32);

    fn stop_music(&mut self);

    /// Adjust the volume of music that is already playing.
    fn set_music_volume(&mut self, _volume: f32) {}
}

/// Sink that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: AudioCue) {}

    fn start_music(&mut self, _volume: f32) {}

    fn stop_music(&mut self) {}
}

/// A finished round, addressed to a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub player: String,
    pub score: u8,
    pub table: Table,
    pub total_time_s: u32,
}

impl ScoreSubmission {
    pub fn new(player: impl Into<String>, result: &RoundResult) -> Self {
        Self {
            player: player.into(),
            score: result.score,
            table: result.table,
            total_time_s: result.total_time_s,
        }
    }
}

/// Stores finished rounds.
///
/// `Ok(false)` means the store declined the score; `Err` means it could not be
/// reached. Callers log both and carry on.
pub trait ScoreSink {
    fn save_score(&mut self, submission: &ScoreSubmission) -> Result<bool>;
}

/// Sink that discards every score.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardScores;

impl ScoreSink for DiscardScores {
    fn save_score(&mut self, _submission: &ScoreSubmission) -> Result<bool> {
        Ok(false)
    }
}

/// String key-value persistence for small preferences.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoundEnd;

    #[test]
    fn memory_store_set_get_remove() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
        store.remove("a").unwrap();
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn submission_copies_result_fields() {
        let result = RoundResult {
            table: Table::new(6).unwrap(),
            score: 8,
            total_time_s: 73,
            end: RoundEnd::Completed,
        };
        let sub = ScoreSubmission::new("ada", &result);
        assert_eq!(sub.player, "ada");
        assert_eq!(sub.score, 8);
        assert_eq!(sub.table.get(), 6);
        assert_eq!(sub.total_time_s, 73);
    }
}
