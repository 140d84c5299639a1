//! The score book: finished rounds and per-player stats in one JSON file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::{rank_top, BoardFilter, ScoreKey};
use crate::engine::{ScoreSink, ScoreSubmission};
use crate::error::{StoreError, StoreResult};
use crate::store::{read_json, write_json_atomic};
use crate::types::{Table, LEADERBOARD_LIMIT, PROFILE_SCORE_LIMIT, QUESTIONS_PER_ROUND};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: Uuid,
    pub player: String,
    pub score: u8,
    pub table: u8,
    pub total_time_s: u32,
    pub recorded_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn key(&self) -> ScoreKey {
        ScoreKey {
            score: self.score,
            total_time_s: self.total_time_s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub total_score: u32,
    #[serde(default)]
    pub last_game: Option<DateTime<Utc>>,
}

impl PlayerRecord {
    fn new(name: &str, at: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            created_at: at,
            total_games: 0,
            total_score: 0,
            last_game: None,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        fold_name(&self.name) == fold_name(name)
    }
}

/// Lookup key for a player name: trimmed, full Unicode lowercase.
pub fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A player's stats and best rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub player: PlayerRecord,
    pub best: Vec<ScoreRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Ledger {
    #[serde(default)]
    players: Vec<PlayerRecord>,
    #[serde(default)]
    scores: Vec<ScoreRecord>,
}

/// Check a submission before it touches the book.
pub fn validate(submission: &ScoreSubmission) -> StoreResult<()> {
    if submission.player.trim().is_empty() {
        return Err(StoreError::EmptyPlayer);
    }
    if submission.score > QUESTIONS_PER_ROUND {
        return Err(StoreError::InvalidScore(submission.score));
    }
    Ok(())
}

/// Check a stored row; hand-edited files can hold anything.
fn check_record(record: &ScoreRecord) -> StoreResult<()> {
    if Table::new(record.table).is_none() {
        return Err(StoreError::InvalidTable(record.table));
    }
    if record.score > QUESTIONS_PER_ROUND {
        return Err(StoreError::InvalidScore(record.score));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct ScoreBook {
    path: Option<PathBuf>,
    ledger: Ledger,
}

impl ScoreBook {
    /// A book that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the book at `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let mut ledger: Ledger = read_json(&path)?.unwrap_or_default();
        ledger.scores.retain(|record| match check_record(record) {
            Ok(()) => true,
            Err(e) => {
                warn!(id = %record.id, error = %e, "dropping invalid score row");
                false
            }
        });
        info!(
            path = %path.display(),
            players = ledger.players.len(),
            scores = ledger.scores.len(),
            "score book opened"
        );
        Ok(Self {
            path: Some(path),
            ledger,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.ledger.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.scores.is_empty()
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.ledger.players
    }

    pub fn record(&mut self, submission: &ScoreSubmission) -> StoreResult<ScoreRecord> {
        self.record_at(submission, Utc::now())
    }

    /// Append a round and update the player's stats, then write the book.
    pub fn record_at(
        &mut self,
        submission: &ScoreSubmission,
        at: DateTime<Utc>,
    ) -> StoreResult<ScoreRecord> {
        validate(submission)?;
        let name = submission.player.trim();

        let mut next = self.ledger.clone();
        let idx = match next.players.iter().position(|p| p.matches(name)) {
            Some(idx) => idx,
            None => {
                next.players.push(PlayerRecord::new(name, at));
                next.players.len() - 1
            }
        };
        let player = &mut next.players[idx];
        player.total_games += 1;
        player.total_score += submission.score as u32;
        player.last_game = Some(at);

        let record = ScoreRecord {
            id: Uuid::new_v4(),
            player: player.name.clone(),
            score: submission.score,
            table: submission.table.get(),
            total_time_s: submission.total_time_s,
            recorded_at: at,
        };
        next.scores.push(record.clone());
        self.commit(next)?;
        debug!(player = %record.player, score = record.score, table = record.table, "score recorded");
        Ok(record)
    }

    /// Best rounds across all players, filtered by difficulty.
    pub fn top_scores(&self, filter: BoardFilter) -> Vec<ScoreRecord> {
        let matching = self
            .ledger
            .scores
            .iter()
            .filter(|s| filter.matches(s.table))
            .cloned()
            .collect();
        rank_top(matching, ScoreRecord::key, LEADERBOARD_LIMIT)
    }

    pub fn profile(&self, player: &str) -> Option<Profile> {
        let record = self.ledger.players.iter().find(|p| p.matches(player))?;
        let own = self
            .ledger
            .scores
            .iter()
            .filter(|s| record.matches(&s.player))
            .cloned()
            .collect();
        Some(Profile {
            player: record.clone(),
            best: rank_top(own, ScoreRecord::key, PROFILE_SCORE_LIMIT),
        })
    }

    /// Remove a player and all of their rounds. Returns false if unknown.
    pub fn delete_player(&mut self, player: &str) -> StoreResult<bool> {
        if !self.ledger.players.iter().any(|p| p.matches(player)) {
            return Ok(false);
        }
        let key = fold_name(player);
        let mut next = self.ledger.clone();
        next.players.retain(|p| fold_name(&p.name) != key);
        next.scores.retain(|s| fold_name(&s.player) != key);
        self.commit(next)?;
        info!(player = player.trim(), "player deleted");
        Ok(true)
    }

    /// Write `next`, then make it the current ledger. A failed write changes
    /// nothing.
    fn commit(&mut self, next: Ledger) -> StoreResult<()> {
        if let Some(path) = &self.path {
            write_json_atomic(path, &next)?;
        }
        self.ledger = next;
        Ok(())
    }
}

impl ScoreSink for ScoreBook {
    fn save_score(&mut self, submission: &ScoreSubmission) -> Result<bool> {
        match self.record(submission) {
            Ok(_) => Ok(true),
            Err(e) if e.is_rejection() => {
                warn!(error = %e, "score rejected");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::tempdir;

    use super::*;
    use crate::types::Difficulty;

    fn sub(player: &str, score: u8, table: u8, secs: u32) -> ScoreSubmission {
        ScoreSubmission {
            player: player.to_string(),
            score,
            table: Table::new(table).unwrap(),
            total_time_s: secs,
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn record_updates_player_stats() {
        let mut book = ScoreBook::in_memory();
        book.record_at(&sub("Ada", 7, 3, 90), at(1)).unwrap();
        book.record_at(&sub("ada", 9, 7, 80), at(2)).unwrap();

        assert_eq!(book.players().len(), 1);
        let p = &book.players()[0];
        assert_eq!(p.name, "Ada");
        assert_eq!(p.total_games, 2);
        assert_eq!(p.total_score, 16);
        assert_eq!(p.created_at, at(1));
        assert_eq!(p.last_game, Some(at(2)));
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn rejects_bad_submissions() {
        let mut book = ScoreBook::in_memory();
        assert!(matches!(
            book.record(&sub("  ", 5, 3, 10)),
            Err(StoreError::EmptyPlayer)
        ));
        assert!(matches!(
            book.record(&sub("ada", 11, 3, 10)),
            Err(StoreError::InvalidScore(11))
        ));
        assert!(book.is_empty());
        assert!(book.players().is_empty());
        assert!(!book.save_score(&sub("ada", 11, 3, 10)).unwrap());
    }

    #[test]
    fn top_scores_order_filter_and_limit() {
        let mut book = ScoreBook::in_memory();
        book.record(&sub("a", 8, 7, 60)).unwrap();
        book.record(&sub("b", 10, 2, 99)).unwrap();
        book.record(&sub("c", 8, 8, 45)).unwrap();
        book.record(&sub("d", 10, 9, 70)).unwrap();

        let all: Vec<_> = book
            .top_scores(BoardFilter::All)
            .into_iter()
            .map(|s| s.player)
            .collect();
        assert_eq!(all, ["d", "b", "c", "a"]);

        let hard: Vec<_> = book
            .top_scores(BoardFilter::Only(Difficulty::Hard))
            .into_iter()
            .map(|s| s.player)
            .collect();
        assert_eq!(hard, ["d", "c", "a"]);

        for i in 0..30 {
            book.record(&sub("e", (i % 10) as u8, 5, i)).unwrap();
        }
        assert_eq!(book.top_scores(BoardFilter::All).len(), LEADERBOARD_LIMIT);
    }

    #[test]
    fn profile_keeps_best_ten() {
        let mut book = ScoreBook::in_memory();
        for i in 0..12u32 {
            book.record(&sub("ada", (i % 11) as u8, 4, 100 - i)).unwrap();
        }
        book.record(&sub("bob", 10, 4, 1)).unwrap();

        let profile = book.profile("ADA").unwrap();
        assert_eq!(profile.player.total_games, 12);
        assert_eq!(profile.best.len(), PROFILE_SCORE_LIMIT);
        assert_eq!(profile.best[0].score, 10);
        assert!(profile.best.iter().all(|s| s.player == "ada"));
        assert!(book.profile("nobody").is_none());
    }

    #[test]
    fn delete_player_removes_scores() {
        let mut book = ScoreBook::in_memory();
        book.record(&sub("ada", 5, 4, 30)).unwrap();
        book.record(&sub("bob", 6, 4, 30)).unwrap();

        assert!(book.delete_player("Ada").unwrap());
        assert!(!book.delete_player("ada").unwrap());
        assert_eq!(book.players().len(), 1);
        assert!(book
            .top_scores(BoardFilter::All)
            .iter()
            .all(|s| s.player == "bob"));
    }

    #[test]
    fn book_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        {
            let mut book = ScoreBook::open(&path).unwrap();
            assert!(book.is_empty());
            book.record(&sub("ada", 9, 6, 70)).unwrap();
        }
        let book = ScoreBook::open(&path).unwrap();
        assert_eq!(book.len(), 1);
        assert_eq!(book.top_scores(BoardFilter::All)[0].total_time_s, 70);
        assert_eq!(book.path(), Some(path.as_path()));
    }

    #[test]
    fn invalid_rows_are_dropped_on_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let mut book = ScoreBook::open(&path).unwrap();
        book.record(&sub("ada", 9, 6, 70)).unwrap();

        let mut ledger = book.ledger.clone();
        let mut bad = ledger.scores[0].clone();
        bad.id = Uuid::new_v4();
        bad.table = 12;
        ledger.scores.push(bad);
        write_json_atomic(&path, &ledger).unwrap();

        let reopened = ScoreBook::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.top_scores(BoardFilter::All)[0].table, 6);
    }

    #[test]
    fn names_fold_unicode_case() {
        let mut book = ScoreBook::in_memory();
        book.record(&sub("Şükrü", 6, 3, 90)).unwrap();
        book.record(&sub("şükrü", 8, 3, 80)).unwrap();

        assert_eq!(book.players().len(), 1);
        assert_eq!(book.players()[0].name, "Şükrü");
        let profile = book.profile(" ŞÜKRÜ ").unwrap();
        assert_eq!(profile.player.total_games, 2);
        assert_eq!(profile.best.len(), 2);

        assert!(book.delete_player("ŞÜKRÜ").unwrap());
        assert!(book.is_empty());
        assert!(book.players().is_empty());
    }

    /// Turn the book's file into a non-empty directory so the rename fails.
    fn block_writes(path: &Path) {
        std::fs::remove_file(path).ok();
        std::fs::create_dir(path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();
    }

    #[test]
    fn failed_write_leaves_book_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let mut book = ScoreBook::open(&path).unwrap();
        book.record(&sub("ada", 7, 4, 60)).unwrap();
        block_writes(&path);

        assert!(matches!(
            book.record(&sub("ada", 9, 4, 50)),
            Err(StoreError::Io { .. })
        ));
        assert_eq!(book.len(), 1);
        assert_eq!(book.players()[0].total_games, 1);
        assert_eq!(book.players()[0].total_score, 7);

        assert!(book.record(&sub("bob", 5, 4, 50)).is_err());
        assert_eq!(book.players().len(), 1);

        assert!(book.delete_player("ada").is_err());
        assert_eq!(book.len(), 1);
        assert!(book.profile("ada").is_some());
    }

    #[test]
    fn corrupt_book_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(
            ScoreBook::open(&path),
            Err(StoreError::Json { .. })
        ));
    }
}
