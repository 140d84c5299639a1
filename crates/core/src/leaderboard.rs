//! High score ordering.
//!
//! Higher score ranks first; equal scores rank the faster round first.

use std::cmp::Ordering;

use crate::types::{Difficulty, LEADERBOARD_LIMIT};

/// The two fields ranking looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreKey {
    pub score: u8,
    pub total_time_s: u32,
}

/// Ranking order: score descending, then total time ascending.
pub fn compare(a: ScoreKey, b: ScoreKey) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.total_time_s.cmp(&b.total_time_s))
}

/// Sort `items` by rank and keep at most `limit`.
///
/// The sort is stable, so ties on both fields keep their insertion order.
pub fn rank_top<T>(mut items: Vec<T>, key: impl Fn(&T) -> ScoreKey, limit: usize) -> Vec<T> {
    items.sort_by(|a, b| compare(key(a), key(b)));
    items.truncate(limit);
    items
}

/// Which tables a high score listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoardFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl BoardFilter {
    pub fn matches(self, table: u8) -> bool {
        match self {
            BoardFilter::All => true,
            BoardFilter::Only(d) => d.contains(table),
        }
    }

    /// All → Easy → Medium → Hard → All
    pub fn next(self) -> Self {
        match self {
            BoardFilter::All => BoardFilter::Only(Difficulty::Easy),
            BoardFilter::Only(Difficulty::Easy) => BoardFilter::Only(Difficulty::Medium),
            BoardFilter::Only(Difficulty::Medium) => BoardFilter::Only(Difficulty::Hard),
            BoardFilter::Only(Difficulty::Hard) => BoardFilter::All,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Some(BoardFilter::All);
        }
        Difficulty::from_str(s).map(BoardFilter::Only)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoardFilter::All => "all",
            BoardFilter::Only(d) => d.as_str(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BoardFilter::All => "All",
            BoardFilter::Only(d) => d.label(),
        }
    }
}

/// Rank and cap at the standard board size.
pub fn top_scores<T>(items: Vec<T>, key: impl Fn(&T) -> ScoreKey) -> Vec<T> {
    rank_top(items, key, LEADERBOARD_LIMIT)
}
