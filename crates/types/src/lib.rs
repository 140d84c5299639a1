//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (round logic, terminal rendering, persistence).
//!
//! # Round Shape
//!
//! - **Questions per round**: 10
//! - **Options per question**: 4 (one correct answer, three distractors)
//! - **Tables**: 2 through 10 (the 1 table is not offered)
//! - **Multiplicands**: 1 through 10, each used exactly once per round
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds unless the name says otherwise:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `FEEDBACK_MS` | 1500 | Verdict display before the next question |
//! | `TIME_BUDGETS_S` | 25..15 | Per-question countdown, in seconds |
//!
//! # Time Budget by Question
//!
//! Early questions get more time:
//!
//! | Question | Seconds |
//! |----------|---------|
//! | 1-3 | 25 |
//! | 4-6 | 20 |
//! | 7-8 | 18 |
//! | 9-10 | 15 |
//!
//! # Examples
//!
//! ```
//! use tui_times_types::{Difficulty, QuizAction, Table};
//!
//! let table = Table::new(7).unwrap();
//! assert_eq!(table.get(), 7);
//! assert_eq!(table.difficulty(), Difficulty::Hard);
//!
//! // Out-of-domain tables are rejected.
//! assert!(Table::new(1).is_none());
//! assert!(Table::new(11).is_none());
//!
//! // Parse a quiz action.
//! assert_eq!(QuizAction::from_str("pick3"), Some(QuizAction::Pick(2)));
//! ```

/// Number of questions in one round.
pub const QUESTIONS_PER_ROUND: u8 = 10;

/// Number of answer options per question.
pub const OPTION_COUNT: usize = 4;

/// Smallest selectable table.
pub const MIN_TABLE: u8 = 2;

/// Largest selectable table.
pub const MAX_TABLE: u8 = 10;

/// Largest multiplicand in the pool (pool is 1..=MAX_MULTIPLICAND).
pub const MAX_MULTIPLICAND: u8 = 10;

/// Largest perturbation applied to the correct answer when drawing a distractor.
pub const DISTRACTOR_MAX_DELTA: u32 = 15;

/// Rejected draws allowed before distractors are filled deterministically.
pub const DISTRACTOR_MAX_ATTEMPTS: u32 = 1_000;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Verdict display time after an answer (1.5s).
pub const FEEDBACK_MS: u32 = 1500;

/// Milliseconds per second.
pub const SECOND_MS: u32 = 1000;

/// Per-question countdown in seconds.
///
/// Index 0 = question 1, index 9 = question 10.
pub const TIME_BUDGETS_S: [u32; QUESTIONS_PER_ROUND as usize] =
    [25, 25, 25, 20, 20, 20, 18, 18, 15, 15];

/// Seconds left at which the countdown turns to the hurry tone.
pub const HURRY_THRESHOLD_S: u32 = 10;

/// Seconds left at which the countdown turns to the critical tone.
pub const CRITICAL_THRESHOLD_S: u32 = 5;

/// Default background music volume.
pub const DEFAULT_MUSIC_VOLUME: f32 = 0.3;

/// Step used by volume up/down.
pub const MUSIC_VOLUME_STEP: f32 = 0.1;

/// Maximum number of entries on the high score board.
pub const LEADERBOARD_LIMIT: usize = 20;

/// Maximum number of scores listed on a player profile.
pub const PROFILE_SCORE_LIMIT: usize = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_budgets_step_down() {
        assert_eq!(TIME_BUDGETS_S, [25, 25, 25, 20, 20, 20, 18, 18, 15, 15]);
        assert!(TIME_BUDGETS_S.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn table_domain_is_two_through_ten() {
        assert!(Table::new(0).is_none());
        assert!(Table::new(1).is_none());
        for n in MIN_TABLE..=MAX_TABLE {
            assert_eq!(Table::new(n).map(Table::get), Some(n));
        }
        assert!(Table::new(11).is_none());
    }

    #[test]
    fn every_table_has_exactly_one_difficulty() {
        for table in Table::all() {
            let hits = Difficulty::ALL
                .iter()
                .filter(|d| d.contains(table.get()))
                .count();
            assert_eq!(hits, 1, "table {}", table.get());
            assert!(table.difficulty().contains(table.get()));
        }
    }

    #[test]
    fn table_cycling_wraps() {
        let ten = Table::new(10).unwrap();
        let two = Table::new(2).unwrap();
        assert_eq!(ten.next(), two);
        assert_eq!(two.prev(), ten);
        assert_eq!(two.next().get(), 3);
    }

    #[test]
    fn quiz_action_round_trips_through_str() {
        for action in [
            QuizAction::Pick(0),
            QuizAction::Pick(3),
            QuizAction::CursorPrev,
            QuizAction::CursorNext,
            QuizAction::Confirm,
            QuizAction::Back,
            QuizAction::ToggleSound,
            QuizAction::ToggleMusic,
            QuizAction::VolumeUp,
            QuizAction::VolumeDown,
            QuizAction::Restart,
            QuizAction::HighScores,
            QuizAction::CycleFilter,
        ] {
            assert_eq!(QuizAction::from_str(&action.as_str()), Some(action));
        }
        assert_eq!(QuizAction::from_str("pick5"), None);
        assert_eq!(QuizAction::from_str("pick0"), None);
    }
}

/// A multiplication table the player can practise (2..=10).
///
/// The constructor is the only way to obtain a value, so every `Table` in the
/// program is inside the supported domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Table(u8);

impl Table {
    /// Create a table, rejecting values outside `MIN_TABLE..=MAX_TABLE`.
    pub fn new(n: u8) -> Option<Self> {
        (MIN_TABLE..=MAX_TABLE).contains(&n).then_some(Self(n))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn difficulty(self) -> Difficulty {
        Difficulty::for_table(self)
    }

    /// Next table, wrapping 10 → 2.
    pub fn next(self) -> Self {
        if self.0 >= MAX_TABLE {
            Self(MIN_TABLE)
        } else {
            Self(self.0 + 1)
        }
    }

    /// Previous table, wrapping 2 → 10.
    pub fn prev(self) -> Self {
        if self.0 <= MIN_TABLE {
            Self(MAX_TABLE)
        } else {
            Self(self.0 - 1)
        }
    }

    /// All selectable tables in ascending order.
    pub fn all() -> impl Iterator<Item = Table> {
        (MIN_TABLE..=MAX_TABLE).map(Table)
    }
}

impl Default for Table {
    fn default() -> Self {
        Self(MIN_TABLE)
    }
}

/// Difficulty bands grouping the tables
///
/// - **Easy**: 2, 5, 10
/// - **Medium**: 3, 4, 6
/// - **Hard**: 7, 8, 9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Tables belonging to this band.
    pub fn tables(self) -> &'static [u8] {
        match self {
            Difficulty::Easy => &[2, 5, 10],
            Difficulty::Medium => &[3, 4, 6],
            Difficulty::Hard => &[7, 8, 9],
        }
    }

    pub fn contains(self, table: u8) -> bool {
        self.tables().contains(&table)
    }

    pub fn for_table(table: Table) -> Self {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.contains(table.get()))
            .unwrap_or(Difficulty::Medium)
    }

    /// Parse difficulty from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_times_types::Difficulty;
    ///
    /// assert_eq!(Difficulty::from_str("easy"), Some(Difficulty::Easy));
    /// assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
    /// assert_eq!(Difficulty::from_str("all"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Player actions, from the keyboard or any other front end
///
/// The same action means different things on different screens: `CursorNext`
/// moves the option cursor during a round and changes the table on the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAction {
    /// Choose answer option by index (0..4)
    Pick(u8),
    /// Move selection left / previous
    CursorPrev,
    /// Move selection right / next
    CursorNext,
    /// Activate the current selection
    Confirm,
    /// Leave the current screen (abandons a live round)
    Back,
    ToggleSound,
    ToggleMusic,
    VolumeUp,
    VolumeDown,
    /// Replay the same table
    Restart,
    /// Open the high score board
    HighScores,
    /// Cycle the high score difficulty filter
    CycleFilter,
    /// Open the player profile
    Profile,
    /// Ask to delete the current player; needs a `Confirm`
    DeletePlayer,
}

impl QuizAction {
    /// Parse action from string
    ///
    /// `pick1`..`pick4` are one-based to match the option labels on screen.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_times_types::QuizAction;
    ///
    /// assert_eq!(QuizAction::from_str("pick1"), Some(QuizAction::Pick(0)));
    /// assert_eq!(QuizAction::from_str("toggleSound"), Some(QuizAction::ToggleSound));
    /// assert_eq!(QuizAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        if let Some(n) = lower.strip_prefix("pick") {
            return match n.parse::<u8>() {
                Ok(n) if (1..=OPTION_COUNT as u8).contains(&n) => Some(QuizAction::Pick(n - 1)),
                _ => None,
            };
        }
        match lower.as_str() {
            "cursorprev" => Some(QuizAction::CursorPrev),
            "cursornext" => Some(QuizAction::CursorNext),
            "confirm" => Some(QuizAction::Confirm),
            "back" => Some(QuizAction::Back),
            "togglesound" => Some(QuizAction::ToggleSound),
            "togglemusic" => Some(QuizAction::ToggleMusic),
            "volumeup" => Some(QuizAction::VolumeUp),
            "volumedown" => Some(QuizAction::VolumeDown),
            "restart" => Some(QuizAction::Restart),
            "highscores" => Some(QuizAction::HighScores),
            "cyclefilter" => Some(QuizAction::CycleFilter),
            "profile" => Some(QuizAction::Profile),
            "deleteplayer" => Some(QuizAction::DeletePlayer),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> String {
        match self {
            QuizAction::Pick(i) => format!("pick{}", *i as usize + 1),
            QuizAction::CursorPrev => "cursorPrev".to_string(),
            QuizAction::CursorNext => "cursorNext".to_string(),
            QuizAction::Confirm => "confirm".to_string(),
            QuizAction::Back => "back".to_string(),
            QuizAction::ToggleSound => "toggleSound".to_string(),
            QuizAction::ToggleMusic => "toggleMusic".to_string(),
            QuizAction::VolumeUp => "volumeUp".to_string(),
            QuizAction::VolumeDown => "volumeDown".to_string(),
            QuizAction::Restart => "restart".to_string(),
            QuizAction::HighScores => "highScores".to_string(),
            QuizAction::CycleFilter => "cycleFilter".to_string(),
            QuizAction::Profile => "profile".to_string(),
            QuizAction::DeletePlayer => "deletePlayer".to_string(),
        }
    }
}

/// Fire-and-forget audio notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Correct,
    Wrong,
    RoundStart,
    RoundOver,
    PerfectScore,
}

impl AudioCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::Correct => "correct",
            AudioCue::Wrong => "wrong",
            AudioCue::RoundStart => "roundStart",
            AudioCue::RoundOver => "roundOver",
            AudioCue::PerfectScore => "perfectScore",
        }
    }
}

/// Outcome of a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Correct,
    Wrong,
}

/// How a round reached its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundEnd {
    /// All ten questions were answered
    Completed,
    /// A question's countdown reached zero
    TimedOut,
}

impl RoundEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundEnd::Completed => "completed",
            RoundEnd::TimedOut => "timedOut",
        }
    }
}

/// Round lifecycle
///
/// `Preparing → Active → Feedback → Active → … → Finished`. `Abandoned` is the
/// other terminal state, reached when the player leaves mid-round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    Preparing,
    Active,
    Feedback(Verdict),
    Finished(RoundEnd),
    Abandoned,
}

impl RoundPhase {
    /// True once no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundPhase::Finished(_) | RoundPhase::Abandoned)
    }

    /// True while the round clock is running.
    pub fn is_live(&self) -> bool {
        matches!(self, RoundPhase::Active | RoundPhase::Feedback(_))
    }
}

/// Countdown colour band
///
/// - **Calm**: more than 10 seconds left
/// - **Hurry**: 10 seconds or less
/// - **Critical**: 5 seconds or less
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerTone {
    Calm,
    Hurry,
    Critical,
}

/// Final tally of a round, handed to the round-end callback and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundResult {
    pub table: Table,
    pub score: u8,
    pub total_time_s: u32,
    pub end: RoundEnd,
}

impl RoundResult {
    pub fn is_perfect(&self) -> bool {
        self.score == QUESTIONS_PER_ROUND
    }
}
