//! Core quiz logic module - pure, deterministic, and testable
//!
//! This module contains the round rules, question generation, and timing.
//! It has **no dependencies** on UI, audio, storage, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces the identical round
//! - **Testable**: Every rule is exercised by unit tests
//! - **Portable**: Runs under the terminal front end or headless
//!
//! # Module Structure
//!
//! - [`rng`]: seeded LCG and the shuffled multiplicand pool
//! - [`question`]: product plus three near-miss distractors
//! - [`timing`]: per-question budget, countdown, round stopwatch
//! - [`round`]: the round controller state machine
//! - [`snapshot`]: copyable view model for renderers
//! - [`leaderboard`]: high score ordering and difficulty filters
//! - [`error`]: typed errors for textual/raw inputs
//!
//! # Round Rules
//!
//! - **Ten questions**, one per multiplicand 1..=10, in shuffled order
//! - **Four options**: the product and three distractors within ±15
//! - **Countdown**: 25s for questions 1-3, 20s for 4-6, 18s for 7-8, 15s after
//! - **Feedback**: 1.5s verdict display; the countdown is paused meanwhile
//! - **Timeout** ends the round immediately with the score so far
//!
//! # Example
//!
//! ```
//! use tui_times_core::{RoundController, RoundEvent};
//! use tui_times_types::{RoundPhase, Table, FEEDBACK_MS};
//!
//! let mut round = RoundController::new(Table::new(7).unwrap(), 12345);
//! round.start();
//!
//! // Answer every question correctly.
//! while !round.is_terminal() {
//!     let answer = round.question().unwrap().correct_answer;
//!     round.answer(answer);
//!     round.tick(FEEDBACK_MS);
//! }
//!
//! let result = round.result().unwrap();
//! assert_eq!(result.score, 10);
//! assert!(round
//!     .take_events()
//!     .iter()
//!     .any(|e| matches!(e, RoundEvent::Finished(_))));
//! ```
//!
//! # Timing
//!
//! Call [`RoundController::tick`](round::RoundController::tick) every frame
//! with the elapsed milliseconds. Both the countdown and the round stopwatch
//! advance only inside `tick`, so a finished or dropped controller has no
//! clocks left running.

pub mod error;
pub mod leaderboard;
pub mod question;
pub mod rng;
pub mod round;
pub mod snapshot;
pub mod timing;

pub use tui_times_types as types;

// Re-export commonly used types for convenience
pub use error::{
    parse_filter, parse_table, slot_from_usize, table_from_u8, QuizError, QuizResult,
};
pub use leaderboard::{compare, rank_top, top_scores, BoardFilter, ScoreKey};
pub use question::{generate, Question};
pub use rng::{MultiplicandPool, SimpleRng};
pub use round::{RoundConfig, RoundController, RoundEvent};
pub use snapshot::{QuestionSnapshot, RoundSnapshot};
pub use timing::{time_budget_s, timer_tone, Countdown, Stopwatch};
