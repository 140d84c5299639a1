//! Round controller - manages one ten-question round
//!
//! This module ties together the multiplicand pool, the question generator and
//! the timing policy. It owns score and timer state, and emits events that the
//! engine layer forwards to audio and persistence.
//!
//! The phase field is the single authority for "is the round over". Every
//! finishing transition goes through [`RoundController::finish`], which checks
//! it first, so an answer racing a timeout can only ever produce one
//! `Finished` event.

use arrayvec::ArrayVec;

use crate::question::{generate, Question};
use crate::rng::{MultiplicandPool, SimpleRng};
use crate::snapshot::{QuestionSnapshot, RoundSnapshot};
use crate::timing::{time_budget_s, timer_tone, Countdown, Stopwatch};
use crate::types::*;

/// Tunables for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundConfig {
    /// Verdict display time before the next question.
    pub feedback_ms: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            feedback_ms: FEEDBACK_MS,
        }
    }
}

/// Something that happened inside the round, drained by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    Started {
        table: Table,
    },
    QuestionShown {
        index: u8,
        multiplicand: u8,
    },
    Answered {
        index: u8,
        selected: u32,
        verdict: Verdict,
    },
    Finished(RoundResult),
    Abandoned {
        index: u8,
        score: u8,
    },
}

/// One round of play for a fixed table
#[derive(Debug, Clone)]
pub struct RoundController {
    table: Table,
    config: RoundConfig,
    rng: SimpleRng,
    pool: Option<MultiplicandPool>,
    question: Option<Question>,
    /// 1-based; 0 until the round starts.
    question_index: u8,
    score: u8,
    phase: RoundPhase,
    countdown: Countdown,
    feedback_remaining_ms: u32,
    stopwatch: Stopwatch,
    last_answer: Option<u32>,
    asked: ArrayVec<u8, { QUESTIONS_PER_ROUND as usize }>,
    result: Option<RoundResult>,
    events: Vec<RoundEvent>,
}

impl RoundController {
    /// Create a round with the default feedback delay
    pub fn new(table: Table, seed: u32) -> Self {
        Self::with_config(table, seed, RoundConfig::default())
    }

    pub fn with_config(table: Table, seed: u32, config: RoundConfig) -> Self {
        Self {
            table,
            config,
            rng: SimpleRng::new(seed),
            pool: None,
            question: None,
            question_index: 0,
            score: 0,
            phase: RoundPhase::Preparing,
            countdown: Countdown::from_secs(time_budget_s(1)),
            feedback_remaining_ms: 0,
            stopwatch: Stopwatch::default(),
            last_answer: None,
            asked: ArrayVec::new(),
            result: None,
            events: Vec::new(),
        }
    }

    /// Deal the pool and show question 1. Returns false if already started.
    pub fn start(&mut self) -> bool {
        if self.phase != RoundPhase::Preparing {
            return false;
        }
        self.pool = Some(MultiplicandPool::shuffled(&mut self.rng));
        self.question_index = 1;
        self.score = 0;
        self.phase = RoundPhase::Active;
        self.events.push(RoundEvent::Started { table: self.table });
        self.show_question();
        true
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn config(&self) -> RoundConfig {
        self.config
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn question_index(&self) -> u8 {
        self.question_index
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    /// Multiplicands asked so far, in order.
    pub fn asked(&self) -> &[u8] {
        &self.asked
    }

    pub fn seconds_left(&self) -> u32 {
        self.countdown.seconds_left()
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.stopwatch.elapsed_secs()
    }

    /// Final tally, once the round has finished (never set when abandoned).
    pub fn result(&self) -> Option<RoundResult> {
        self.result
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Drain pending events.
    pub fn take_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    fn show_question(&mut self) {
        let multiplicand = match self.pool.as_mut().and_then(MultiplicandPool::draw) {
            Some(m) => m,
            None => self.rng.next_inclusive(1, MAX_MULTIPLICAND as u32) as u8,
        };
        let question = generate(self.table, multiplicand, &mut self.rng);

        self.question = Some(question);
        self.countdown = Countdown::from_secs(time_budget_s(self.question_index));
        self.last_answer = None;
        // At most QUESTIONS_PER_ROUND questions are shown, matching the capacity.
        let pushed = self.asked.try_push(multiplicand);
        debug_assert!(pushed.is_ok(), "more questions than the round holds");
        self.events.push(RoundEvent::QuestionShown {
            index: self.question_index,
            multiplicand,
        });
    }

    /// Submit an answer value.
    ///
    /// Only accepted while Active; during feedback or after the round has ended
    /// this is a no-op returning `None`.
    pub fn answer(&mut self, selected: u32) -> Option<Verdict> {
        if self.phase != RoundPhase::Active {
            return None;
        }
        let question = self.question?;

        let verdict = if question.is_correct(selected) {
            self.score = (self.score + 1).min(QUESTIONS_PER_ROUND);
            Verdict::Correct
        } else {
            Verdict::Wrong
        };

        self.last_answer = Some(selected);
        self.phase = RoundPhase::Feedback(verdict);
        self.feedback_remaining_ms = self.config.feedback_ms;
        self.events.push(RoundEvent::Answered {
            index: self.question_index,
            selected,
            verdict,
        });

        if self.feedback_remaining_ms == 0 {
            self.advance();
        }
        Some(verdict)
    }

    /// Submit the option at `slot` (0-based).
    pub fn answer_slot(&mut self, slot: usize) -> Option<Verdict> {
        let value = self.question?.option(slot)?;
        self.answer(value)
    }

    /// Advance clocks by `elapsed_ms`. Returns true if the phase changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        match self.phase {
            RoundPhase::Active => {
                self.stopwatch.advance(elapsed_ms);
                if self.countdown.advance(elapsed_ms) {
                    self.finish(RoundEnd::TimedOut);
                    return true;
                }
                false
            }
            RoundPhase::Feedback(_) => {
                self.stopwatch.advance(elapsed_ms);
                self.feedback_remaining_ms = self.feedback_remaining_ms.saturating_sub(elapsed_ms);
                if self.feedback_remaining_ms == 0 {
                    self.advance();
                    return true;
                }
                false
            }
            RoundPhase::Preparing | RoundPhase::Finished(_) | RoundPhase::Abandoned => false,
        }
    }

    /// Leave the round without a result. Returns false if already terminal.
    pub fn abandon(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = RoundPhase::Abandoned;
        self.events.push(RoundEvent::Abandoned {
            index: self.question_index,
            score: self.score,
        });
        true
    }

    /// Feedback elapsed: next question or completion.
    fn advance(&mut self) {
        if self.question_index >= QUESTIONS_PER_ROUND {
            self.finish(RoundEnd::Completed);
            return;
        }
        self.question_index += 1;
        self.phase = RoundPhase::Active;
        self.show_question();
    }

    fn finish(&mut self, end: RoundEnd) {
        if self.phase.is_terminal() {
            return;
        }
        self.phase = RoundPhase::Finished(end);
        let result = RoundResult {
            table: self.table,
            score: self.score,
            total_time_s: self.stopwatch.elapsed_secs(),
            end,
        };
        self.result = Some(result);
        self.events.push(RoundEvent::Finished(result));
    }

    pub fn snapshot_into(&self, out: &mut RoundSnapshot) {
        let seconds_left = self.countdown.seconds_left();
        let revealed = matches!(
            self.phase,
            RoundPhase::Feedback(_) | RoundPhase::Finished(_)
        );

        out.table = self.table;
        out.difficulty = self.table.difficulty();
        out.phase = self.phase;
        out.question_index = self.question_index;
        out.questions_total = QUESTIONS_PER_ROUND;
        out.score = self.score;
        out.question = self.question.map(QuestionSnapshot::from);
        out.revealed_answer = if revealed {
            self.question.map(|q| q.correct_answer)
        } else {
            None
        };
        out.last_answer = self.last_answer;
        out.seconds_left = seconds_left;
        out.time_budget_s = time_budget_s(self.question_index.max(1));
        out.tone = timer_tone(seconds_left);
        out.elapsed_s = self.stopwatch.elapsed_secs();
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let mut s = RoundSnapshot::new(self.table);
        self.snapshot_into(&mut s);
        s
    }
}
