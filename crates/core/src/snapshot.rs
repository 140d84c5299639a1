use crate::question::Question;
use crate::types::{
    Difficulty, RoundPhase, Table, TimerTone, OPTION_COUNT, QUESTIONS_PER_ROUND, TIME_BUDGETS_S,
};

/// The visible part of a question; the correct answer is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionSnapshot {
    pub multiplier: u8,
    pub multiplicand: u8,
    pub options: [u32; OPTION_COUNT],
}

impl From<Question> for QuestionSnapshot {
    fn from(value: Question) -> Self {
        Self {
            multiplier: value.multiplier,
            multiplicand: value.multiplicand,
            options: value.options,
        }
    }
}

/// Read-only view of a round for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundSnapshot {
    pub table: Table,
    pub difficulty: Difficulty,
    pub phase: RoundPhase,
    pub question_index: u8,
    pub questions_total: u8,
    pub score: u8,
    pub question: Option<QuestionSnapshot>,
    /// Correct answer, shown once the question has been answered or the round is over.
    pub revealed_answer: Option<u32>,
    pub last_answer: Option<u32>,
    pub seconds_left: u32,
    pub time_budget_s: u32,
    pub tone: TimerTone,
    pub elapsed_s: u32,
}

impl RoundSnapshot {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            difficulty: table.difficulty(),
            phase: RoundPhase::Preparing,
            question_index: 0,
            questions_total: QUESTIONS_PER_ROUND,
            score: 0,
            question: None,
            revealed_answer: None,
            last_answer: None,
            seconds_left: TIME_BUDGETS_S[0],
            time_budget_s: TIME_BUDGETS_S[0],
            tone: TimerTone::Calm,
            elapsed_s: 0,
        }
    }

    /// Fraction of the round's questions reached, in 0.0..=1.0.
    pub fn progress(&self) -> f32 {
        if self.questions_total == 0 {
            return 0.0;
        }
        (self.question_index as f32 / self.questions_total as f32).clamp(0.0, 1.0)
    }
}
