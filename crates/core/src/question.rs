//! Question generator
//!
//! Builds one multiple-choice question: the product plus three distractors.
//! Distractors sit near the correct answer (±1..=15) so they look plausible,
//! but never equal the neighbouring products `table × (m ± 1)`, which a player
//! could reasonably argue are "also right" for a misread question.

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::types::{Table, DISTRACTOR_MAX_ATTEMPTS, DISTRACTOR_MAX_DELTA, OPTION_COUNT};

/// One multiple-choice question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Question {
    pub multiplier: u8,
    pub multiplicand: u8,
    pub correct_answer: u32,
    pub options: [u32; OPTION_COUNT],
}

impl Question {
    pub fn is_correct(&self, value: u32) -> bool {
        value == self.correct_answer
    }

    /// Index of the correct answer within `options`
    pub fn correct_slot(&self) -> usize {
        self.options
            .iter()
            .position(|&o| o == self.correct_answer)
            .unwrap_or(0)
    }

    /// Option value at `slot`, if the slot exists
    pub fn option(&self, slot: usize) -> Option<u32> {
        self.options.get(slot).copied()
    }
}

/// Generate a question for `table × multiplicand`.
///
/// Multiplicands are expected in 1..=10. The search is bounded: after
/// `DISTRACTOR_MAX_ATTEMPTS` rejected draws the remaining slots are filled by
/// walking upward from the correct answer, so this always returns.
pub fn generate(table: Table, multiplicand: u8, rng: &mut SimpleRng) -> Question {
    let multiplier = table.get();
    let t = multiplier as u32;
    let m = multiplicand as u32;
    let correct = t * m;

    let next_product = t * (m + 1);
    let prev_product = t * m.saturating_sub(1);
    let admissible = |v: u32, used: &[u32]| {
        v != next_product && v != prev_product && !used.contains(&v)
    };

    let mut options: ArrayVec<u32, OPTION_COUNT> = ArrayVec::new();
    options.push(correct);

    let mut attempts = 0;
    while !options.is_full() && attempts < DISTRACTOR_MAX_ATTEMPTS {
        attempts += 1;
        let delta = rng.next_inclusive(1, DISTRACTOR_MAX_DELTA);
        let candidate = if rng.next_bool() {
            correct + delta
        } else {
            correct.saturating_sub(delta).max(1)
        };
        if admissible(candidate, &options) {
            options.push(candidate);
        }
    }

    // Deterministic fill; unreachable for tables 2..=10 in practice.
    let mut candidate = correct;
    while !options.is_full() {
        candidate += 1;
        if admissible(candidate, &options) {
            options.push(candidate);
        }
    }

    let mut options = options.into_inner().unwrap_or([correct; OPTION_COUNT]);
    rng.shuffle(&mut options);

    Question {
        multiplier,
        multiplicand,
        correct_answer: correct,
        options,
    }
}
