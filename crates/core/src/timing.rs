//! Round timing policy and clocks.
//!
//! Both clocks are plain counters advanced by the owner's fixed-timestep tick.
//! Nothing here schedules callbacks, so dropping (or finishing) the owner stops
//! them.

use crate::types::{
    TimerTone, CRITICAL_THRESHOLD_S, HURRY_THRESHOLD_S, QUESTIONS_PER_ROUND, SECOND_MS,
    TIME_BUDGETS_S,
};

/// Countdown for question `index` (1-based), in seconds.
///
/// Indices past the end of the round get the shortest budget.
pub fn time_budget_s(index: u8) -> u32 {
    let i = index.clamp(1, QUESTIONS_PER_ROUND) as usize - 1;
    TIME_BUDGETS_S[i]
}

/// Colour band for a countdown showing `seconds_left`.
pub fn timer_tone(seconds_left: u32) -> TimerTone {
    if seconds_left <= CRITICAL_THRESHOLD_S {
        TimerTone::Critical
    } else if seconds_left <= HURRY_THRESHOLD_S {
        TimerTone::Hurry
    } else {
        TimerTone::Calm
    }
}

/// Per-question countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining_ms: u32,
}

impl Countdown {
    pub fn from_secs(secs: u32) -> Self {
        Self {
            remaining_ms: secs.saturating_mul(SECOND_MS),
        }
    }

    /// Advance by `elapsed_ms`. Returns true when this call reached zero.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        if self.remaining_ms == 0 {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        self.remaining_ms == 0
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Whole seconds shown on the clock (rounded up, so "1" shows until expiry).
    pub fn seconds_left(&self) -> u32 {
        self.remaining_ms.div_ceil(SECOND_MS)
    }

    pub fn expired(&self) -> bool {
        self.remaining_ms == 0
    }
}

/// Whole-round elapsed time, reported in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stopwatch {
    elapsed_ms: u64,
}

impl Stopwatch {
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms as u64);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn elapsed_secs(&self) -> u32 {
        (self.elapsed_ms / SECOND_MS as u64).min(u32::MAX as u64) as u32
    }
}
