//! A round wired to its collaborators.
//!
//! [`RoundSession`] drives a [`RoundController`] and, after every call, drains
//! the controller's events and turns them into audio cues, a score save and the
//! round-end callback.

use tracing::{debug, info, warn};

use crate::audio::AudioController;
use crate::core::{slot_from_usize, QuizResult, RoundController, RoundEvent, RoundSnapshot};
use crate::ports::{ScoreSink, ScoreSubmission};
use crate::types::{AudioCue, RoundResult, Verdict};

/// Called once when a round finishes (never on abandon).
pub type RoundEndCallback = Box<dyn FnOnce(RoundResult)>;

/// Collaborators shared across rounds.
pub struct Services {
    pub audio: AudioController,
    pub scores: Box<dyn ScoreSink>,
    /// Scores are only saved for a named player.
    pub player: Option<String>,
}

impl Services {
    pub fn new(audio: AudioController, scores: Box<dyn ScoreSink>) -> Self {
        Self {
            audio,
            scores,
            player: None,
        }
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }
}

pub struct RoundSession {
    round: RoundController,
    on_round_end: Option<RoundEndCallback>,
    settled: bool,
}

impl RoundSession {
    pub fn new(round: RoundController) -> Self {
        Self {
            round,
            on_round_end: None,
            settled: false,
        }
    }

    pub fn on_round_end(mut self, callback: impl FnOnce(RoundResult) + 'static) -> Self {
        self.on_round_end = Some(Box::new(callback));
        self
    }

    pub fn round(&self) -> &RoundController {
        &self.round
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        self.round.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut RoundSnapshot) {
        self.round.snapshot_into(out);
    }

    pub fn start(&mut self, services: &mut Services) -> bool {
        let started = self.round.start();
        self.dispatch(services);
        started
    }

    pub fn answer(&mut self, selected: u32, services: &mut Services) -> Option<Verdict> {
        let verdict = self.round.answer(selected);
        self.dispatch(services);
        verdict
    }

    /// Answer with the option in `slot` (0..4).
    pub fn answer_slot(
        &mut self,
        slot: usize,
        services: &mut Services,
    ) -> QuizResult<Option<Verdict>> {
        let slot = slot_from_usize(slot)?;
        let verdict = self.round.answer_slot(slot);
        self.dispatch(services);
        Ok(verdict)
    }

    pub fn tick(&mut self, elapsed_ms: u32, services: &mut Services) -> bool {
        let changed = self.round.tick(elapsed_ms);
        self.dispatch(services);
        changed
    }

    /// Leave the round early. Nothing is saved and the callback is dropped.
    pub fn abandon(&mut self, services: &mut Services) -> bool {
        let abandoned = self.round.abandon();
        self.dispatch(services);
        if abandoned {
            self.on_round_end = None;
        }
        abandoned
    }

    fn dispatch(&mut self, services: &mut Services) {
        for event in self.round.take_events() {
            match event {
                RoundEvent::Started { table } => {
                    info!(table = table.get(), "round started");
                    services.audio.cue(AudioCue::RoundStart);
                    services.audio.start_music();
                }
                RoundEvent::QuestionShown {
                    index,
                    multiplicand,
                } => {
                    debug!(index, multiplicand, "question shown");
                }
                RoundEvent::Answered {
                    index,
                    selected,
                    verdict,
                } => {
                    debug!(index, selected, ?verdict, "answered");
                    services.audio.cue(match verdict {
                        Verdict::Correct => AudioCue::Correct,
                        Verdict::Wrong => AudioCue::Wrong,
                    });
                }
                RoundEvent::Finished(result) => self.settle(result, services),
                RoundEvent::Abandoned { index, score } => {
                    info!(index, score, "round abandoned");
                    services.audio.stop_music();
                }
            }
        }
    }

    fn settle(&mut self, result: RoundResult, services: &mut Services) {
        if self.settled {
            return;
        }
        self.settled = true;
        info!(
            table = result.table.get(),
            score = result.score,
            total_time_s = result.total_time_s,
            end = result.end.as_str(),
            "round finished"
        );

        services.audio.stop_music();
        save_score(services, &result);
        services.audio.cue(if result.is_perfect() {
            AudioCue::PerfectScore
        } else {
            AudioCue::RoundOver
        });

        if let Some(callback) = self.on_round_end.take() {
            callback(result);
        }
    }
}

fn save_score(services: &mut Services, result: &RoundResult) {
    let Some(player) = services.player.as_deref() else {
        debug!("no player name; score not saved");
        return;
    };
    let submission = ScoreSubmission::new(player, result);
    match services.scores.save_score(&submission) {
        Ok(true) => debug!(player, "score submitted"),
        Ok(false) => warn!(player, "score store declined the score"),
        Err(e) => warn!(player, error = %e, "failed to save score"),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::Result;

    use super::*;
    use crate::ports::{AudioSink, MemoryStore};
    use crate::types::{RoundEnd, RoundPhase, Table, FEEDBACK_MS, QUESTIONS_PER_ROUND};

    #[derive(Debug, Clone, PartialEq)]
    enum Log {
        Cue(AudioCue),
        MusicOn,
        MusicOff,
        Saved(ScoreSubmission),
    }

    type Journal = Rc<RefCell<Vec<Log>>>;

    struct Speaker(Journal);

    impl AudioSink for Speaker {
        fn play(&mut self, cue: AudioCue) {
            self.0.borrow_mut().push(Log::Cue(cue));
        }
        fn start_music(&mut self, _volume: f32) {
            self.0.borrow_mut().push(Log::MusicOn);
        }
        fn stop_music(&mut self) {
            self.0.borrow_mut().push(Log::MusicOff);
        }
    }

    struct Scores {
        journal: Journal,
        fail: bool,
    }

    impl ScoreSink for Scores {
        fn save_score(&mut self, submission: &ScoreSubmission) -> Result<bool> {
            if self.fail {
                anyhow::bail!("offline");
            }
            self.journal
                .borrow_mut()
                .push(Log::Saved(submission.clone()));
            Ok(true)
        }
    }

    fn services(journal: &Journal, fail: bool) -> Services {
        let audio = AudioController::new(
            Box::new(Speaker(journal.clone())),
            Box::new(MemoryStore::new()),
        );
        Services::new(
            audio,
            Box::new(Scores {
                journal: journal.clone(),
                fail,
            }),
        )
        .with_player("ada")
    }

    fn session(results: &Rc<RefCell<Vec<RoundResult>>>) -> RoundSession {
        let sink = results.clone();
        RoundSession::new(RoundController::new(Table::new(7).unwrap(), 42))
            .on_round_end(move |r| sink.borrow_mut().push(r))
    }

    fn answer_all(s: &mut RoundSession, svc: &mut Services, correct: bool) {
        while !s.round().is_terminal() {
            let q = *s.round().question().unwrap();
            let pick = if correct {
                q.correct_answer
            } else {
                q.options.iter().copied().find(|&o| o != q.correct_answer).unwrap()
            };
            s.answer(pick, svc);
            s.tick(FEEDBACK_MS, svc);
        }
    }

    #[test]
    fn perfect_round_saves_then_cues_then_calls_back() {
        let journal = Journal::default();
        let results = Rc::new(RefCell::new(Vec::new()));
        let mut svc = services(&journal, false);
        let mut s = session(&results);

        assert!(s.start(&mut svc));
        answer_all(&mut s, &mut svc, true);

        let log = journal.borrow();
        assert_eq!(log[0], Log::Cue(AudioCue::RoundStart));
        assert_eq!(log[1], Log::MusicOn);
        let n = log.len();
        assert_eq!(log[n - 3], Log::MusicOff);
        assert!(matches!(&log[n - 2], Log::Saved(sub) if sub.score == 10 && sub.player == "ada"));
        assert_eq!(log[n - 1], Log::Cue(AudioCue::PerfectScore));
        let corrects = log
            .iter()
            .filter(|l| **l == Log::Cue(AudioCue::Correct))
            .count();
        assert_eq!(corrects, QUESTIONS_PER_ROUND as usize);

        let results = results.borrow();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 10);
        assert_eq!(results[0].end, RoundEnd::Completed);
    }

    #[test]
    fn imperfect_round_plays_round_over() {
        let journal = Journal::default();
        let results = Rc::new(RefCell::new(Vec::new()));
        let mut svc = services(&journal, false);
        let mut s = session(&results);
        s.start(&mut svc);
        answer_all(&mut s, &mut svc, false);

        assert_eq!(
            journal.borrow().last(),
            Some(&Log::Cue(AudioCue::RoundOver))
        );
        assert_eq!(results.borrow()[0].score, 0);
    }

    #[test]
    fn timeout_finishes_once() {
        let journal = Journal::default();
        let results = Rc::new(RefCell::new(Vec::new()));
        let mut svc = services(&journal, false);
        let mut s = session(&results);
        s.start(&mut svc);

        s.tick(25_000, &mut svc);
        s.tick(25_000, &mut svc);
        assert_eq!(s.round().phase(), RoundPhase::Finished(RoundEnd::TimedOut));

        let saves = journal
            .borrow()
            .iter()
            .filter(|l| matches!(l, Log::Saved(_)))
            .count();
        assert_eq!(saves, 1);
        assert_eq!(results.borrow().len(), 1);
        assert_eq!(results.borrow()[0].end, RoundEnd::TimedOut);
    }

    #[test]
    fn save_failure_still_calls_back() {
        let journal = Journal::default();
        let results = Rc::new(RefCell::new(Vec::new()));
        let mut svc = services(&journal, true);
        let mut s = session(&results);
        s.start(&mut svc);
        answer_all(&mut s, &mut svc, true);

        assert_eq!(results.borrow().len(), 1);
        assert_eq!(
            journal.borrow().last(),
            Some(&Log::Cue(AudioCue::PerfectScore))
        );
    }

    #[test]
    fn anonymous_player_is_not_saved() {
        let journal = Journal::default();
        let results = Rc::new(RefCell::new(Vec::new()));
        let mut svc = services(&journal, false);
        svc.player = None;
        let mut s = session(&results);
        s.start(&mut svc);
        answer_all(&mut s, &mut svc, true);

        assert!(!journal.borrow().iter().any(|l| matches!(l, Log::Saved(_))));
        assert_eq!(results.borrow().len(), 1);
    }

    #[test]
    fn abandon_stops_music_without_saving() {
        let journal = Journal::default();
        let results = Rc::new(RefCell::new(Vec::new()));
        let mut svc = services(&journal, false);
        let mut s = session(&results);
        s.start(&mut svc);
        let q = *s.round().question().unwrap();
        s.answer(q.correct_answer, &mut svc);

        assert!(s.abandon(&mut svc));
        assert!(!s.abandon(&mut svc));
        assert!(!s.tick(60_000, &mut svc));

        assert_eq!(journal.borrow().last(), Some(&Log::MusicOff));
        assert!(!journal.borrow().iter().any(|l| matches!(l, Log::Saved(_))));
        assert!(results.borrow().is_empty());
    }

    #[test]
    fn bad_slot_is_an_error() {
        let journal = Journal::default();
        let results = Rc::new(RefCell::new(Vec::new()));
        let mut svc = services(&journal, false);
        let mut s = session(&results);
        s.start(&mut svc);
        assert!(s.answer_slot(4, &mut svc).is_err());
        assert!(matches!(s.answer_slot(0, &mut svc), Ok(Some(_))));
    }

    #[test]
    fn muted_sound_still_finishes() {
        let journal = Journal::default();
        let results = Rc::new(RefCell::new(Vec::new()));
        let mut svc = services(&journal, false);
        svc.audio.toggle_sound();
        let mut s = session(&results);
        s.start(&mut svc);
        answer_all(&mut s, &mut svc, true);

        assert!(!journal.borrow().iter().any(|l| matches!(l, Log::Cue(_))));
        assert_eq!(results.borrow().len(), 1);
    }
}
