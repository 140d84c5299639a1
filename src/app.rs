//! Screen state machine for the terminal front end.
//!
//! [`App`] turns [`QuizAction`]s and ticks into screen changes and hands
//! rendering to the pure views in the term crate. It never touches the
//! terminal itself, so it runs headless in tests.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::adapter::{Profile, ScoreBook, ScoreHandle, ScoreRecord};
use crate::core::{BoardFilter, RoundConfig, RoundController, SimpleRng};
use crate::engine::{RoundSession, Services};
use crate::term::{
    BoardScreen, BoardView, FrameBuffer, Hud, MenuScreen, MenuView, ProfileScreen, ProfileView,
    QuizView, ResultScreen, ResultView, ScoreRow, Viewport,
};
use crate::types::{QuizAction, RoundResult, Table, OPTION_COUNT};

/// The score book as the screens see it.
pub trait ScoreBoard {
    fn top_scores(&self, filter: BoardFilter) -> Vec<ScoreRecord>;
    fn profile(&self, player: &str) -> Option<Profile>;
    fn delete_player(&mut self, player: &str) -> Result<()>;
}

impl ScoreBoard for ScoreHandle {
    fn top_scores(&self, filter: BoardFilter) -> Vec<ScoreRecord> {
        ScoreHandle::top_scores(self, filter)
    }

    fn profile(&self, player: &str) -> Option<Profile> {
        ScoreHandle::profile(self, player)
    }

    /// Queued; the book changes once the writer gets to it.
    fn delete_player(&mut self, player: &str) -> Result<()> {
        ScoreHandle::delete_player(self, player)
    }
}

impl ScoreBoard for ScoreBook {
    fn top_scores(&self, filter: BoardFilter) -> Vec<ScoreRecord> {
        ScoreBook::top_scores(self, filter)
    }

    fn profile(&self, player: &str) -> Option<Profile> {
        ScoreBook::profile(self, player)
    }

    fn delete_player(&mut self, player: &str) -> Result<()> {
        ScoreBook::delete_player(self, player)?;
        Ok(())
    }
}

/// A high score row with its date already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    pub player: String,
    pub table: u8,
    pub score: u8,
    pub total_time_s: u32,
    pub date: String,
}

impl From<&ScoreRecord> for BoardEntry {
    fn from(record: &ScoreRecord) -> Self {
        Self {
            player: record.player.clone(),
            table: record.table,
            score: record.score,
            total_time_s: record.total_time_s,
            date: record.recorded_at.format("%Y-%m-%d").to_string(),
        }
    }
}

impl BoardEntry {
    fn row(&self) -> ScoreRow<'_> {
        ScoreRow {
            player: &self.player,
            table: self.table,
            score: self.score,
            total_time_s: self.total_time_s,
            date: &self.date,
        }
    }
}

pub enum Screen {
    Menu,
    Playing {
        session: RoundSession,
        /// Highlighted option slot.
        cursor: usize,
        /// Set once the round has finished; the final banner stays up
        /// until it runs out.
        closing: Option<(RoundResult, u32)>,
    },
    Result(RoundResult),
    HighScores {
        filter: BoardFilter,
        entries: Vec<BoardEntry>,
    },
    Profile {
        total_games: u32,
        total_score: u32,
        /// Best rounds, ranked.
        entries: Vec<BoardEntry>,
        confirm_delete: bool,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu => "menu",
            Screen::Playing { .. } => "playing",
            Screen::Result(_) => "result",
            Screen::HighScores { .. } => "high_scores",
            Screen::Profile { .. } => "profile",
        }
    }
}

pub struct App {
    screen: Screen,
    table: Table,
    services: Services,
    board: Box<dyn ScoreBoard>,
    round_config: RoundConfig,
    rng: SimpleRng,
    /// Filled by the round-end callback.
    finished: Rc<Cell<Option<RoundResult>>>,
    notice: Option<&'static str>,
}

impl App {
    pub fn new(services: Services, board: Box<dyn ScoreBoard>, table: Table, seed: u32) -> Self {
        Self {
            screen: Screen::Menu,
            table,
            services,
            board,
            round_config: RoundConfig::default(),
            rng: SimpleRng::new(seed),
            finished: Rc::new(Cell::new(None)),
            notice: None,
        }
    }

    pub fn with_round_config(mut self, config: RoundConfig) -> Self {
        self.round_config = config;
        self
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// A round is on screen and still accepting input or counting down.
    pub fn is_round_live(&self) -> bool {
        matches!(&self.screen, Screen::Playing { session, .. } if !session.round().is_terminal())
    }

    pub fn handle(&mut self, action: QuizAction) {
        match action {
            QuizAction::ToggleSound => {
                self.services.audio.toggle_sound();
                return;
            }
            QuizAction::ToggleMusic => {
                let live = self.is_round_live();
                self.services.audio.toggle_music(live);
                return;
            }
            QuizAction::VolumeUp => {
                self.services.audio.adjust_music_volume(1);
                return;
            }
            QuizAction::VolumeDown => {
                self.services.audio.adjust_music_volume(-1);
                return;
            }
            _ => {}
        }

        match &mut self.screen {
            Screen::Menu => match action {
                QuizAction::CursorPrev => self.table = self.table.prev(),
                QuizAction::CursorNext => self.table = self.table.next(),
                QuizAction::Confirm => self.start_round(),
                QuizAction::HighScores => self.open_board(BoardFilter::All),
                QuizAction::Profile => self.open_profile(),
                _ => {}
            },
            Screen::Playing {
                session,
                cursor,
                closing,
            } => match action {
                QuizAction::Back => {
                    session.abandon(&mut self.services);
                    self.notice = closing.is_none().then_some("Round abandoned, score not saved");
                    if let Some((result, _)) = closing.take() {
                        self.set_screen(Screen::Result(result));
                    } else {
                        self.set_screen(Screen::Menu);
                    }
                    return;
                }
                QuizAction::Confirm if closing.is_some() => {
                    if let Some((result, _)) = closing.take() {
                        self.set_screen(Screen::Result(result));
                    }
                    return;
                }
                QuizAction::CursorPrev => *cursor = (*cursor + OPTION_COUNT - 1) % OPTION_COUNT,
                QuizAction::CursorNext => *cursor = (*cursor + 1) % OPTION_COUNT,
                QuizAction::Pick(slot) => {
                    *cursor = slot as usize;
                    answer(session, *cursor, &mut self.services);
                }
                QuizAction::Confirm => answer(session, *cursor, &mut self.services),
                _ => {}
            },
            Screen::Result(result) => match action {
                QuizAction::Confirm | QuizAction::Back => self.set_screen(Screen::Menu),
                QuizAction::Restart => {
                    self.table = result.table;
                    self.start_round();
                }
                QuizAction::HighScores => self.open_board(BoardFilter::All),
                QuizAction::Profile => self.open_profile(),
                _ => {}
            },
            Screen::HighScores { filter, .. } => match action {
                QuizAction::CycleFilter => {
                    let next = filter.next();
                    self.open_board(next);
                }
                QuizAction::Back | QuizAction::Confirm => self.set_screen(Screen::Menu),
                _ => {}
            },
            Screen::Profile { confirm_delete, .. } => match action {
                QuizAction::DeletePlayer if self.services.player.is_some() => {
                    *confirm_delete = true;
                }
                QuizAction::Confirm if *confirm_delete => self.delete_player(),
                QuizAction::Back if *confirm_delete => *confirm_delete = false,
                QuizAction::Back | QuizAction::Confirm => self.set_screen(Screen::Menu),
                _ => {}
            },
        }
        self.collect_result();
    }

    /// Advance the live round by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u32) {
        let mut done = None;
        if let Screen::Playing {
            session, closing, ..
        } = &mut self.screen
        {
            session.tick(elapsed_ms, &mut self.services);
            if let Some((result, remaining)) = closing {
                *remaining = remaining.saturating_sub(elapsed_ms);
                if *remaining == 0 {
                    done = Some(*result);
                }
            }
        }
        if let Some(result) = done {
            self.set_screen(Screen::Result(result));
        }
        self.collect_result();
    }

    /// Leave a live round before the process exits.
    pub fn abandon(&mut self) {
        if let Screen::Playing { session, .. } = &mut self.screen {
            session.abandon(&mut self.services);
        }
    }

    pub fn render_into(&self, viewport: Viewport, fb: &mut FrameBuffer) {
        let player = self.services.player.as_deref();
        let audio = self.services.audio.preferences();
        match &self.screen {
            Screen::Menu => {
                let menu = MenuScreen {
                    table: self.table,
                    player,
                    audio,
                    notice: self.notice,
                };
                MenuView.render_into(&menu, viewport, fb);
            }
            Screen::Playing {
                session, cursor, ..
            } => {
                let hud = Hud {
                    cursor: *cursor,
                    audio,
                    player,
                };
                QuizView.render_into(&session.snapshot(), &hud, viewport, fb);
            }
            Screen::Result(result) => {
                let screen = ResultScreen {
                    result: *result,
                    player,
                    audio,
                };
                ResultView.render_into(&screen, viewport, fb);
            }
            Screen::HighScores { filter, entries } => {
                let rows: Vec<ScoreRow<'_>> = entries.iter().map(BoardEntry::row).collect();
                let board = BoardScreen {
                    filter: *filter,
                    rows: &rows,
                };
                BoardView.render_into(&board, viewport, fb);
            }
            Screen::Profile {
                total_games,
                total_score,
                entries,
                confirm_delete,
            } => {
                let rows: Vec<ScoreRow<'_>> = entries.iter().map(BoardEntry::row).collect();
                let profile = ProfileScreen {
                    player,
                    total_games: *total_games,
                    total_score: *total_score,
                    rows: &rows,
                    confirm_delete: *confirm_delete,
                };
                ProfileView.render_into(&profile, viewport, fb);
            }
        }
    }

    pub fn render(&self, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(viewport, &mut fb);
        fb
    }

    fn start_round(&mut self) {
        self.finished.set(None);
        self.notice = None;
        let seed = self.rng.next_u32();
        let controller = RoundController::with_config(self.table, seed, self.round_config);
        let finished = Rc::clone(&self.finished);
        let mut session =
            RoundSession::new(controller).on_round_end(move |result| finished.set(Some(result)));
        session.start(&mut self.services);
        debug!(table = self.table.get(), seed, "new round");
        self.set_screen(Screen::Playing {
            session,
            cursor: 0,
            closing: None,
        });
    }

    fn open_board(&mut self, filter: BoardFilter) {
        self.notice = None;
        let entries = self
            .board
            .top_scores(filter)
            .iter()
            .map(BoardEntry::from)
            .collect();
        self.set_screen(Screen::HighScores { filter, entries });
    }

    /// Stats for the current player; a named player without rounds yet
    /// shows zeros.
    fn open_profile(&mut self) {
        self.notice = None;
        let profile = self
            .services
            .player
            .as_deref()
            .and_then(|name| self.board.profile(name));
        let screen = match profile {
            Some(profile) => Screen::Profile {
                total_games: profile.player.total_games,
                total_score: profile.player.total_score,
                entries: profile.best.iter().map(BoardEntry::from).collect(),
                confirm_delete: false,
            },
            None => Screen::Profile {
                total_games: 0,
                total_score: 0,
                entries: Vec::new(),
                confirm_delete: false,
            },
        };
        self.set_screen(screen);
    }

    /// Drop the current player and their rounds, then carry on as guest.
    fn delete_player(&mut self) {
        let Some(name) = self.services.player.take() else {
            return;
        };
        match self.board.delete_player(&name) {
            Ok(()) => {
                info!(player = %name, "player deleted from profile screen");
                self.notice = Some("Player deleted, playing as guest");
            }
            Err(e) => {
                warn!(error = %e, player = %name, "player delete failed");
                self.services.player = Some(name);
                self.notice = Some("Could not delete player");
            }
        }
        self.set_screen(Screen::Menu);
    }

    /// Pick up a result delivered by the round-end callback.
    fn collect_result(&mut self) {
        let Some(result) = self.finished.take() else {
            return;
        };
        let banner_ms = self.round_config.feedback_ms;
        if let Screen::Playing { closing, .. } = &mut self.screen {
            *closing = Some((result, banner_ms));
        }
    }

    fn set_screen(&mut self, screen: Screen) {
        debug!(from = self.screen.name(), to = screen.name(), "screen change");
        self.screen = screen;
    }
}

fn answer(session: &mut RoundSession, slot: usize, services: &mut Services) {
    if let Err(e) = session.answer_slot(slot, services) {
        warn!(error = %e, slot, "answer ignored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AudioController, DiscardScores, MemoryStore, ScoreSubmission, SilentAudio};
    use crate::types::{RoundPhase, FEEDBACK_MS};

    fn app() -> App {
        let audio = AudioController::new(Box::new(SilentAudio), Box::new(MemoryStore::new()));
        let services = Services::new(audio, Box::new(DiscardScores));
        App::new(
            services,
            Box::new(ScoreBook::in_memory()),
            Table::new(7).unwrap(),
            99,
        )
    }

    /// A named player with one round already on the board.
    fn app_with_player() -> App {
        let mut book = ScoreBook::in_memory();
        book.record(&ScoreSubmission {
            player: "ada".to_string(),
            score: 9,
            table: Table::new(7).unwrap(),
            total_time_s: 70,
        })
        .unwrap();
        let audio = AudioController::new(Box::new(SilentAudio), Box::new(MemoryStore::new()));
        let services = Services::new(audio, Box::new(DiscardScores)).with_player("ada");
        App::new(services, Box::new(book), Table::new(7).unwrap(), 99)
    }

    fn confirming(app: &App) -> bool {
        match app.screen() {
            Screen::Profile { confirm_delete, .. } => *confirm_delete,
            other => panic!("not on profile: {}", other.name()),
        }
    }

    fn correct_slot(app: &App) -> u8 {
        match app.screen() {
            Screen::Playing { session, .. } => session.round().question().unwrap().correct_slot() as u8,
            other => panic!("not playing: {}", other.name()),
        }
    }

    #[test]
    fn menu_cycles_tables_and_starts_a_round() {
        let mut app = app();
        app.handle(QuizAction::CursorNext);
        assert_eq!(app.table().get(), 8);
        app.handle(QuizAction::CursorPrev);
        app.handle(QuizAction::CursorPrev);
        assert_eq!(app.table().get(), 6);

        app.handle(QuizAction::Confirm);
        assert!(app.is_round_live());
        match app.screen() {
            Screen::Playing { session, .. } => {
                assert_eq!(session.round().table().get(), 6);
                assert_eq!(session.round().phase(), RoundPhase::Active);
            }
            other => panic!("unexpected screen {}", other.name()),
        }
    }

    #[test]
    fn perfect_round_reaches_result_after_banner() {
        let mut app = app();
        app.handle(QuizAction::Confirm);
        for _ in 0..10 {
            let slot = correct_slot(&app);
            app.handle(QuizAction::Pick(slot));
            app.tick(FEEDBACK_MS);
        }
        assert_eq!(app.screen().name(), "playing");
        assert!(!app.is_round_live());

        app.tick(FEEDBACK_MS);
        match app.screen() {
            Screen::Result(result) => {
                assert_eq!(result.score, 10);
                assert!(result.is_perfect());
            }
            other => panic!("unexpected screen {}", other.name()),
        }
    }

    #[test]
    fn confirm_skips_the_closing_banner() {
        let mut app = app();
        app.handle(QuizAction::Confirm);
        app.tick(30_000);
        assert_eq!(app.screen().name(), "playing");
        app.handle(QuizAction::Confirm);
        match app.screen() {
            Screen::Result(result) => assert_eq!(result.score, 0),
            other => panic!("unexpected screen {}", other.name()),
        }
    }

    #[test]
    fn cursor_wraps_and_confirm_answers_highlighted_slot() {
        let mut app = app();
        app.handle(QuizAction::Confirm);
        app.handle(QuizAction::CursorPrev);
        match app.screen() {
            Screen::Playing { cursor, .. } => assert_eq!(*cursor, OPTION_COUNT - 1),
            _ => unreachable!(),
        }
        let slot = correct_slot(&app);
        for _ in 0..(slot as usize + 1) {
            app.handle(QuizAction::CursorNext);
        }
        app.handle(QuizAction::Confirm);
        match app.screen() {
            Screen::Playing { session, .. } => assert_eq!(session.round().score(), 1),
            _ => unreachable!(),
        }
    }

    #[test]
    fn back_abandons_and_returns_to_menu() {
        let mut app = app();
        app.handle(QuizAction::Confirm);
        app.handle(QuizAction::Back);
        assert_eq!(app.screen().name(), "menu");
        assert!(app.render(Viewport::new(80, 24)).contains_text("abandoned"));
    }

    #[test]
    fn result_offers_replay_and_board() {
        let mut app = app();
        app.handle(QuizAction::Confirm);
        app.tick(30_000);
        app.handle(QuizAction::Confirm);
        app.handle(QuizAction::Restart);
        assert!(app.is_round_live());

        app.tick(30_000);
        app.handle(QuizAction::Confirm);
        app.handle(QuizAction::HighScores);
        match app.screen() {
            Screen::HighScores { filter, entries } => {
                assert_eq!(*filter, BoardFilter::All);
                assert!(entries.is_empty());
            }
            other => panic!("unexpected screen {}", other.name()),
        }
        app.handle(QuizAction::CycleFilter);
        match app.screen() {
            Screen::HighScores { filter, .. } => assert_ne!(*filter, BoardFilter::All),
            _ => unreachable!(),
        }
        app.handle(QuizAction::Back);
        assert_eq!(app.screen().name(), "menu");
    }

    #[test]
    fn audio_keys_work_on_every_screen() {
        let mut app = app();
        app.handle(QuizAction::ToggleSound);
        assert!(app.services().audio.preferences().sound_muted);
        app.handle(QuizAction::VolumeUp);
        assert!((app.services().audio.preferences().music_volume - 0.4).abs() < 1e-6);

        app.handle(QuizAction::Confirm);
        assert!(app.services().audio.is_music_playing());
        app.handle(QuizAction::ToggleMusic);
        assert!(!app.services().audio.is_music_playing());
        app.handle(QuizAction::ToggleMusic);
        assert!(app.services().audio.is_music_playing());
    }

    #[test]
    fn same_seed_replays_the_same_question() {
        let question = |app: &App| match app.screen() {
            Screen::Playing { session, .. } => *session.round().question().unwrap(),
            _ => unreachable!(),
        };
        let mut a = app();
        let mut b = app();
        a.handle(QuizAction::Confirm);
        b.handle(QuizAction::Confirm);
        assert_eq!(question(&a), question(&b));
        assert!(a.render(Viewport::new(80, 24)).contains_text("×"));
    }

    #[test]
    fn closing_banner_follows_round_config() {
        let mut app = app().with_round_config(RoundConfig { feedback_ms: 200 });
        app.handle(QuizAction::Confirm);
        app.tick(30_000);
        assert!(!app.is_round_live());
        app.tick(199);
        assert_eq!(app.screen().name(), "playing");
        app.tick(1);
        assert_eq!(app.screen().name(), "result");
    }

    #[test]
    fn profile_shows_stats_and_deletes_after_confirm() {
        let mut app = app_with_player();
        app.handle(QuizAction::Profile);
        match app.screen() {
            Screen::Profile {
                total_games,
                total_score,
                entries,
                confirm_delete,
            } => {
                assert_eq!(*total_games, 1);
                assert_eq!(*total_score, 9);
                assert_eq!(entries.len(), 1);
                assert!(!confirm_delete);
            }
            other => panic!("unexpected screen {}", other.name()),
        }
        assert!(app.render(Viewport::new(80, 24)).contains_text("Games 1  Total score 9"));

        // Esc backs out of the question without deleting.
        app.handle(QuizAction::DeletePlayer);
        assert!(confirming(&app));
        app.handle(QuizAction::Back);
        assert!(!confirming(&app));
        assert_eq!(app.services().player.as_deref(), Some("ada"));

        app.handle(QuizAction::DeletePlayer);
        assert!(app.render(Viewport::new(80, 24)).contains_text("Delete player and all scores?"));
        app.handle(QuizAction::Confirm);
        assert_eq!(app.screen().name(), "menu");
        assert_eq!(app.services().player, None);
        assert!(app.render(Viewport::new(80, 24)).contains_text("Player deleted"));

        app.handle(QuizAction::HighScores);
        match app.screen() {
            Screen::HighScores { entries, .. } => assert!(entries.is_empty()),
            other => panic!("unexpected screen {}", other.name()),
        }
    }

    #[test]
    fn guest_profile_cannot_delete() {
        let mut app = app();
        app.handle(QuizAction::Profile);
        app.handle(QuizAction::DeletePlayer);
        assert!(!confirming(&app));
        assert!(app.render(Viewport::new(80, 24)).contains_text("guest"));
        app.handle(QuizAction::Confirm);
        assert_eq!(app.screen().name(), "menu");
    }
}
