//! Menu, result, high score and profile screens.
//!
//! Like [`crate::quiz_view`], these only paint into a framebuffer.

use crate::core::BoardFilter;
use crate::engine::AudioPreferences;
use crate::fb::{CellStyle, FrameBuffer};
use crate::quiz_view::{digits, draw_audio_line, Viewport};
use crate::theme;
use crate::types::{Difficulty, RoundEnd, RoundResult, Table, QUESTIONS_PER_ROUND};

const CARD_W: u16 = 52;

fn card(fb: &mut FrameBuffer, viewport: Viewport, h: u16) -> (u16, u16, u16) {
    fb.resize(viewport.width, viewport.height);
    fb.clear(CellStyle::default().into_cell(' '));
    let x0 = viewport.width.saturating_sub(CARD_W) / 2;
    let y0 = viewport.height.saturating_sub(h) / 2;
    fb.draw_box(x0, y0, CARD_W, h, theme::BORDER);
    (x0 + 2, y0, CARD_W - 4)
}

/// Score colour: gold for perfect, then green, blue and plain.
pub fn score_style(score: u8) -> CellStyle {
    match score {
        s if s >= QUESTIONS_PER_ROUND => theme::GOLD,
        8..=9 => theme::GOOD,
        6..=7 => theme::TITLE,
        _ => theme::TEXT,
    }
}

/// `m:ss`
pub fn put_duration(fb: &mut FrameBuffer, x: u16, y: u16, secs: u32, style: CellStyle) -> u16 {
    let mut cx = fb.put_u32(x, y, secs / 60, style);
    let rem = secs % 60;
    cx = fb.put_str(cx, y, if rem < 10 { ":0" } else { ":" }, style);
    fb.put_u32(cx, y, rem, style)
}

/// What the table-selection menu shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuScreen<'a> {
    pub table: Table,
    pub player: Option<&'a str>,
    pub audio: AudioPreferences,
    /// One-line notice, e.g. a failed high score load.
    pub notice: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MenuView;

impl MenuView {
    pub fn render_into(&self, menu: &MenuScreen<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        let (x, y0, w) = card(fb, viewport, 16);
        let mut y = y0 + 1;
        fb.put_str_centered(x, y, w, "TIMES TABLES", theme::TITLE);
        y += 1;
        match menu.player {
            Some(name) => {
                let text_w = 8 + name.chars().count() as u16;
                let cx = x + w.saturating_sub(text_w) / 2;
                let cx = fb.put_str(cx, y, "Player: ", theme::MUTED);
                fb.put_str(cx, y, name, theme::TEXT);
            }
            None => fb.put_str_centered(x, y, w, "Playing as guest (scores not saved)", theme::MUTED),
        }

        // Table picker: ◀ 7 ▶
        y += 2;
        fb.put_str_centered(x, y, w, "Choose a table", theme::TEXT);
        y += 2;
        let n = menu.table.get() as u32;
        let picker_w = 4 + digits(n) + 2;
        let mut cx = x + w.saturating_sub(picker_w) / 2;
        cx = fb.put_str(cx, y, "◀  ", theme::MUTED);
        cx = fb.put_u32(cx, y, n, theme::CURSOR);
        fb.put_str(cx, y, "  ▶", theme::MUTED);
        y += 1;
        let difficulty = menu.table.difficulty();
        fb.put_str_centered(x, y, w, difficulty.label(), theme::difficulty_style(difficulty));

        // Difficulty legend.
        y += 2;
        let mut cx = x + 4;
        for (n, d) in Difficulty::ALL.into_iter().enumerate() {
            if n > 0 {
                cx = fb.put_str(cx, y, "   ", theme::MUTED);
            }
            cx = fb.put_str(cx, y, d.label(), theme::difficulty_style(d));
            cx = fb.put_str(cx, y, " ", theme::MUTED);
            for (i, t) in d.tables().iter().enumerate() {
                if i > 0 {
                    cx = fb.put_str(cx, y, ",", theme::MUTED);
                }
                cx = fb.put_u32(cx, y, *t as u32, theme::MUTED);
            }
        }

        y += 2;
        fb.put_str_centered(x, y, w, "Enter start  h scores  p player  q quit", theme::MUTED);
        y += 1;
        if let Some(notice) = menu.notice {
            fb.put_str_centered(x, y, w, notice, theme::BAD);
        }
        draw_audio_line(fb, x, y0 + 14, &menu.audio);
    }

    pub fn render(&self, menu: &MenuScreen<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(menu, viewport, &mut fb);
        fb
    }
}

/// What the end-of-round screen shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultScreen<'a> {
    pub result: RoundResult,
    pub player: Option<&'a str>,
    pub audio: AudioPreferences,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultView;

impl ResultView {
    pub fn render_into(&self, screen: &ResultScreen<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        let r = screen.result;
        let (x, y0, w) = card(fb, viewport, 14);
        let mut y = y0 + 1;
        let title = match r.end {
            RoundEnd::Completed => "ROUND COMPLETE",
            RoundEnd::TimedOut => "TIME'S UP",
        };
        fb.put_str_centered(x, y, w, title, theme::TITLE);

        y += 2;
        let score_w = 7 + digits(r.score as u32) + 3 + digits(QUESTIONS_PER_ROUND as u32);
        let mut cx = x + w.saturating_sub(score_w) / 2;
        cx = fb.put_str(cx, y, "Score: ", theme::TEXT);
        cx = fb.put_u32(cx, y, r.score as u32, score_style(r.score));
        cx = fb.put_str(cx, y, " / ", theme::MUTED);
        fb.put_u32(cx, y, QUESTIONS_PER_ROUND as u32, theme::MUTED);

        y += 1;
        let mut cx = x + w.saturating_sub(12) / 2;
        cx = fb.put_str(cx, y, "Time: ", theme::TEXT);
        put_duration(fb, cx, y, r.total_time_s, theme::TEXT);

        y += 1;
        let mut cx = x + w.saturating_sub(16) / 2;
        cx = fb.put_str(cx, y, "Table ", theme::MUTED);
        cx = fb.put_u32(cx, y, r.table.get() as u32, theme::MUTED);
        cx = fb.put_str(cx, y, " · ", theme::MUTED);
        let d = r.table.difficulty();
        fb.put_str(cx, y, d.label(), theme::difficulty_style(d));

        y += 2;
        let (message, style) = verdict_line(&r);
        fb.put_str_centered(x, y, w, message, style);

        y += 2;
        let saved = match screen.player {
            Some(_) => "Score sent to the high score board",
            None => "Guest round, score not saved",
        };
        fb.put_str_centered(x, y, w, saved, theme::MUTED);

        y += 2;
        fb.put_str_centered(x, y, w, "Enter menu  r replay  h scores  p player", theme::MUTED);
        draw_audio_line(fb, x, y0 + 12, &screen.audio);
    }

    pub fn render(&self, screen: &ResultScreen<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(screen, viewport, &mut fb);
        fb
    }
}

fn verdict_line(r: &RoundResult) -> (&'static str, CellStyle) {
    if r.is_perfect() {
        ("★ PERFECT! ★", theme::GOLD)
    } else if r.score >= 8 {
        ("Great job!", theme::GOOD)
    } else if r.score >= 6 {
        ("Nice work, keep going", theme::TITLE)
    } else {
        ("Keep practising", theme::TEXT)
    }
}

/// One row of the high score board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRow<'a> {
    pub player: &'a str,
    pub table: u8,
    pub score: u8,
    pub total_time_s: u32,
    /// Pre-formatted date.
    pub date: &'a str,
}

/// What the high score screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardScreen<'a> {
    pub filter: BoardFilter,
    pub rows: &'a [ScoreRow<'a>],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoardView;

impl BoardView {
    pub fn render_into(&self, board: &BoardScreen<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        let visible = viewport.height.saturating_sub(9).max(1) as usize;
        let shown = board.rows.len().min(visible);
        let h = (shown.max(1) as u16 + 8).min(viewport.height.max(8));
        let (x, y0, w) = card(fb, viewport, h);

        let mut y = y0 + 1;
        fb.put_str_centered(x, y, w, "HIGH SCORES", theme::TITLE);

        // Tabs: All  Easy  Medium  Hard
        y += 1;
        let mut cx = x + w.saturating_sub(26) / 2;
        let tab = |active: bool| if active { theme::CURSOR } else { theme::MUTED };
        cx = fb.put_str(cx, y, "All", tab(board.filter == BoardFilter::All));
        for d in Difficulty::ALL {
            cx = fb.put_str(cx, y, "  ", theme::MUTED);
            cx = fb.put_str(cx, y, d.label(), tab(board.filter == BoardFilter::Only(d)));
        }

        y += 2;
        draw_score_header(fb, x, y);
        y += 1;
        if board.rows.is_empty() {
            fb.put_str_centered(x, y, w, "No scores yet", theme::MUTED);
        }
        for (i, row) in board.rows.iter().take(shown).enumerate() {
            draw_score_row(fb, x, y, i, row);
            y += 1;
        }

        fb.put_str_centered(x, y0 + h - 2, w, "Tab filter  Esc back", theme::MUTED);
    }

    pub fn render(&self, board: &BoardScreen<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(board, viewport, &mut fb);
        fb
    }
}

fn draw_score_header(fb: &mut FrameBuffer, x: u16, y: u16) {
    for (col, label) in [(1, "#"), (4, "Player"), (17, "Tbl"), (21, "Score"), (28, "Time"), (35, "Date")] {
        fb.put_str(x + col, y, label, theme::MUTED);
    }
}

/// One ranked row; `i` is the 0-based rank.
fn draw_score_row(fb: &mut FrameBuffer, x: u16, y: u16, i: usize, row: &ScoreRow<'_>) {
    let rank_style = match i {
        0 => theme::GOLD,
        1 | 2 => theme::TEXT.bold(),
        _ => theme::MUTED,
    };
    let rank = i as u32 + 1;
    fb.put_u32(x + 2 - digits(rank).min(2), y, rank, rank_style);
    let name: String = row.player.chars().take(13).collect();
    fb.put_str(x + 4, y, &name, theme::TEXT);
    fb.put_u32(x + 19 - digits(row.table as u32), y, row.table as u32, theme::TEXT);
    let score_style = score_style(row.score);
    let sx = fb.put_u32(x + 23 - digits(row.score as u32), y, row.score as u32, score_style);
    fb.put_str(sx, y, "/10", theme::MUTED);
    put_duration(fb, x + 28, y, row.total_time_s, theme::TEXT);
    fb.put_str(x + 35, y, row.date, theme::MUTED);
}

/// What the player profile screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileScreen<'a> {
    /// `None` for guest play.
    pub player: Option<&'a str>,
    pub total_games: u32,
    pub total_score: u32,
    /// Best rounds, already ranked.
    pub rows: &'a [ScoreRow<'a>],
    /// Waiting for the player to confirm deletion.
    pub confirm_delete: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileView;

impl ProfileView {
    pub fn render_into(&self, profile: &ProfileScreen<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        let visible = viewport.height.saturating_sub(11).max(1) as usize;
        let shown = profile.rows.len().min(visible);
        let h = (shown.max(1) as u16 + 10).min(viewport.height.max(10));
        let (x, y0, w) = card(fb, viewport, h);

        let mut y = y0 + 1;
        fb.put_str_centered(x, y, w, "PLAYER", theme::TITLE);
        y += 1;
        let Some(name) = profile.player else {
            fb.put_str_centered(x, y, w, "Playing as guest, no profile", theme::MUTED);
            fb.put_str_centered(x, y0 + h - 2, w, "Esc back", theme::MUTED);
            return;
        };
        fb.put_str_centered(x, y, w, name, theme::TEXT.bold());

        // Games 12  Total score 97
        y += 1;
        let stats_w = 6 + digits(profile.total_games) + 14 + digits(profile.total_score);
        let mut cx = x + w.saturating_sub(stats_w) / 2;
        cx = fb.put_str(cx, y, "Games ", theme::MUTED);
        cx = fb.put_u32(cx, y, profile.total_games, theme::TEXT);
        cx = fb.put_str(cx, y, "  Total score ", theme::MUTED);
        fb.put_u32(cx, y, profile.total_score, theme::TEXT);

        y += 2;
        draw_score_header(fb, x, y);
        y += 1;
        if profile.rows.is_empty() {
            fb.put_str_centered(x, y, w, "No rounds yet", theme::MUTED);
        }
        for (i, row) in profile.rows.iter().take(shown).enumerate() {
            draw_score_row(fb, x, y, i, row);
            y += 1;
        }

        if profile.confirm_delete {
            fb.put_str_centered(
                x,
                y0 + h - 2,
                w,
                "Delete player and all scores? Enter yes  Esc no",
                theme::BAD,
            );
        } else {
            fb.put_str_centered(x, y0 + h - 2, w, "d delete player  Esc back", theme::MUTED);
        }
    }

    pub fn render(&self, profile: &ProfileScreen<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(profile, viewport, &mut fb);
        fb
    }
}
