//! QuizView: maps a `RoundSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::RoundSnapshot;
use crate::engine::AudioPreferences;
use crate::fb::{CellStyle, FrameBuffer};
use crate::theme;
use crate::types::{RoundEnd, RoundPhase, Verdict, OPTION_COUNT};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// State around the round that the playing screen shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud<'a> {
    /// Highlighted option slot.
    pub cursor: usize,
    pub audio: AudioPreferences,
    pub player: Option<&'a str>,
}

impl Default for Hud<'_> {
    fn default() -> Self {
        Self {
            cursor: 0,
            audio: AudioPreferences::default(),
            player: None,
        }
    }
}

const CARD_W: u16 = 48;
const CARD_H: u16 = 18;
const OPTION_W: u16 = 9;
const OPTION_GAP: u16 = 2;
const BAR_W: u16 = 30;

/// Playing screen renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizView;

impl QuizView {
    /// Render into an existing framebuffer. Callers reuse one framebuffer
    /// across frames and let this resize it.
    pub fn render_into(
        &self,
        snap: &RoundSnapshot,
        hud: &Hud<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let x0 = viewport.width.saturating_sub(CARD_W) / 2;
        let y0 = viewport.height.saturating_sub(CARD_H) / 2;
        let inner_x = x0 + 2;
        let inner_w = CARD_W - 4;
        fb.draw_box(x0, y0, CARD_W, CARD_H, theme::BORDER);

        // Header: table + difficulty on the left, score on the right.
        let mut y = y0 + 1;
        let mut x = fb.put_str(inner_x, y, "Table ", theme::TITLE);
        x = fb.put_u32(x, y, snap.table.get() as u32, theme::TITLE);
        x = fb.put_str(x, y, "  ", theme::TEXT);
        fb.put_str(
            x,
            y,
            snap.difficulty.label(),
            theme::difficulty_style(snap.difficulty),
        );
        let score_x = inner_x + inner_w - 13;
        x = fb.put_str(score_x, y, "Score ", theme::TEXT);
        x = fb.put_u32(x, y, snap.score as u32, theme::GOLD);
        x = fb.put_str(x, y, " / ", theme::MUTED);
        fb.put_u32(x, y, snap.questions_total as u32, theme::MUTED);

        // Question counter + countdown.
        y += 1;
        x = fb.put_str(inner_x, y, "Question ", theme::MUTED);
        x = fb.put_u32(x, y, snap.question_index as u32, theme::TEXT);
        x = fb.put_str(x, y, " of ", theme::MUTED);
        fb.put_u32(x, y, snap.questions_total as u32, theme::TEXT);
        if let Some(player) = hud.player {
            fb.put_str_centered(inner_x, y, inner_w, player, theme::MUTED);
        }
        let tone = theme::tone_style(snap.tone);
        let timer_x = inner_x + inner_w - 5;
        x = fb.put_u32(timer_x, y, snap.seconds_left, tone);
        fb.put_char(x, y, 's', tone);

        y += 1;
        self.draw_timer_bar(fb, inner_x, y, inner_w, snap);

        // Question line.
        y += 2;
        if let Some(q) = snap.question {
            let text_w: u16 = digits(q.multiplier as u32) + 3 + digits(q.multiplicand as u32) + 4;
            let qx = inner_x + inner_w.saturating_sub(text_w) / 2;
            let style = theme::TEXT.bold();
            x = fb.put_u32(qx, y, q.multiplier as u32, style);
            x = fb.put_str(x, y, " × ", style);
            x = fb.put_u32(x, y, q.multiplicand as u32, style);
            fb.put_str(x, y, " = ?", style);
        } else {
            fb.put_str_centered(inner_x, y, inner_w, "Get ready…", theme::MUTED);
        }

        // Options.
        y += 2;
        self.draw_options(fb, inner_x, y, inner_w, snap, hud.cursor);

        // Verdict / end banner.
        y += 4;
        self.draw_banner(fb, inner_x, y, inner_w, snap);

        // Progress.
        y += 2;
        self.draw_progress(fb, inner_x, y, inner_w, snap);

        // Footer: audio + keys.
        y = y0 + CARD_H - 2;
        draw_audio_line(fb, inner_x, y, &hud.audio);
        fb.put_str(inner_x + inner_w - 8, y, "Esc menu", theme::MUTED);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &RoundSnapshot, hud: &Hud<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    fn draw_timer_bar(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, snap: &RoundSnapshot) {
        let bar_x = x + w.saturating_sub(BAR_W) / 2;
        let filled = if snap.time_budget_s == 0 {
            0
        } else {
            ((snap.seconds_left.min(snap.time_budget_s) as u64 * BAR_W as u64)
                / snap.time_budget_s as u64) as u16
        };
        let tone = theme::tone_style(snap.tone);
        fb.fill_rect(bar_x, y, filled, 1, '█', tone);
        fb.fill_rect(bar_x + filled, y, BAR_W - filled, 1, '░', theme::MUTED.dim());
    }

    fn draw_options(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        w: u16,
        snap: &RoundSnapshot,
        cursor: usize,
    ) {
        let Some(q) = snap.question else {
            return;
        };
        let row_w = OPTION_W * OPTION_COUNT as u16 + OPTION_GAP * (OPTION_COUNT as u16 - 1);
        let mut bx = x + w.saturating_sub(row_w) / 2;
        let feedback = matches!(snap.phase, RoundPhase::Feedback(_) | RoundPhase::Finished(_));

        for (slot, &value) in q.options.iter().enumerate() {
            let is_answer = snap.revealed_answer == Some(value);
            let is_wrong_pick = feedback && !is_answer && snap.last_answer == Some(value);
            let style = if feedback && is_answer {
                theme::GOOD
            } else if is_wrong_pick {
                theme::BAD
            } else if slot == cursor && snap.phase == RoundPhase::Active {
                theme::CURSOR
            } else {
                theme::BORDER
            };

            fb.draw_box(bx, y, OPTION_W, 3, style);
            fb.put_u32(bx + 1, y + 1, slot as u32 + 1, theme::MUTED);
            let value_x = bx + OPTION_W - 1 - digits(value) - 1;
            fb.put_u32(value_x, y + 1, value, style.bold());
            bx += OPTION_W + OPTION_GAP;
        }
    }

    fn draw_banner(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, snap: &RoundSnapshot) {
        match snap.phase {
            RoundPhase::Feedback(Verdict::Correct) => {
                fb.put_str_centered(x, y, w, "✓ Correct!", theme::GOOD);
            }
            RoundPhase::Feedback(Verdict::Wrong) => {
                let Some(answer) = snap.revealed_answer else {
                    fb.put_str_centered(x, y, w, "✗ Wrong", theme::BAD);
                    return;
                };
                let text_w = 15 + digits(answer);
                let mut cx = x + w.saturating_sub(text_w) / 2;
                cx = fb.put_str(cx, y, "✗ Wrong, it is ", theme::BAD);
                fb.put_u32(cx, y, answer, theme::BAD);
            }
            RoundPhase::Finished(RoundEnd::TimedOut) => {
                fb.put_str_centered(x, y, w, "TIME'S UP", theme::BAD);
            }
            RoundPhase::Finished(RoundEnd::Completed) => {
                fb.put_str_centered(x, y, w, "ROUND COMPLETE", theme::GOLD);
            }
            RoundPhase::Abandoned => {
                fb.put_str_centered(x, y, w, "Round abandoned", theme::MUTED);
            }
            RoundPhase::Preparing | RoundPhase::Active => {
                fb.put_str_centered(x, y, w, "Pick 1-4, or ←/→ and Enter", theme::MUTED);
            }
        }
    }

    fn draw_progress(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, snap: &RoundSnapshot) {
        let total = snap.questions_total as u16;
        let bar_w = total * 2;
        let bx = x + w.saturating_sub(bar_w) / 2;
        for i in 0..total {
            let done = i < snap.question_index as u16;
            let (ch, style) = if done {
                ('■', theme::TITLE)
            } else {
                ('□', theme::MUTED)
            };
            fb.put_char(bx + i * 2, y, ch, style);
        }
    }
}

/// `[s] sound on  [m] music off  vol 30%`
pub(crate) fn draw_audio_line(fb: &mut FrameBuffer, x: u16, y: u16, audio: &AudioPreferences) {
    let on_off = |muted: bool| if muted { "off" } else { "on" };
    let mut cx = fb.put_str(x, y, "[s] sound ", theme::MUTED);
    cx = fb.put_str(cx, y, on_off(audio.sound_muted), theme::TEXT);
    cx = fb.put_str(cx, y, "  [m] music ", theme::MUTED);
    cx = fb.put_str(cx, y, on_off(audio.music_muted), theme::TEXT);
    cx = fb.put_str(cx, y, "  vol ", theme::MUTED);
    let pct = (audio.music_volume * 100.0).round() as u32;
    cx = fb.put_u32(cx, y, pct, theme::TEXT);
    fb.put_char(cx, y, '%', theme::TEXT);
}

pub(crate) fn digits(mut n: u32) -> u16 {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RoundController;
    use crate::types::{Table, TimerTone};

    fn active_snapshot() -> RoundSnapshot {
        let mut r = RoundController::new(Table::new(7).unwrap(), 99);
        r.start();
        r.snapshot()
    }

    #[test]
    fn renders_question_and_every_option() {
        let snap = active_snapshot();
        let fb = QuizView.render(&snap, &Hud::default(), Viewport::new(80, 24));
        let q = snap.question.unwrap();

        let line = format!("7 × {} = ?", q.multiplicand);
        assert!(fb.contains_text(&line));
        for v in q.options {
            assert!(fb.contains_text(&v.to_string()));
        }
        assert!(fb.contains_text("Table 7"));
        assert!(fb.contains_text("Question 1 of 10"));
        assert!(fb.contains_text("25s"));
    }

    #[test]
    fn cursor_box_is_highlighted() {
        let snap = active_snapshot();
        let hud = Hud {
            cursor: 2,
            ..Hud::default()
        };
        let fb = QuizView.render(&snap, &hud, Viewport::new(80, 24));
        let highlighted = fb
            .cells()
            .iter()
            .filter(|c| c.ch == '┌' && c.style == theme::CURSOR)
            .count();
        assert_eq!(highlighted, 1);
    }

    #[test]
    fn wrong_answer_reveals_the_product() {
        let mut r = RoundController::new(Table::new(6).unwrap(), 5);
        r.start();
        let q = *r.question().unwrap();
        let wrong = q.options.iter().copied().find(|&o| o != q.correct_answer).unwrap();
        r.answer(wrong);

        let fb = QuizView.render(&r.snapshot(), &Hud::default(), Viewport::new(80, 24));
        let text = format!("✗ Wrong, it is {}", q.correct_answer);
        assert!(fb.contains_text(&text));
    }

    #[test]
    fn critical_timer_uses_critical_colour() {
        let mut snap = active_snapshot();
        snap.seconds_left = 4;
        snap.tone = TimerTone::Critical;
        let fb = QuizView.render(&snap, &Hud::default(), Viewport::new(80, 24));
        assert!(fb
            .cells()
            .iter()
            .any(|c| c.ch == '4' && c.style.fg == theme::CRITICAL));
    }

    #[test]
    fn shows_player_and_audio_state() {
        let snap = active_snapshot();
        let hud = Hud {
            cursor: 0,
            audio: AudioPreferences {
                sound_muted: true,
                music_muted: false,
                music_volume: 0.3,
            },
            player: Some("ada"),
        };
        let fb = QuizView.render(&snap, &hud, Viewport::new(80, 24));
        assert!(fb.contains_text("ada"));
        assert!(fb.contains_text("[s] sound off"));
        assert!(fb.contains_text("vol 30%"));
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let snap = active_snapshot();
        let fb = QuizView.render(&snap, &Hud::default(), Viewport::new(10, 4));
        assert_eq!(fb.width(), 10);
    }

    #[test]
    fn digit_count() {
        assert_eq!(digits(0), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
        assert_eq!(digits(100), 3);
    }
}
