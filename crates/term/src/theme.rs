//! Colours shared by the quiz screens.

use crate::fb::{CellStyle, Rgb};
use crate::types::{Difficulty, TimerTone};

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const PANEL_BG: Rgb = Rgb::new(24, 28, 44);

pub const TEXT: CellStyle = CellStyle::plain(Rgb::new(220, 220, 220));
pub const MUTED: CellStyle = CellStyle::plain(Rgb::new(130, 130, 140));
pub const TITLE: CellStyle = CellStyle::plain(Rgb::new(120, 190, 255)).bold();
pub const BORDER: CellStyle = CellStyle::plain(Rgb::new(200, 200, 200));
pub const CURSOR: CellStyle = CellStyle::plain(Rgb::new(250, 220, 90)).bold();
pub const GOOD: CellStyle = CellStyle::plain(Rgb::new(90, 220, 120)).bold();
pub const BAD: CellStyle = CellStyle::plain(Rgb::new(235, 80, 80)).bold();
pub const GOLD: CellStyle = CellStyle::plain(Rgb::new(255, 200, 40)).bold();

pub const CALM: Rgb = Rgb::new(220, 220, 220);
pub const HURRY: Rgb = Rgb::new(255, 165, 0);
pub const CRITICAL: Rgb = Rgb::new(235, 60, 60);

pub fn tone_style(tone: TimerTone) -> CellStyle {
    match tone {
        TimerTone::Calm => CellStyle::plain(CALM),
        TimerTone::Hurry => CellStyle::plain(HURRY).bold(),
        TimerTone::Critical => CellStyle::plain(CRITICAL).bold(),
    }
}

pub fn difficulty_style(d: Difficulty) -> CellStyle {
    match d {
        Difficulty::Easy => CellStyle::plain(Rgb::new(90, 220, 120)),
        Difficulty::Medium => CellStyle::plain(Rgb::new(240, 200, 80)),
        Difficulty::Hard => CellStyle::plain(Rgb::new(235, 90, 90)),
    }
}
