//! Key mapping from terminal events to quiz actions.

use crate::types::QuizAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to quiz actions.
///
/// Screens decide what an action means; `CursorNext` moves the answer cursor
/// while playing and changes the table on the menu.
pub fn handle_key_event(key: KeyEvent) -> Option<QuizAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        // Direct answers; keys are labelled 1-4, slots are 0-based
        KeyCode::Char(c @ '1'..='4') => Some(QuizAction::Pick(c as u8 - b'1')),

        // Cursor
        KeyCode::Left | KeyCode::Up => Some(QuizAction::CursorPrev),
        KeyCode::Right | KeyCode::Down => Some(QuizAction::CursorNext),
        KeyCode::Enter | KeyCode::Char(' ') => Some(QuizAction::Confirm),
        KeyCode::Esc | KeyCode::Backspace => Some(QuizAction::Back),

        // Audio
        KeyCode::Char('s') | KeyCode::Char('S') => Some(QuizAction::ToggleSound),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(QuizAction::ToggleMusic),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(QuizAction::VolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(QuizAction::VolumeDown),

        // Screens
        KeyCode::Char('r') | KeyCode::Char('R') => Some(QuizAction::Restart),
        KeyCode::Char('h') | KeyCode::Char('H') => Some(QuizAction::HighScores),
        KeyCode::Tab => Some(QuizAction::CycleFilter),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(QuizAction::Profile),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            Some(QuizAction::DeletePlayer)
        }

        _ => None,
    }
}

/// Check if key should quit the program.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    fn key(code: KeyCode) -> Option<QuizAction> {
        handle_key_event(KeyEvent::from(code))
    }

    #[test]
    fn test_digit_picks() {
        assert_eq!(key(KeyCode::Char('1')), Some(QuizAction::Pick(0)));
        assert_eq!(key(KeyCode::Char('4')), Some(QuizAction::Pick(3)));
        assert_eq!(key(KeyCode::Char('5')), None);
        assert_eq!(key(KeyCode::Char('0')), None);
    }

    #[test]
    fn test_cursor_keys() {
        assert_eq!(key(KeyCode::Left), Some(QuizAction::CursorPrev));
        assert_eq!(key(KeyCode::Up), Some(QuizAction::CursorPrev));
        assert_eq!(key(KeyCode::Right), Some(QuizAction::CursorNext));
        assert_eq!(key(KeyCode::Enter), Some(QuizAction::Confirm));
        assert_eq!(key(KeyCode::Char(' ')), Some(QuizAction::Confirm));
        assert_eq!(key(KeyCode::Esc), Some(QuizAction::Back));
    }

    #[test]
    fn test_audio_keys() {
        assert_eq!(key(KeyCode::Char('s')), Some(QuizAction::ToggleSound));
        assert_eq!(key(KeyCode::Char('M')), Some(QuizAction::ToggleMusic));
        assert_eq!(key(KeyCode::Char('+')), Some(QuizAction::VolumeUp));
        assert_eq!(key(KeyCode::Char('=')), Some(QuizAction::VolumeUp));
        assert_eq!(key(KeyCode::Char('-')), Some(QuizAction::VolumeDown));
    }

    #[test]
    fn test_screen_keys() {
        assert_eq!(key(KeyCode::Char('r')), Some(QuizAction::Restart));
        assert_eq!(key(KeyCode::Char('h')), Some(QuizAction::HighScores));
        assert_eq!(key(KeyCode::Tab), Some(QuizAction::CycleFilter));
        assert_eq!(key(KeyCode::Char('p')), Some(QuizAction::Profile));
        assert_eq!(key(KeyCode::Char('D')), Some(QuizAction::DeletePlayer));
        assert_eq!(key(KeyCode::Delete), Some(QuizAction::DeletePlayer));
    }

    #[test]
    fn test_release_ignored() {
        let ev = KeyEvent::new_with_kind(
            KeyCode::Char('1'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(handle_key_event(ev), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
