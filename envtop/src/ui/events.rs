//! Terminal input translation.
//!
//! Maps crossterm events onto the session's terminal-independent [`Key`].

use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::Key;

/// Converts a terminal event into a session key.
///
/// Key releases, mouse, focus and paste events yield `None`.
pub fn to_key(event: &TermEvent) -> Option<Key> {
    match event {
        TermEvent::Key(key) if key.kind != KeyEventKind::Release => key_to_key(key),
        _ => None,
    }
}

fn key_to_key(key: &KeyEvent) -> Option<Key> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char(c) = key.code {
            return Some(Key::Ctrl(c.to_ascii_lowercase()));
        }
    }

    let key = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => return None,
    };
    Some(key)
}

/// Whether the terminal changed size and needs a full redraw.
pub fn is_resize(event: &TermEvent) -> bool {
    matches!(event, TermEvent::Resize(..))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> TermEvent {
        TermEvent::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(to_key(&press(KeyCode::Char('r'), KeyModifiers::NONE)), Some(Key::Char('r')));
        assert_eq!(to_key(&press(KeyCode::Enter, KeyModifiers::NONE)), Some(Key::Enter));
        assert_eq!(to_key(&press(KeyCode::Up, KeyModifiers::NONE)), Some(Key::Up));
        assert_eq!(to_key(&press(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_shifted_chars_stay_chars() {
        assert_eq!(
            to_key(&press(KeyCode::Char('K'), KeyModifiers::SHIFT)),
            Some(Key::Char('K'))
        );
    }

    #[test]
    fn test_ctrl_keys() {
        assert_eq!(
            to_key(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Key::Ctrl('c'))
        );
        assert_eq!(
            to_key(&press(KeyCode::Char('N'), KeyModifiers::CONTROL | KeyModifiers::SHIFT)),
            Some(Key::Ctrl('n'))
        );
    }

    #[test]
    fn test_back_tab_variants() {
        assert_eq!(to_key(&press(KeyCode::BackTab, KeyModifiers::SHIFT)), Some(Key::BackTab));
        assert_eq!(to_key(&press(KeyCode::Tab, KeyModifiers::SHIFT)), Some(Key::BackTab));
        assert_eq!(to_key(&press(KeyCode::Tab, KeyModifiers::NONE)), Some(Key::Tab));
    }

    #[test]
    fn test_release_and_resize() {
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(to_key(&TermEvent::Key(release)), None);

        assert!(is_resize(&TermEvent::Resize(80, 24)));
        assert_eq!(to_key(&TermEvent::Resize(80, 24)), None);
    }
}
