//! Single-line key hints for the current mode.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::session::{Mode, Pane, Session};
use crate::ui::colors;

/// One `key:desc` pair, followed by a separator unless it is the last.
fn hint_spans<'a>(key: &'a str, desc: &'a str, last: bool) -> [Span<'a>; 3] {
    let separator = if last { "" } else { " │ " };
    [
        Span::styled(key, Style::default().fg(colors::DERIVED).add_modifier(Modifier::BOLD)),
        Span::styled(format!(":{desc}"), Style::default().fg(colors::MUTED)),
        Span::styled(separator, Style::default().fg(colors::MUTED)),
    ]
}

/// Renders `hints` as `key:desc │ key:desc`.
pub fn draw_help_bar(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let spans: Vec<Span> = hints
        .iter()
        .enumerate()
        .flat_map(|(i, (key, desc))| hint_spans(key, desc, i + 1 == hints.len()))
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Hints for the session's current mode and focus.
pub fn session_hints(session: &Session) -> Vec<(&'static str, &'static str)> {
    match session.mode() {
        Mode::Normal => {
            let mut hints = vec![
                ("Tab", "switch"),
                ("j/k", "move"),
                ("Enter", "select"),
                ("/", "search"),
            ];
            if session.focus() == Pane::Env && !session.reveal_disabled() {
                hints.push(("r", "reveal"));
            }
            if session.selected_app().is_some() {
                hints.push(("d", "diff"));
            }
            hints.push(("q", "quit"));
            hints
        }
        Mode::Search(_) => vec![
            ("type", "filter"),
            ("↑/↓", "move"),
            ("Enter", "select"),
            ("Esc", "cancel"),
        ],
        Mode::RevealMenu(_) => vec![("j/k", "choose"), ("Enter", "next"), ("n/Esc", "cancel")],
        Mode::RevealConfirm(_) => vec![("OK", "type to confirm"), ("Enter", "reveal"), ("Esc", "cancel")],
        Mode::RevealShow(_) => vec![("any key", "hide")],
        Mode::DiffSelect(_) => vec![("j/k", "choose"), ("Enter", "compare"), ("n/Esc", "cancel")],
        Mode::DiffShow(_) => vec![("j/k", "scroll"), ("PgUp/PgDn", "page"), ("Esc", "back")],
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::config::SessionConfig;
    use crate::session::{Event, Key};

    fn keys_of(hints: &[(&str, &str)]) -> Vec<String> {
        hints.iter().map(|(k, _)| k.to_string()).collect()
    }

    #[test]
    fn test_normal_hints_follow_focus() {
        let (session, _) = Session::new("ctx", SessionConfig::default());
        assert!(!keys_of(&session_hints(&session)).contains(&"r".to_string()));

        let (session, _) = session.update(Event::Key(Key::BackTab));
        assert_eq!(session.focus(), Pane::Env);
        assert!(keys_of(&session_hints(&session)).contains(&"r".to_string()));
    }

    #[test]
    fn test_reveal_hint_hidden_when_disabled() {
        let config = SessionConfig {
            reveal_disabled: true,
            ..SessionConfig::default()
        };
        let (session, _) = Session::new("ctx", config);
        let (session, _) = session.update(Event::Key(Key::BackTab));
        assert!(!keys_of(&session_hints(&session)).contains(&"r".to_string()));
    }

    #[test]
    fn test_help_bar_separates_hints() {
        let mut terminal = Terminal::new(TestBackend::new(40, 1)).unwrap();
        terminal
            .draw(|f| draw_help_bar(f, f.area(), &[("q", "quit"), ("/", "search")]))
            .unwrap();
        let line: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(line.starts_with("q:quit │ /:search "));
    }

    #[test]
    fn test_search_hints() {
        let (session, _) = Session::new("ctx", SessionConfig::default());
        let (session, _) = session.update(Event::Key(Key::Char('/')));
        assert!(keys_of(&session_hints(&session)).contains(&"Esc".to_string()));
    }
}
