//! Title line: context, selection and loading indicator.

use ratatui::{
    prelude::*,
    style::{palette::tailwind, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::session::Session;
use crate::ui::colors;

pub fn header_line(session: &Session) -> Line<'static> {
    let label = Style::default().fg(tailwind::GRAY.c400);
    let value = Style::default()
        .fg(colors::ACCENT)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(
            "envtop",
            Style::default()
                .fg(colors::SELECTED)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ctx: ", label),
        Span::styled(session.context().to_string(), value),
    ];

    if let Some(ns) = session.current_namespace() {
        spans.push(Span::styled("  ns: ", label));
        spans.push(Span::styled(ns.to_string(), value));
    }
    if let Some(app) = session.selected_app() {
        spans.push(Span::styled("  app: ", label));
        spans.push(Span::styled(format!("{} {}", app.name, app.kind.badge()), value));
    }
    if session.is_loading() {
        spans.push(Span::styled("  loading…", Style::default().fg(colors::SEALED)));
    }
    Line::from(spans)
}

pub fn draw_header(f: &mut Frame, area: Rect, session: &Session) {
    f.render_widget(Paragraph::new(header_line(session)), area);
}

/// Non-modal error line; empty when there is nothing to report.
pub fn draw_error_line(f: &mut Frame, area: Rect, session: &Session) {
    if let Some(err) = session.error() {
        f.render_widget(
            Paragraph::new(format!("error: {err}")).style(Style::default().fg(colors::ERROR)),
            area,
        );
    }
}
