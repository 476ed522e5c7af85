//! Namespaces, Apps and Env panes.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
    Frame,
};

use crate::session::{Mode, Pane, Session};
use crate::structs::EnvVarRecord;
use crate::ui::{colors, layout::AppLayout};

pub fn draw_panes(f: &mut Frame, layout: &AppLayout, session: &Session) {
    draw_pane(f, layout.namespaces, session, Pane::Namespaces);
    draw_pane(f, layout.apps, session, Pane::Apps);
    draw_pane(f, layout.env, session, Pane::Env);
}

fn env_row(record: &EnvVarRecord) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            record.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" = ", Style::default().fg(colors::MUTED)),
        Span::raw(record.display_value.clone()),
        Span::raw("  "),
        Span::styled(
            record.source_label(),
            Style::default().fg(colors::source_color(record.source_kind)),
        ),
        Span::styled(record.annotation(), Style::default().fg(colors::MUTED)),
    ])
}

fn row(session: &Session, pane: Pane, idx: usize) -> Option<Line<'static>> {
    match pane {
        Pane::Namespaces => session.namespaces().items().get(idx).map(|ns| Line::raw(ns.clone())),
        Pane::Apps => session.apps().items().get(idx).map(|app| {
            Line::from(vec![
                Span::raw(app.name.clone()),
                Span::styled(format!(" {}", app.kind.badge()), Style::default().fg(colors::MUTED)),
            ])
        }),
        Pane::Env => session.env().items().get(idx).map(env_row),
    }
}

fn pane_state(session: &Session, pane: Pane) -> (usize, Option<usize>) {
    match pane {
        Pane::Namespaces => (session.namespaces().cursor(), session.namespaces().selected()),
        Pane::Apps => (session.apps().cursor(), session.apps().selected()),
        Pane::Env => (session.env().cursor(), session.env().selected()),
    }
}

fn draw_pane(f: &mut Frame, area: Rect, session: &Session, pane: Pane) {
    let focused = session.focus() == pane;
    let search = match session.mode() {
        Mode::Search(search) if search.pane == pane => Some(search),
        _ => None,
    };

    let (cursor, selected) = pane_state(session, pane);
    let (indices, cursor): (Vec<usize>, usize) = match search {
        Some(search) => (search.matches.clone(), search.cursor),
        None => ((0..session.pane_len(pane)).collect(), cursor),
    };

    let items: Vec<ListItem> = indices
        .iter()
        .filter_map(|&idx| {
            let line = row(session, pane, idx)?;
            if selected == Some(idx) && pane != Pane::Env {
                Some(ListItem::new(line.style(Style::default().fg(colors::SELECTED))))
            } else {
                Some(ListItem::new(line))
            }
        })
        .collect();

    let mut title = format!(" {} ({}) ", pane.title(), session.pane_len(pane));
    if let Some(search) = search {
        title = format!(" {} /{}_ ", pane.title(), search.query);
    }
    let border = if focused { colors::FOCUS } else { colors::MUTED };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused { BorderType::Thick } else { BorderType::Rounded })
        .border_style(Style::default().fg(border))
        .title(title);

    let shown = items.len();
    let list = List::new(items)
        .block(block)
        .highlight_symbol("▸ ")
        .highlight_style(if focused {
            Style::default().bg(colors::CURSOR_BG).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        });

    let mut state = ListState::default();
    if shown > 0 {
        state.select(Some(cursor.min(shown - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}
