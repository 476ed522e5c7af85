//! Reveal dialogs: format menu, security confirmation and the revealed value.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tokio::time::Instant;

use crate::session::{RevealConfirm, RevealFormat, RevealMenu, RevealShow};
use crate::ui::{colors, layout::centered};

fn dialog(title: String, color: ratatui::style::Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(title)
}

pub fn draw_menu(f: &mut Frame, area: Rect, menu: &RevealMenu) {
    let rect = centered(area, 44, 6);
    f.render_widget(Clear, rect);

    let items: Vec<ListItem> = RevealFormat::ALL
        .iter()
        .map(|format| ListItem::new(format.label()))
        .collect();
    let list = List::new(items)
        .block(dialog(format!(" Reveal {} as ", menu.target), colors::CHANGED))
        .highlight_symbol("▸ ")
        .highlight_style(Style::default().bg(colors::CURSOR_BG).add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    state.select(Some(menu.cursor));
    f.render_stateful_widget(list, rect, &mut state);
}

pub fn draw_confirm(f: &mut Frame, area: Rect, confirm: &RevealConfirm) {
    let rect = centered(area, 60, 8);
    f.render_widget(Clear, rect);

    let text = vec![
        Line::styled(
            "Security warning",
            Style::default()
                .fg(colors::ERROR)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(format!(
            "{} will be shown in clear text ({}).",
            confirm.target,
            confirm.format.label()
        )),
        Line::raw("Type OK and press Enter to continue."),
        Line::raw(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(colors::MUTED)),
            Span::styled(
                format!("{}_", confirm.input),
                Style::default().fg(colors::DERIVED),
            ),
        ]),
    ];
    f.render_widget(
        Paragraph::new(text).block(dialog(" Confirm reveal ".to_string(), colors::ERROR)),
        rect,
    );
}

pub fn draw_show(f: &mut Frame, area: Rect, show: &RevealShow, now: Instant) {
    let rect = centered(area, area.width.saturating_sub(10).max(40), 9);
    f.render_widget(Clear, rect);

    let text = vec![
        Line::styled(
            show.value.clone(),
            Style::default()
                .fg(colors::DERIVED)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled(
            format!(
                "auto-closes in {}s · any key to hide",
                show.remaining_secs(now)
            ),
            Style::default().fg(colors::MUTED),
        ),
    ];
    f.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(dialog(
                format!(" {} ({}) ", show.target, show.format.label()),
                colors::CHANGED,
            )),
        rect,
    );
}
