//! Diff namespace picker and the comparison table.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table},
    Frame,
};

use crate::diff::{DiffResult, DiffStatus, DiffSummary};
use crate::session::{DiffSelect, DiffShow, Session};
use crate::structs::EnvVarRecord;
use crate::ui::{colors, layout::centered};

const NOT_PRESENT: &str = "(not present)";

pub fn draw_select(f: &mut Frame, area: Rect, session: &Session, select: &DiffSelect) {
    let height = (select.namespaces.len() as u16).saturating_add(2).min(15);
    let rect = centered(area, 50, height);
    f.render_widget(Clear, rect);

    let app = session
        .selected_app()
        .map(|w| w.name.as_str())
        .unwrap_or_default();
    let items: Vec<ListItem> = select
        .namespaces
        .iter()
        .map(|ns| ListItem::new(ns.as_str()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(colors::ACCENT))
                .title(format!(" Diff {app} against ")),
        )
        .highlight_symbol("▸ ")
        .highlight_style(Style::default().bg(colors::CURSOR_BG).add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    state.select(Some(select.cursor));
    f.render_stateful_widget(list, rect, &mut state);
}

fn summary_line(summary: &DiffSummary) -> Line<'static> {
    let sep = || Span::styled(" │ ", Style::default().fg(colors::MUTED));
    let count = |status: DiffStatus, n: usize| {
        Span::styled(
            format!("{} {n}", status.as_str()),
            Style::default().fg(colors::status_color(status)),
        )
    };
    Line::from(vec![
        count(DiffStatus::Same, summary.same),
        sep(),
        count(DiffStatus::ValueDiff, summary.changed),
        sep(),
        count(DiffStatus::OnlyInA, summary.only_a),
        sep(),
        count(DiffStatus::OnlyInB, summary.only_b),
    ])
}

fn value_cell(record: Option<&EnvVarRecord>) -> Cell<'static> {
    match record {
        Some(r) => Cell::from(format!("{}{}", r.display_value, r.annotation())),
        None => Cell::from(NOT_PRESENT).style(Style::default().fg(colors::MUTED)),
    }
}

fn result_row(result: &DiffResult) -> Row<'static> {
    let color = colors::status_color(result.status);
    Row::new(vec![
        Cell::from(result.status.as_str()).style(Style::default().fg(color)),
        Cell::from(result.name.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
        value_cell(result.record_a.as_ref()),
        value_cell(result.record_b.as_ref()),
    ])
}

pub fn draw_show(f: &mut Frame, area: Rect, show: &DiffShow) {
    f.render_widget(Clear, area);
    let report = &show.report;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::ACCENT))
        .title(format!(
            " {}: {} ↔ {} ",
            report.workload_name, report.namespace_a, report.namespace_b
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [summary_area, table_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
    f.render_widget(Paragraph::new(summary_line(&report.summary)), summary_area);

    if report.results.is_empty() {
        f.render_widget(
            Paragraph::new("No variables on either side").style(Style::default().fg(colors::MUTED)),
            table_area,
        );
        return;
    }

    let header = Row::new(vec![
        Cell::from("STATUS"),
        Cell::from("NAME"),
        Cell::from(report.namespace_a.clone()),
        Cell::from(report.namespace_b.clone()),
    ])
    .style(Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = report.results.iter().skip(show.scroll).map(result_row).collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Percentage(25),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .column_spacing(1);
    f.render_widget(table, table_area);
}
