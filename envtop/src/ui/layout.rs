//! Screen layout.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ header: context, namespace/app, loading  │
//! ├────────────────────┬─────────────────────┤
//! │     Namespaces     │        Apps         │
//! ├────────────────────┴─────────────────────┤
//! │                   Env                    │
//! ├──────────────────────────────────────────┤
//! │ error line                               │
//! │ help bar                                 │
//! └──────────────────────────────────────────┘
//! ```

use ratatui::layout::{Constraint, Flex, Layout, Rect};

#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub header: Rect,
    pub namespaces: Rect,
    pub apps: Rect,
    pub env: Rect,
    pub error: Rect,
    pub help: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect) -> Self {
        let [header, top, env, error, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Percentage(35),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let [namespaces, apps] =
            Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
                .areas(top);

        Self {
            header,
            namespaces,
            apps,
            env,
            error,
            help,
        }
    }
}

/// Rectangle of `width` x `height` centred in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}
