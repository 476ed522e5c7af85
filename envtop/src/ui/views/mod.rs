//! Rendering of the whole session.
//!
//! The panes are always drawn; modal states draw their dialog on top.

mod diff;
mod panes;
mod reveal;

use ratatui::{layout::Rect, Frame};
use tokio::time::Instant;

use crate::session::{Mode, Session};
use crate::ui::{
    components::{draw_error_line, draw_header, draw_help_bar, session_hints},
    layout::AppLayout,
};

/// Draws `session`. `now` drives the reveal countdown.
pub fn draw(f: &mut Frame, session: &Session, now: Instant) {
    let area = f.area();
    let layout = AppLayout::compute(area);

    draw_header(f, layout.header, session);
    panes::draw_panes(f, &layout, session);
    draw_error_line(f, layout.error, session);
    draw_help_bar(f, layout.help, &session_hints(session));

    let body = Rect {
        height: area.height.saturating_sub(layout.help.height),
        ..area
    };
    match session.mode() {
        Mode::Normal | Mode::Search(_) => {}
        Mode::RevealMenu(menu) => reveal::draw_menu(f, body, menu),
        Mode::RevealConfirm(confirm) => reveal::draw_confirm(f, body, confirm),
        Mode::RevealShow(show) => reveal::draw_show(f, body, show, now),
        Mode::DiffSelect(select) => diff::draw_select(f, body, session, select),
        Mode::DiffShow(show) => diff::draw_show(f, body, show),
    }
}
