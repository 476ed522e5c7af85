//! View modes and the sub-state each one carries.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::time::Instant;

use super::pane::{clamp_move, Pane, Scrollable, PAGE_SIZE};
use crate::diff::DiffReport;

/// Longest confirmation text accepted in the reveal prompt.
pub const CONFIRM_MAX_LEN: usize = 10;
/// Text that unlocks a reveal. Case-sensitive.
pub const CONFIRM_PHRASE: &str = "OK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Search(SearchState),
    RevealMenu(RevealMenu),
    RevealConfirm(RevealConfirm),
    RevealShow(RevealShow),
    DiffSelect(DiffSelect),
    DiffShow(DiffShow),
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal => "Normal",
            Mode::Search(_) => "Search",
            Mode::RevealMenu(_) => "RevealMenu",
            Mode::RevealConfirm(_) => "RevealConfirm",
            Mode::RevealShow(_) => "RevealShow",
            Mode::DiffSelect(_) => "DiffSelect",
            Mode::DiffShow(_) => "DiffShow",
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Mode::Normal)
    }
}

/// Incremental filter over one pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub pane: Pane,
    pub query: String,
    /// Indices into the pane's items that match `query`.
    pub matches: Vec<usize>,
    /// Position inside `matches`.
    pub cursor: usize,
}

impl SearchState {
    /// Underlying pane index under the filtered cursor.
    pub fn current(&self) -> Option<usize> {
        self.matches.get(self.cursor).copied()
    }

    fn move_by(&mut self, delta: isize) {
        self.cursor = clamp_move(self.cursor, delta, self.matches.len());
    }
}

impl Scrollable for SearchState {
    fn scroll_down(&mut self) {
        self.move_by(1);
    }

    fn scroll_up(&mut self) {
        self.move_by(-1);
    }

    fn scroll_page_down(&mut self) {
        self.move_by(PAGE_SIZE as isize);
    }

    fn scroll_page_up(&mut self) {
        self.move_by(-(PAGE_SIZE as isize));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealFormat {
    Base64,
    PlainText,
}

impl RevealFormat {
    pub const ALL: [RevealFormat; 2] = [RevealFormat::Base64, RevealFormat::PlainText];

    pub fn label(&self) -> &'static str {
        match self {
            RevealFormat::Base64 => "Base64",
            RevealFormat::PlainText => "Plain Text",
        }
    }

    /// Renders raw secret bytes. Invalid UTF-8 is replaced in plain text.
    pub fn render(&self, raw: &[u8]) -> String {
        match self {
            RevealFormat::Base64 => STANDARD.encode(raw),
            RevealFormat::PlainText => String::from_utf8_lossy(raw).into_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealMenu {
    /// Name of the record to reveal.
    pub target: String,
    pub cursor: usize,
}

impl RevealMenu {
    pub fn choice(&self) -> RevealFormat {
        RevealFormat::ALL[self.cursor.min(RevealFormat::ALL.len() - 1)]
    }

    pub fn move_by(&mut self, delta: isize) {
        self.cursor = clamp_move(self.cursor, delta, RevealFormat::ALL.len());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealConfirm {
    pub target: String,
    pub format: RevealFormat,
    pub input: String,
}

impl RevealConfirm {
    pub fn push(&mut self, c: char) {
        if self.input.chars().count() < CONFIRM_MAX_LEN {
            self.input.push(c);
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.input == CONFIRM_PHRASE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealShow {
    pub target: String,
    pub format: RevealFormat,
    pub value: String,
    pub generation: u64,
    pub deadline: Instant,
}

impl RevealShow {
    /// Whole seconds left before the value is hidden, rounded up.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        let left = self.deadline.saturating_duration_since(now);
        left.as_secs() + u64::from(left.subsec_nanos() > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSelect {
    /// Candidate namespaces, excluding the current one.
    pub namespaces: Vec<String>,
    pub cursor: usize,
}

impl DiffSelect {
    pub fn current(&self) -> Option<&String> {
        self.namespaces.get(self.cursor)
    }
}

impl Scrollable for DiffSelect {
    fn scroll_down(&mut self) {
        self.cursor = clamp_move(self.cursor, 1, self.namespaces.len());
    }

    fn scroll_up(&mut self) {
        self.cursor = clamp_move(self.cursor, -1, self.namespaces.len());
    }

    fn scroll_page_down(&mut self) {
        self.cursor = clamp_move(self.cursor, PAGE_SIZE as isize, self.namespaces.len());
    }

    fn scroll_page_up(&mut self) {
        self.cursor = clamp_move(self.cursor, -(PAGE_SIZE as isize), self.namespaces.len());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffShow {
    pub report: DiffReport,
    /// First visible result row.
    pub scroll: usize,
}

impl Scrollable for DiffShow {
    fn scroll_down(&mut self) {
        self.scroll = clamp_move(self.scroll, 1, self.report.results.len());
    }

    fn scroll_up(&mut self) {
        self.scroll = clamp_move(self.scroll, -1, self.report.results.len());
    }

    fn scroll_page_down(&mut self) {
        self.scroll = clamp_move(self.scroll, PAGE_SIZE as isize, self.report.results.len());
    }

    fn scroll_page_up(&mut self) {
        self.scroll = clamp_move(self.scroll, -(PAGE_SIZE as isize), self.report.results.len());
    }
}
