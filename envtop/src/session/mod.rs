//! Interactive session state machine.
//!
//! `Session::update` consumes one [`Event`] and returns the next session
//! together with the [`Effect`]s to run. It never touches the cluster or the
//! clock beyond reading `Instant::now()` for the reveal deadline; loads and
//! timers happen in the dispatcher, which reports back with more events.
//!
//! ```text
//!            ┌──── / ────► Search ──── Enter / Esc ───┐
//!            │                                        │
//!  Normal ◄──┼──── r ────► RevealMenu ► RevealConfirm ► RevealShow
//!            │                                        │
//!            └──── d ────► DiffSelect ──► DiffShow ───┘
//! ```

pub mod event;
pub mod mode;
pub mod pane;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::diff::DiffReport;
use crate::filter::filter_indices;
use crate::structs::{EnvVarRecord, Workload};

pub use self::event::{Effect, Event, Key, Load};
pub use self::mode::{
    DiffSelect, DiffShow, Mode, RevealConfirm, RevealFormat, RevealMenu, RevealShow, SearchState,
};
pub use self::pane::{handle_scroll_key, Pane, PaneList, Scrollable};

pub const REVEAL_DISABLED_MSG: &str = "Reveal is disabled (ENVTOP_DISABLE_REVEAL=1)";

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    context: String,
    focus: Pane,
    namespaces: PaneList<String>,
    apps: PaneList<Workload>,
    env: PaneList<EnvVarRecord>,
    mode: Mode,
    loading: bool,
    error: Option<String>,
    reveal_generation: u64,
}

impl Session {
    /// Creates the session and the effect that loads the namespace list.
    pub fn new(context: impl Into<String>, config: SessionConfig) -> (Self, Vec<Effect>) {
        let mut session = Self {
            config,
            context: context.into(),
            focus: Pane::Namespaces,
            namespaces: PaneList::default(),
            apps: PaneList::default(),
            env: PaneList::default(),
            mode: Mode::Normal,
            loading: false,
            error: None,
            reveal_generation: 0,
        };
        let mut effects = Vec::new();
        session.issue(&mut effects, Effect::LoadNamespaces);
        (session, effects)
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn focus(&self) -> Pane {
        self.focus
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn namespaces(&self) -> &PaneList<String> {
        &self.namespaces
    }

    pub fn apps(&self) -> &PaneList<Workload> {
        &self.apps
    }

    pub fn env(&self) -> &PaneList<EnvVarRecord> {
        &self.env
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn reveal_disabled(&self) -> bool {
        self.config.reveal_disabled
    }

    pub fn current_namespace(&self) -> Option<&str> {
        self.namespaces.selected_item().map(String::as_str)
    }

    pub fn selected_app(&self) -> Option<&Workload> {
        self.apps.selected_item()
    }

    /// Number of items in `pane`.
    pub fn pane_len(&self, pane: Pane) -> usize {
        match pane {
            Pane::Namespaces => self.namespaces.len(),
            Pane::Apps => self.apps.len(),
            Pane::Env => self.env.len(),
        }
    }

    /// Name used for searching and listing the item at `idx` of `pane`.
    pub fn item_name(&self, pane: Pane, idx: usize) -> Option<&str> {
        match pane {
            Pane::Namespaces => self.namespaces.items().get(idx).map(String::as_str),
            Pane::Apps => self.apps.items().get(idx).map(|w| w.name.as_str()),
            Pane::Env => self.env.items().get(idx).map(|r| r.name.as_str()),
        }
    }

    pub fn update(mut self, event: Event) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();
        match event {
            Event::Key(key) => self.on_key(key, &mut effects),
            Event::NamespacesLoaded(names) => {
                self.on_namespaces(names, &mut effects);
                self.refresh_search();
            }
            Event::AppsLoaded(apps) => {
                self.on_apps(apps, &mut effects);
                self.refresh_search();
            }
            Event::EnvLoaded(records) => {
                debug!(count = records.len(), "env loaded");
                self.loading = false;
                self.env.replace(records);
                self.refresh_search();
            }
            Event::DiffLoaded(report) => self.on_diff(report),
            Event::LoadFailed { load, message } => {
                info!(%load, %message, "load failed");
                self.loading = false;
                self.error = Some(message);
                if load == Load::Diff && matches!(self.mode, Mode::DiffSelect(_)) {
                    self.mode = Mode::Normal;
                }
            }
            Event::RevealExpired { generation } => {
                if matches!(&self.mode, Mode::RevealShow(show) if show.generation == generation) {
                    debug!(generation, "reveal expired");
                    self.mode = Mode::Normal;
                }
            }
        }
        (self, effects)
    }

    /// Records a load request: sets `loading` and clears the last error.
    fn issue(&mut self, effects: &mut Vec<Effect>, effect: Effect) {
        self.loading = true;
        self.error = None;
        effects.push(effect);
    }

    fn on_namespaces(&mut self, names: Vec<String>, effects: &mut Vec<Effect>) {
        self.loading = false;
        self.namespaces.replace_keeping_selection(names);
        if self.namespaces.selected().is_none() {
            if let Some(ns) = self.namespaces.commit().cloned() {
                self.issue(effects, Effect::LoadApps(ns));
            }
        }
    }

    fn on_apps(&mut self, apps: Vec<Workload>, effects: &mut Vec<Effect>) {
        self.loading = false;
        self.apps.replace(apps);
        if let Some(app) = self.apps.commit().cloned() {
            self.env.reset();
            self.issue(effects, Effect::ResolveEnv(app));
        }
    }

    fn on_diff(&mut self, report: DiffReport) {
        self.loading = false;
        match self.mode {
            Mode::Normal | Mode::DiffSelect(_) => {
                self.mode = Mode::DiffShow(DiffShow { report, scroll: 0 });
            }
            _ => debug!(mode = self.mode.name(), "ignoring diff result"),
        }
    }

    fn on_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        let mode = std::mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match mode {
            Mode::Normal => {
                self.normal_key(key, effects);
                return;
            }
            Mode::Search(search) => self.search_key(search, key, effects),
            Mode::RevealMenu(menu) => reveal_menu_key(menu, key),
            Mode::RevealConfirm(confirm) => self.reveal_confirm_key(confirm, key, effects),
            Mode::RevealShow(_) => {
                effects.push(Effect::CancelRevealExpiry);
                Mode::Normal
            }
            Mode::DiffSelect(select) => self.diff_select_key(select, key, effects),
            Mode::DiffShow(mut show) => {
                if key.is_cancel() {
                    Mode::Normal
                } else {
                    handle_scroll_key(&mut show, key);
                    Mode::DiffShow(show)
                }
            }
        };
    }

    fn normal_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        match key {
            Key::Char('q') | Key::Ctrl('c') => effects.push(Effect::Quit),
            Key::Tab => self.focus = self.focus.next(),
            Key::BackTab => self.focus = self.focus.prev(),
            Key::Char('h') | Key::Left => self.focus = self.focus.left(),
            Key::Char('l') | Key::Right => self.focus = self.focus.right(),
            Key::Enter => self.confirm(effects),
            Key::Char('/') => self.start_search(),
            Key::Char('r') => self.start_reveal(),
            Key::Char('d') => self.start_diff(),
            other => {
                match self.focus {
                    Pane::Namespaces => handle_scroll_key(&mut self.namespaces, other),
                    Pane::Apps => handle_scroll_key(&mut self.apps, other),
                    Pane::Env => handle_scroll_key(&mut self.env, other),
                };
            }
        }
    }

    /// Commits the focused pane's cursor and starts the dependent load.
    fn confirm(&mut self, effects: &mut Vec<Effect>) {
        match self.focus {
            Pane::Namespaces => {
                if let Some(ns) = self.namespaces.commit().cloned() {
                    self.apps.reset();
                    self.env.reset();
                    self.issue(effects, Effect::LoadApps(ns));
                }
            }
            Pane::Apps => {
                if let Some(app) = self.apps.commit().cloned() {
                    self.env.reset();
                    self.issue(effects, Effect::ResolveEnv(app));
                }
            }
            Pane::Env => {
                self.env.commit();
            }
        }
    }

    fn filter(&self, pane: Pane, query: &str) -> Vec<usize> {
        match pane {
            Pane::Namespaces => filter_indices(self.namespaces.items(), query, |n| n.as_str()),
            Pane::Apps => filter_indices(self.apps.items(), query, |w| w.name.as_str()),
            Pane::Env => filter_indices(self.env.items(), query, |r| r.name.as_str()),
        }
    }

    /// Re-runs an active search after its pane's items were replaced.
    fn refresh_search(&mut self) {
        let Mode::Search(search) = &self.mode else {
            return;
        };
        let matches = self.filter(search.pane, &search.query);
        if let Mode::Search(search) = &mut self.mode {
            search.cursor = search.cursor.min(matches.len().saturating_sub(1));
            search.matches = matches;
        }
    }

    fn start_search(&mut self) {
        let pane = self.focus;
        let cursor = match pane {
            Pane::Namespaces => self.namespaces.cursor(),
            Pane::Apps => self.apps.cursor(),
            Pane::Env => self.env.cursor(),
        };
        self.mode = Mode::Search(SearchState {
            pane,
            query: String::new(),
            matches: self.filter(pane, ""),
            cursor,
        });
    }

    fn search_key(&mut self, mut search: SearchState, key: Key, effects: &mut Vec<Effect>) -> Mode {
        if key.is_cancel() {
            return Mode::Normal;
        }
        match key {
            Key::Enter => {
                if let Some(idx) = search.current() {
                    self.focus = search.pane;
                    match search.pane {
                        Pane::Namespaces => self.namespaces.set_cursor(idx),
                        Pane::Apps => self.apps.set_cursor(idx),
                        Pane::Env => self.env.set_cursor(idx),
                    }
                    self.confirm(effects);
                }
                return Mode::Normal;
            }
            Key::Char(c) => {
                search.query.push(c);
                search.matches = self.filter(search.pane, &search.query);
                search.cursor = 0;
            }
            Key::Backspace => {
                search.query.pop();
                search.matches = self.filter(search.pane, &search.query);
                search.cursor = 0;
            }
            Key::Up | Key::Down | Key::Ctrl('p') | Key::Ctrl('n') | Key::PageUp | Key::PageDown => {
                handle_scroll_key(&mut search, key);
            }
            _ => {}
        }
        Mode::Search(search)
    }

    fn start_reveal(&mut self) {
        if self.focus != Pane::Env {
            return;
        }
        let Some(record) = self.env.current() else {
            return;
        };
        if !record.is_secret() || record.raw_bytes.is_none() {
            return;
        }
        if self.config.reveal_disabled {
            self.error = Some(REVEAL_DISABLED_MSG.to_string());
            return;
        }
        self.mode = Mode::RevealMenu(RevealMenu {
            target: record.name.clone(),
            cursor: 0,
        });
    }

    fn reveal_confirm_key(
        &mut self,
        mut confirm: RevealConfirm,
        key: Key,
        effects: &mut Vec<Effect>,
    ) -> Mode {
        if key.is_cancel() {
            return Mode::Normal;
        }
        match key {
            Key::Char(c) => confirm.push(c),
            Key::Backspace => {
                confirm.input.pop();
            }
            Key::Enter if confirm.is_confirmed() => return self.reveal(confirm, effects),
            _ => {}
        }
        Mode::RevealConfirm(confirm)
    }

    fn reveal(&mut self, confirm: RevealConfirm, effects: &mut Vec<Effect>) -> Mode {
        let raw = self
            .env
            .items()
            .iter()
            .find(|r| r.name == confirm.target)
            .and_then(|r| r.raw_bytes.as_ref());
        let Some(raw) = raw else {
            self.error = Some(format!("{} is no longer loaded", confirm.target));
            return Mode::Normal;
        };

        let value = confirm.format.render(raw.expose());
        self.reveal_generation += 1;
        let generation = self.reveal_generation;
        let after = self.config.reveal_timeout;
        info!(target_var = %confirm.target, format = confirm.format.label(), "revealing secret");
        effects.push(Effect::ScheduleRevealExpiry { generation, after });

        Mode::RevealShow(RevealShow {
            target: confirm.target,
            format: confirm.format,
            value,
            generation,
            deadline: Instant::now() + after,
        })
    }

    fn start_diff(&mut self) {
        let (Some(app), Some(current)) = (self.selected_app(), self.current_namespace()) else {
            return;
        };
        debug!(app = %app.name, "choosing diff namespace");
        let others: Vec<String> = self
            .namespaces
            .items()
            .iter()
            .filter(|ns| ns.as_str() != current)
            .cloned()
            .collect();
        if others.is_empty() {
            return;
        }
        self.mode = Mode::DiffSelect(DiffSelect {
            namespaces: others,
            cursor: 0,
        });
    }

    fn diff_select_key(
        &mut self,
        mut select: DiffSelect,
        key: Key,
        effects: &mut Vec<Effect>,
    ) -> Mode {
        if key.is_cancel() || key == Key::Char('n') {
            return Mode::Normal;
        }
        if key == Key::Enter {
            if let (Some(app), Some(other)) = (self.selected_app().cloned(), select.current()) {
                let effect = Effect::ResolveDiff {
                    namespace_a: app.namespace.clone(),
                    namespace_b: other.clone(),
                    workload: app,
                };
                self.issue(effects, effect);
            }
        } else {
            handle_scroll_key(&mut select, key);
        }
        Mode::DiffSelect(select)
    }
}

fn reveal_menu_key(mut menu: RevealMenu, key: Key) -> Mode {
    if key.is_cancel() || key == Key::Char('n') {
        return Mode::Normal;
    }
    match key {
        Key::Enter => {
            let format = menu.choice();
            return Mode::RevealConfirm(RevealConfirm {
                target: menu.target,
                format,
                input: String::new(),
            });
        }
        Key::Up | Key::Char('k') | Key::Ctrl('p') => menu.move_by(-1),
        Key::Down | Key::Char('j') | Key::Ctrl('n') => menu.move_by(1),
        _ => {}
    }
    Mode::RevealMenu(menu)
}
