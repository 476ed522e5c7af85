//! Inputs and outputs of the session state machine.

use std::fmt;
use std::time::Duration;

use crate::diff::DiffReport;
use crate::structs::{EnvVarRecord, Workload};

/// Terminal-independent key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// Character pressed together with Ctrl.
    Ctrl(char),
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
}

impl Key {
    /// Esc and Ctrl-C both back out of a modal state.
    pub fn is_cancel(&self) -> bool {
        matches!(self, Key::Esc | Key::Ctrl('c'))
    }
}

/// Which background load a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Load {
    Namespaces,
    Apps,
    Env,
    Diff,
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Load::Namespaces => "namespaces",
            Load::Apps => "apps",
            Load::Env => "env",
            Load::Diff => "diff",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(Key),
    NamespacesLoaded(Vec<String>),
    AppsLoaded(Vec<Workload>),
    EnvLoaded(Vec<EnvVarRecord>),
    DiffLoaded(DiffReport),
    LoadFailed { load: Load, message: String },
    RevealExpired { generation: u64 },
}

impl From<Key> for Event {
    fn from(key: Key) -> Self {
        Event::Key(key)
    }
}

/// Work requested by the state machine; executed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadNamespaces,
    LoadApps(String),
    ResolveEnv(Workload),
    /// Resolve `workload` by name and kind in both namespaces, then compare.
    ResolveDiff {
        workload: Workload,
        namespace_a: String,
        namespace_b: String,
    },
    ScheduleRevealExpiry { generation: u64, after: Duration },
    CancelRevealExpiry,
    Quit,
}
