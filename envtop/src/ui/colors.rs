//! envtop palette.
//!
//! Every widget takes its colours from here.

use ratatui::style::Color;

use crate::diff::DiffStatus;
use crate::structs::SourceKind;

/// Variables only present on the right-hand side of a diff.
pub const ADDED: Color = Color::Rgb(0x60, 0x8B, 0x4E);
/// Secrets and changed diff rows.
pub const CHANGED: Color = Color::Rgb(0xD1, 0x9A, 0x66);
pub const ERROR: Color = Color::Rgb(0xD1, 0x69, 0x69);
/// Values computed by the kubelet (field and resource refs), key hints.
pub const DERIVED: Color = Color::Rgb(0xDC, 0xDC, 0xAA);
pub const ACCENT: Color = Color::Rgb(0x56, 0x9C, 0xD6);
/// Committed namespace/app and ConfigMap sources.
pub const SELECTED: Color = Color::Rgb(0x4E, 0xC9, 0xB0);
pub const SEALED: Color = Color::Rgb(0xC5, 0x86, 0xC0);
pub const MUTED: Color = Color::Rgb(0x66, 0x66, 0x66);
pub const CURSOR_BG: Color = Color::Rgb(0x3E, 0x44, 0x51);

/// Border of the focused pane.
pub const FOCUS: Color = ACCENT;

pub fn source_color(kind: SourceKind) -> Color {
    match kind {
        SourceKind::Inline => Color::Reset,
        SourceKind::ConfigMap => SELECTED,
        SourceKind::Secret => CHANGED,
        SourceKind::SealedSecret => SEALED,
        SourceKind::FieldRef | SourceKind::ResourceRef => DERIVED,
    }
}

pub fn status_color(status: DiffStatus) -> Color {
    match status {
        DiffStatus::Same => MUTED,
        DiffStatus::ValueDiff => CHANGED,
        DiffStatus::OnlyInA => ERROR,
        DiffStatus::OnlyInB => ADDED,
    }
}
