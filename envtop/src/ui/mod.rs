//! Terminal UI for envtop.
//!
//! Renders the session with ratatui over crossterm. Nothing in here mutates
//! session state directly: input is translated to [`crate::session::Key`] and
//! fed through `Session::update`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          runner.rs                              │
//! │  TerminalGuard ─── run: EventStream + task events + tick        │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           views/                                │
//! │  panes ─── reveal dialogs ─── diff picker / table               │
//! └───────┬─────────────────────────────────────────────────────────┘
//!         │
//!         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        components/                              │
//! │  Header ─── ErrorLine ─── HelpBar                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod colors;
pub mod components;
pub mod events;
pub mod layout;
pub mod runner;
pub mod views;

pub use runner::{run, TerminalGuard};
