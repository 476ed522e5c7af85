//! Reusable UI components.

mod header;
mod help_bar;

pub use header::{draw_error_line, draw_header};
pub use help_bar::{draw_help_bar, session_hints};
