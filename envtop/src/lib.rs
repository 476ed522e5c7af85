//! envtop: inspect the effective environment of Kubernetes workloads.
//!
//! The resolver turns a workload's pod template into resolved variable
//! records, the diff engine compares two such sets, and the session state
//! machine drives browsing, search, guarded secret reveal and diffing.

cfg_if::cfg_if! {
    if #[cfg(feature = "telemetry")] {
        pub use envtop_telemetry as logging;
    } else {
        pub mod log;
        pub use self::log as logging;
    }
}

pub mod config;
pub mod dao;
pub mod diff;
pub mod error;
pub mod filter;
pub mod resolver;
pub mod session;
pub mod structs;
pub mod tasks;
pub mod ui;

pub use error::{Error, Result};
