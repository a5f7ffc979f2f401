//! TabShell: a multi-tab browser shell.
//!
//! Each tab owns an isolated content surface; a thin web-rendered chrome
//! draws the tab bar and toolbar. This library crate exposes all modules for
//! use by the binary and integration tests.

pub mod app;
pub mod ipc_handler;
pub mod managers;
pub mod platform;
pub mod services;
pub mod surface;
pub mod types;

#[cfg(feature = "gui")]
pub mod ui;

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the default
/// `info` level. Safe to call more than once.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .try_init();
}
