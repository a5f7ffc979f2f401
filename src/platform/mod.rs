// TabShell platform abstraction
// Per-OS paths and the system "open in browser" hook.
//
// `cfg(target_os)` selects the implementation at compile time. Targets other
// than the three desktop platforms fall back to the Linux conventions.

use std::path::PathBuf;
use std::process::Command;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
mod linux;

#[cfg(target_os = "macos")]
use macos as imp;

#[cfg(target_os = "windows")]
use windows as imp;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
use linux as imp;

/// Directory holding `config.json`.
///
/// - **Linux**: `$XDG_CONFIG_HOME/tabshell` or `~/.config/tabshell`
/// - **macOS**: `~/Library/Application Support/TabShell`
/// - **Windows**: `%APPDATA%/TabShell`
pub fn get_config_dir() -> PathBuf {
    imp::get_config_dir()
}

/// Where downloaded update artifacts are written.
///
/// - **Linux**: `$XDG_DOWNLOAD_DIR` or `~/Downloads`
/// - **macOS**: `~/Downloads`
/// - **Windows**: `%USERPROFILE%/Desktop`
pub fn get_download_dir() -> PathBuf {
    imp::get_download_dir()
}

/// Hands `url` to the system default browser. Failures are logged only.
pub fn open_external(url: &str) {
    if launch(imp::open_command(url)).is_some() {
        info!(url, "opened in system browser");
    }
}

/// Spawns `command` and reaps it on a detached thread so the launcher never
/// lingers as a zombie.
fn launch(mut command: Command) -> Option<JoinHandle<()>> {
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(program = ?command.get_program(), error = %e, "failed to launch");
            return None;
        }
    };
    let reaper = thread::Builder::new()
        .name("launcher-reaper".into())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => debug!(%status, "launcher exited with failure"),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "failed to wait for launcher"),
        });
    match reaper {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "failed to start launcher reaper");
            None
        }
    }
}
