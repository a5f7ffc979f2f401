//! TabShell: a multi-tab browser shell.
//!
//! Entry point: loads the configuration and opens the shell window. When
//! built without the `gui` feature there is no window to open.

use tabshell::services::config_loader::{ConfigLoader, ConfigLoaderTrait};
use tabshell::types::config::ShellConfig;
use tracing::{error, info};

fn load_config() -> ShellConfig {
    let mut loader = ConfigLoader::new(None);
    match loader.load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, path = %loader.get_config_path().display(), "invalid configuration, using defaults");
            ShellConfig::default()
        }
    }
}

#[cfg(feature = "gui")]
fn main() {
    tabshell::init_logging();
    let config = load_config();
    info!(version = env!("CARGO_PKG_VERSION"), "starting {}", config.app_name);
    if let Err(e) = tabshell::ui::shell_window::run(config) {
        error!(error = %e, "failed to start the shell window");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "gui"))]
fn main() {
    tabshell::init_logging();
    let config = load_config();
    info!(version = env!("CARGO_PKG_VERSION"), home_url = %config.home_url, "configuration ok");
    tracing::warn!("built without the `gui` feature; rebuild with `--features gui` to open a window");
}
