// TabShell services
// Services do the work behind the managers: command execution on the host,
// layout math, surface event translation, configuration and updates.

pub mod config_loader;
pub mod layout_controller;
pub mod navigation_relay;
pub mod shell_host;
pub mod update_coordinator;
