// TabShell state managers
// Managers own state: the host's surface registry, per-surface history, and the UI's tab projection.

pub mod session_history;
pub mod tab_manager;
pub mod update_prompt;
pub mod view_registry;
