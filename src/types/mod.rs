// TabShell shared type definitions
// Each submodule defines types used by both the host and the UI layer.

pub mod chrome;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod message;
pub mod tab;
pub mod update;
