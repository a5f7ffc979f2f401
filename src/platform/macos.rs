// TabShell platform paths for macOS
// Config:    ~/Library/Application Support/TabShell
// Downloads: ~/Downloads

use std::env;
use std::path::PathBuf;
use std::process::Command;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

pub fn get_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("TabShell")
}

pub fn get_download_dir() -> PathBuf {
    home_dir().join("Downloads")
}

pub fn open_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}
