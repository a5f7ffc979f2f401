// TabShell platform paths for Windows
// Config:    %APPDATA%/TabShell
// Downloads: %USERPROFILE%/Desktop

use std::env;
use std::path::PathBuf;
use std::process::Command;

pub fn get_config_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("TabShell")
}

/// Installers land on the desktop so they are easy to find.
pub fn get_download_dir() -> PathBuf {
    let profile = env::var("USERPROFILE").unwrap_or_else(|_| String::from("C:\\Users\\Default"));
    PathBuf::from(profile).join("Desktop")
}

pub fn open_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    // The empty string is the window title `start` expects before the target.
    command.args(["/C", "start", "", url]);
    command
}
