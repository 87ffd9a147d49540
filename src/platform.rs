// pocketlinks platform paths
// Linux:   $XDG_DATA_HOME/pocketlinks or ~/.local/share/pocketlinks
// macOS:   ~/Library/Application Support/PocketLinks
// Windows: %APPDATA%/PocketLinks

use std::env;
use std::path::PathBuf;

#[cfg(not(target_os = "windows"))]
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the platform-specific data directory for pocketlinks.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        match env::var("XDG_DATA_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("pocketlinks"),
            _ => home_dir().join(".local").join("share").join("pocketlinks"),
        }
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join("PocketLinks")
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join("PocketLinks")
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        home_dir().join(".pocketlinks")
    }
}
