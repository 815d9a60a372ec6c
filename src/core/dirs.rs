use crate::core::error::NoteGitError;
use std::path::PathBuf;

/// Environment variable that replaces the whole config directory
pub const CONFIG_DIR_ENV: &str = "NOTEGIT_CONFIG_DIR";

pub fn get_config_directory() -> Result<PathBuf, NoteGitError> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config"))),
        "macos" => dirs::home_dir().map(|home| home.join("Library/Application Support")),
        _ => dirs::config_dir(),
    };

    base.map(|base| base.join("notegit"))
        .ok_or(NoteGitError::ConfigDirectoryNotFound)
}
