mod config;
mod store;

pub use config::{Config, FocusConfig, NotificationsConfig, TimerConfig, MAX_FOCUS_MINUTES};
pub use store::{JsonFileStore, MemoryStore, SnapshotStore, STATE_FILE_NAME};

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `TOMATO_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/tomato[-dev]/`, where `TOMATO_ENV=dev` selects the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("TOMATO_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TOMATO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tomato-dev")
            } else {
                base_dir.join("tomato")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
