//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\intent-responder\
//!   macOS:   ~/Library/Application Support/intent-responder/
//!   Linux:   ~/.config/intent-responder/
//!
//! Data dir (persisted seen ids):
//!   Windows: %LOCALAPPDATA%\intent-responder\
//!   macOS:   ~/Library/Application Support/intent-responder/
//!   Linux:   ~/.local/share/intent-responder/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for runtime data that outlives a single run.
    pub data_dir: PathBuf,
    /// Default location for a persisted seen-id registry.
    pub seen_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "intent-responder";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let seen_file = data_dir.join("seen-items.json");

        Self {
            config_dir,
            settings_file,
            data_dir,
            seen_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
