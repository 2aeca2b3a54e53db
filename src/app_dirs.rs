use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typemaster";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/typemaster`, falling back to the platform data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn history_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("history.json"))
            .unwrap_or_else(|| PathBuf::from("typemaster_history.json"))
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("typemaster.log"))
            .unwrap_or_else(|| PathBuf::from("typemaster.log"))
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("typemaster_config.json"))
    }
}
