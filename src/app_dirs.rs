use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("moaa"),
            )
        } else {
            ProjectDirs::from("", "", "moaa").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn sessions_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("moaa_study_sessions.json"))
    }

    pub fn recovery_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("moaa_timer.json"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "moaa").map(|pd| pd.config_dir().join("config.json"))
    }
}
