use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "hoahong";
pub const LOG_FILE_NAME: &str = "hoahong.log";

/// Filesystem locations the application works with.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Where the persisted rows and display name live.
    pub data_dir: PathBuf,
    /// Where exported reports are written.
    pub export_dir: PathBuf,
    pub log_file_name: String,
}

impl AppConfig {
    /// Resolves platform directories, falling back to the working directory
    /// when the platform offers none.
    pub fn resolve() -> Self {
        let data_dir = dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".").join(format!(".{}", APP_DIR_NAME)));

        let export_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            data_dir,
            export_dir,
            log_file_name: LOG_FILE_NAME.to_string(),
        }
    }
}
