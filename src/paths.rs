//! Path utilities and file system helpers

use std::path::PathBuf;

const APP_DIR_NAME: &str = "rag-chat";

/// Gets the application config directory
pub fn get_app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR_NAME))
}

/// Gets the config file path
pub fn get_config_path() -> Option<PathBuf> {
    get_app_config_dir().map(|p| p.join("config.json"))
}

/// Gets the line editor history file path
pub fn get_input_history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(APP_DIR_NAME).join("input_history.txt"))
}

/// Expands a leading `~/` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_plain_paths_alone() {
        assert_eq!(expand_home("docs/a.pdf"), PathBuf::from("docs/a.pdf"));
    }
}
