//! Path resolution
//!
//! Centralized directory path resolution with consistent fallback strategies.

use std::path::PathBuf;

/// Data directory relative to home (logs, console transcript)
const DATA_SUBDIR: &str = ".local/share/immutable-tools";

/// Config directory relative to home
const CONFIG_SUBDIR: &str = ".config/immutable-tools";

/// Application log filename prefix (rolled daily)
pub const LOG_FILE: &str = "immutable-tools.log";

/// Console transcript filename
const CONSOLE_LOG_FILE: &str = "console.log";

/// Settings filename
const SETTINGS_FILE: &str = "settings.json";

/// Fallback data directory when home is unavailable
const FALLBACK_DATA_DIR: &str = "/tmp/immutable-tools";

/// Get the data directory path
/// Falls back to /tmp/immutable-tools if home directory is unavailable
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DATA_SUBDIR))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

/// Get the console transcript path
pub fn console_log_path() -> PathBuf {
    data_dir().join(CONSOLE_LOG_FILE)
}

/// Get the settings file path
pub fn settings_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(CONFIG_SUBDIR).join(SETTINGS_FILE))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR).join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_contains_app_name() {
        let path = data_dir();
        assert!(path.to_string_lossy().contains("immutable-tools"));
    }

    #[test]
    fn test_settings_path_is_json() {
        let path = settings_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }

    #[test]
    fn test_console_log_inside_data_dir() {
        assert!(console_log_path().starts_with(data_dir()));
    }
}
