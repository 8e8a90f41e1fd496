//! User settings
//!
//! Loads settings from JSON at ~/.config/immutable-tools/settings.json.
//! Falls back to defaults if the file doesn't exist or can't be parsed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants;
use crate::i18n::Language;

/// Color theme choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn toggled(self) -> Self {
        match self {
            ThemeChoice::Dark => ThemeChoice::Light,
            ThemeChoice::Light => ThemeChoice::Dark,
        }
    }
}

/// Persisted user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: ThemeChoice,

    pub language: Language,

    /// Extra phrases that mark an authorization failure in command output,
    /// checked in addition to the built-in list
    pub auth_failure_phrases: Vec<String>,

    /// Interval between background status refreshes (seconds, 0 disables)
    pub status_refresh_secs: u64,

    /// Timeout for synchronous queries such as status and snapshot list (seconds)
    pub query_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeChoice::default(),
            language: Language::default(),
            auth_failure_phrases: Vec::new(),
            status_refresh_secs: constants::DEFAULT_STATUS_REFRESH_SECS,
            query_timeout_secs: constants::DEFAULT_QUERY_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings from file, or return defaults if not found or invalid
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Failed to parse settings file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to file, creating the parent directory when needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs.max(1))
    }

    /// None when background refresh is disabled
    pub fn status_refresh_interval(&self) -> Option<Duration> {
        (self.status_refresh_secs > 0).then(|| Duration::from_secs(self.status_refresh_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemeChoice::Dark);
        assert_eq!(settings.status_refresh_secs, 10);
        assert_eq!(settings.query_timeout(), Duration::from_secs(30));
        assert!(settings.auth_failure_phrases.is_empty());
    }

    #[test]
    fn test_partial_settings_parsing() {
        let json = r#"{ "theme": "light", "auth_failure_phrases": ["acceso denegado"] }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.theme, ThemeChoice::Light);
        assert_eq!(settings.auth_failure_phrases, vec!["acceso denegado"]);
        // Other values should be defaults
        assert_eq!(settings.language, Language::default());
        assert_eq!(settings.query_timeout_secs, 30);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings {
            theme: ThemeChoice::Light,
            language: Language::English,
            status_refresh_secs: 0,
            ..Settings::default()
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded, settings);
        assert!(loaded.status_refresh_interval().is_none());
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Settings::load(&dir.path().join("absent.json")),
            Settings::default()
        );
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(ThemeChoice::Dark.toggled(), ThemeChoice::Light);
        assert_eq!(ThemeChoice::Light.toggled(), ThemeChoice::Dark);
    }
}
