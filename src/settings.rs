//! Persisted user preferences. Only the theme survives between sessions.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};

const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than `"dark"` reads as light.
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

pub trait PreferenceStore {
    /// Missing or unreadable values fall back to the default theme.
    fn load_theme(&self) -> Theme;
    fn save_theme(&self, theme: Theme) -> Result<(), SettingsError>;
}

/// `localStorage`, raw string values so existing pages keep their choice.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserPreferences;

#[cfg(target_arch = "wasm32")]
impl PreferenceStore for BrowserPreferences {
    fn load_theme(&self) -> Theme {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::raw()
            .get_item(THEME_KEY)
            .ok()
            .flatten()
            .map(|raw| Theme::parse(&raw))
            .unwrap_or_default()
    }

    fn save_theme(&self, theme: Theme) -> Result<(), SettingsError> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::raw()
            .set_item(THEME_KEY, theme.as_str())
            .map_err(|e| SettingsError::Storage(format!("{e:?}")))
    }
}

/// One small file per key under the user's config directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FilePreferences {
    dir: Option<std::path::PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FilePreferences {
    pub fn new() -> Self {
        Self {
            dir: dirs::config_dir().map(|dir| dir.join("storyplayer")),
        }
    }

    pub fn in_dir(dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    fn path(&self, key: &str) -> Option<std::path::PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(key))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for FilePreferences {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for FilePreferences {
    fn load_theme(&self) -> Theme {
        self.path(THEME_KEY)
            .and_then(|path| std::fs::read_to_string(path).ok())
            .map(|raw| Theme::parse(&raw))
            .unwrap_or_default()
    }

    fn save_theme(&self, theme: Theme) -> Result<(), SettingsError> {
        let path = self
            .path(THEME_KEY)
            .ok_or_else(|| SettingsError::Storage("no config directory".to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, theme.as_str())?;
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub type PlatformPreferences = BrowserPreferences;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformPreferences = FilePreferences;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_raw_values() {
        assert_eq!(Theme::parse("dark"), Theme::Dark);
        assert_eq!(Theme::parse("light"), Theme::Light);
        assert_eq!(Theme::parse("sepia"), Theme::Light);
        assert_eq!(Theme::Dark.as_str(), "dark");
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert!(Theme::Light.toggled().is_dark());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn file_store_round_trips_and_defaults() {
        let dir = std::env::temp_dir().join(format!("storyplayer-prefs-{}", std::process::id()));
        let store = FilePreferences::in_dir(&dir);
        assert_eq!(store.load_theme(), Theme::Light);

        store.save_theme(Theme::Dark).unwrap();
        assert_eq!(store.load_theme(), Theme::Dark);
        assert_eq!(std::fs::read_to_string(dir.join("theme")).unwrap(), "dark");

        std::fs::remove_dir_all(dir).ok();
    }
}
