use std::io;
use thiserror::Error;

/// Controller-level failures. The UI validates input before calling in, so these
/// mostly surface from programming errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    #[error("Track index {index} is out of range for a playlist of {len} tracks")]
    TrackOutOfRange { index: usize, len: usize },
}

/// Rejection of a deferred play request by the media sink.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayError {
    /// The environment refused to start playback without a user gesture.
    #[error("Playback blocked by autoplay policy: {0}")]
    Blocked(String),

    #[error("Playback failed: {0}")]
    Failed(String),
}

impl PlayError {
    /// Maps a DOM exception name to the matching variant.
    pub fn from_exception(name: &str, message: &str) -> Self {
        if name == "NotAllowedError" {
            PlayError::Blocked(message.to_string())
        } else if message.is_empty() {
            PlayError::Failed(name.to_string())
        } else {
            PlayError::Failed(format!("{name}: {message}"))
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, PlayError::Blocked(_))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for PlayError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        let field = |key: &str| {
            js_sys::Reflect::get(&value, &key.into())
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default()
        };
        PlayError::from_exception(&field("name"), &field("message"))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    #[error("Fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Cache storage error: {0}")]
    Storage(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for CacheError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        CacheError::Storage(format!("{value:?}"))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaylistError {
    #[error("Playlist fetch error: {0}")]
    Fetch(String),

    #[error("Playlist parsing error: {0}")]
    Parse(String),
}

impl From<CacheError> for PlaylistError {
    fn from(error: CacheError) -> Self {
        PlaylistError::Fetch(error.to_string())
    }
}

impl From<serde_json::Error> for PlaylistError {
    fn from(error: serde_json::Error) -> Self {
        PlaylistError::Parse(error.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Preference storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<io::Error> for SettingsError {
    fn from(error: io::Error) -> Self {
        SettingsError::Io(error.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Config parsing error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Parse(error.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for CacheError {
    fn from(error: reqwest::Error) -> Self {
        let url = error
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        CacheError::Fetch {
            url,
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_allowed_maps_to_blocked() {
        let err = PlayError::from_exception("NotAllowedError", "user gesture required");
        assert!(err.is_blocked());
        assert_eq!(err, PlayError::Blocked("user gesture required".to_string()));
    }

    #[test]
    fn other_exceptions_map_to_failed() {
        let err = PlayError::from_exception("NotSupportedError", "no source");
        assert!(!err.is_blocked());
        assert_eq!(err.to_string(), "Playback failed: NotSupportedError: no source");
        assert_eq!(
            PlayError::from_exception("AbortError", ""),
            PlayError::Failed("AbortError".to_string())
        );
    }
}
