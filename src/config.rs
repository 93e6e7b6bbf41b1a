//! Player configuration.
//! Embedded from `assets/player.json` at build time, every field has a default.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

const EMBEDDED_CONFIG: &str = include_str!("../assets/player.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Start playing when a story is picked by hand (list click, next/previous buttons).
    /// Completion-driven advance always plays regardless of this flag.
    pub autoplay_on_select: bool,
    pub initial_volume: f64,
    pub seek_step_secs: f64,
    pub volume_step: f64,
    pub playback_rates: Vec<f64>,
    pub playlist_url: String,
    pub fallback_track_count: usize,
    pub default_artwork: String,
    pub typewriter_title: bool,
    pub typewriter_tick_ms: u32,
    pub offline: OfflineConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay_on_select: true,
            initial_volume: 0.7,
            seek_step_secs: 10.0,
            volume_step: 0.1,
            playback_rates: vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0],
            playlist_url: "stories.json".to_string(),
            fallback_track_count: 30,
            default_artwork: "assets/images/default-story.jpg".to_string(),
            typewriter_title: false,
            typewriter_tick_ms: 60,
            offline: OfflineConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    pub enabled: bool,
    /// Bump whenever `precache` changes.
    pub cache_name: String,
    pub precache: Vec<String>,
    /// Local directory that relative URLs resolve against on desktop.
    pub asset_root: String,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_name: "audio-story-cache-v1".to_string(),
            precache: [
                "/",
                "/index.html",
                "/style.css",
                "/script.js",
                "/manifest.json",
                "/favicon.svg",
                "/apple-touch-icon.png",
                "/icons/play.svg",
                "/icons/pause.svg",
                "/icons/next.svg",
                "/icons/previous.svg",
                "/icons/moon.svg",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            asset_root: "assets".to_string(),
        }
    }
}

impl PlayerConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mut config: PlayerConfig = serde_json::from_str(raw)?;
        config.normalize();
        Ok(config)
    }

    /// Loads the embedded config, falling back to defaults on a malformed file.
    pub fn load() -> Self {
        match Self::from_json(EMBEDDED_CONFIG) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Using default player config: {err}");
                Self::default()
            }
        }
    }

    fn normalize(&mut self) {
        if !self.initial_volume.is_finite() {
            self.initial_volume = 0.7;
        }
        self.initial_volume = self.initial_volume.clamp(0.0, 1.0);
        if !self.seek_step_secs.is_finite() || self.seek_step_secs <= 0.0 {
            self.seek_step_secs = 10.0;
        }
        if !self.volume_step.is_finite() || self.volume_step <= 0.0 {
            self.volume_step = 0.1;
        }
        self.playback_rates
            .retain(|rate| rate.is_finite() && *rate > 0.0);
        if self.playback_rates.is_empty() {
            self.playback_rates = vec![1.0];
        }
        self.typewriter_tick_ms = self.typewriter_tick_ms.max(10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = PlayerConfig::from_json(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config.offline.cache_name, "audio-story-cache-v1");
        assert!(config.autoplay_on_select);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = PlayerConfig::from_json(r#"{ "autoplay_on_select": false }"#).unwrap();
        assert!(!config.autoplay_on_select);
        assert_eq!(config.playlist_url, "stories.json");
        assert_eq!(config.offline.precache.len(), 12);
    }

    #[test]
    fn out_of_range_values_are_normalized() {
        let config = PlayerConfig::from_json(
            r#"{ "initial_volume": 3.0, "seek_step_secs": -1, "playback_rates": [0, -2] }"#,
        )
        .unwrap();
        assert_eq!(config.initial_volume, 1.0);
        assert_eq!(config.seek_step_secs, 10.0);
        assert_eq!(config.playback_rates, vec![1.0]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            PlayerConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }
}
