//! Story playlist: the track model, JSON parsing and the placeholder fallback list.

use crate::config::PlayerConfig;
use crate::error::PlaylistError;
use crate::offline::{CacheBackend, Fetcher, OfflineCache};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(alias = "audioFile")]
    pub audio_source: String,
    #[serde(default, alias = "imageFile")]
    pub artwork_source: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "duration")]
    pub duration_label: Option<String>,
}

impl Track {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        audio_source: impl Into<String>,
        artwork_source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            audio_source: audio_source.into(),
            artwork_source: artwork_source.into(),
            description: None,
            duration_label: None,
        }
    }

    /// Artwork to request, substituting the placeholder when none is set.
    pub fn artwork_or<'a>(&'a self, default_artwork: &'a str) -> &'a str {
        if self.artwork_source.trim().is_empty() {
            default_artwork
        } else {
            &self.artwork_source
        }
    }
}

pub fn parse_tracks(raw: &[u8]) -> Result<Vec<Track>, PlaylistError> {
    Ok(serde_json::from_slice::<Vec<Track>>(raw)?)
}

/// Numbered placeholder stories used when the playlist file cannot be loaded.
pub fn fallback_tracks(count: usize) -> Vec<Track> {
    (1..=count)
        .map(|i| Track {
            title: format!("قصه  {i}"),
            artist: String::new(),
            audio_source: format!("assets/audio/story{i}.mp3"),
            artwork_source: format!("assets/images/story{i}.jpg"),
            description: Some("توضیحات داستان".to_string()),
            duration_label: Some("۵:۰۰".to_string()),
        })
        .collect()
}

async fn fetch_tracks<B, F>(
    cache: &OfflineCache<B, F>,
    url: &str,
) -> Result<Vec<Track>, PlaylistError>
where
    B: CacheBackend,
    F: Fetcher,
{
    let served = cache.respond(url).await?;
    let tracks = parse_tracks(&served.response.body)?;
    if tracks.is_empty() {
        return Err(PlaylistError::Parse("playlist contains no tracks".to_string()));
    }
    Ok(tracks)
}

/// Loads the playlist through the offline cache, never failing: any fetch or parse error
/// yields the placeholder list so the player stays usable.
pub async fn load_playlist<B, F>(cache: &OfflineCache<B, F>, config: &PlayerConfig) -> Vec<Track>
where
    B: CacheBackend,
    F: Fetcher,
{
    match fetch_tracks(cache, &config.playlist_url).await {
        Ok(tracks) => {
            tracing::info!("Loaded {} stories from {}", tracks.len(), config.playlist_url);
            tracks
        }
        Err(err) => {
            tracing::warn!("Error loading stories, using placeholders: {err}");
            fallback_tracks(config.fallback_track_count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::memory::{MemoryBackend, StaticFetcher};
    use crate::offline::CacheManifest;

    #[test]
    fn parses_canonical_field_names() {
        let raw = br#"[{"title":"A","artist":"B","audioSource":"a.mp3","artworkSource":"a.jpg"}]"#;
        let tracks = parse_tracks(raw).unwrap();
        assert_eq!(tracks, vec![Track::new("A", "B", "a.mp3", "a.jpg")]);
    }

    #[test]
    fn parses_story_file_field_names() {
        let raw = r#"[{"id":1,"title":"قصه 1","audioFile":"assets/audio/story1.mp3",
            "imageFile":"assets/images/story1.jpg","duration":"۵:۰۰","description":"x"}]"#;
        let tracks = parse_tracks(raw.as_bytes()).unwrap();
        assert_eq!(tracks[0].audio_source, "assets/audio/story1.mp3");
        assert_eq!(tracks[0].artwork_source, "assets/images/story1.jpg");
        assert_eq!(tracks[0].duration_label.as_deref(), Some("۵:۰۰"));
        assert_eq!(tracks[0].artist, "");
    }

    #[test]
    fn missing_audio_source_is_a_parse_error() {
        let err = parse_tracks(br#"[{"title":"A"}]"#).unwrap_err();
        assert!(matches!(err, PlaylistError::Parse(_)));
    }

    #[test]
    fn fallback_list_is_numbered_from_one() {
        let tracks = fallback_tracks(30);
        assert_eq!(tracks.len(), 30);
        assert_eq!(tracks[0].title, "قصه  1");
        assert_eq!(tracks[29].audio_source, "assets/audio/story30.mp3");
        assert_eq!(tracks[4].artwork_source, "assets/images/story5.jpg");
    }

    #[test]
    fn empty_artwork_uses_default() {
        let track = Track::new("A", "", "a.mp3", " ");
        assert_eq!(track.artwork_or("default.jpg"), "default.jpg");
        let track = Track::new("A", "", "a.mp3", "a.jpg");
        assert_eq!(track.artwork_or("default.jpg"), "a.jpg");
    }

    fn cache_with(fetcher: StaticFetcher) -> OfflineCache<MemoryBackend, StaticFetcher> {
        OfflineCache::new(
            CacheManifest::new("test-v1", Vec::<String>::new()),
            MemoryBackend::default(),
            fetcher,
        )
    }

    #[tokio::test]
    async fn loads_playlist_from_network() {
        let fetcher = StaticFetcher::default().with(
            "stories.json",
            br#"[{"title":"A","audioFile":"a.mp3"},{"title":"B","audioFile":"b.mp3"}]"#,
        );
        let cache = cache_with(fetcher);
        let tracks = load_playlist(&cache, &PlayerConfig::default()).await;
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].title, "B");
    }

    #[tokio::test]
    async fn unreachable_playlist_falls_back() {
        let cache = cache_with(StaticFetcher::default());
        let config = PlayerConfig {
            fallback_track_count: 3,
            ..PlayerConfig::default()
        };
        let tracks = load_playlist(&cache, &config).await;
        assert_eq!(tracks, fallback_tracks(3));
    }

    #[tokio::test]
    async fn malformed_or_empty_playlist_falls_back() {
        let config = PlayerConfig::default();
        let cache = cache_with(StaticFetcher::default().with("stories.json", b"not json"));
        assert_eq!(load_playlist(&cache, &config).await.len(), 30);

        let cache = cache_with(StaticFetcher::default().with("stories.json", b"[]"));
        assert_eq!(load_playlist(&cache, &config).await.len(), 30);
    }
}
