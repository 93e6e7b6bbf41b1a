//! Offline cache lifecycle: install, fetch intercept and activate for a versioned set of
//! static assets.

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
pub mod memory;
mod net;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserCacheBackend;
pub use net::PlatformFetcher;

/// Cache storage for the current target: the browser Cache API on web, process memory
/// elsewhere.
#[cfg(target_arch = "wasm32")]
pub type PlatformCacheBackend = BrowserCacheBackend;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformCacheBackend = memory::MemoryBackend;

use crate::config::OfflineConfig;
use crate::error::CacheError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    Cache,
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub response: CachedResponse,
    pub source: ServedFrom,
}

/// Versioned list of assets to precache. Bump `cache_name` whenever `urls` changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheManifest {
    pub cache_name: String,
    pub urls: Vec<String>,
}

impl CacheManifest {
    /// Duplicate URLs are dropped, first occurrence wins.
    pub fn new<I, U>(cache_name: impl Into<String>, urls: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for url in urls {
            let url = url.into();
            if !unique.contains(&url) {
                unique.push(url);
            }
        }
        Self {
            cache_name: cache_name.into(),
            urls: unique,
        }
    }
}

impl From<&OfflineConfig> for CacheManifest {
    fn from(config: &OfflineConfig) -> Self {
        CacheManifest::new(config.cache_name.clone(), config.precache.iter().cloned())
    }
}

/// Named response caches, grouped by version.
#[allow(async_fn_in_trait)]
pub trait CacheBackend {
    async fn cache_names(&self) -> Result<Vec<String>, CacheError>;
    /// Stores every response under `cache_name`, or none of them.
    async fn store_all(
        &self,
        cache_name: &str,
        responses: Vec<CachedResponse>,
    ) -> Result<(), CacheError>;
    /// Exact-URL match across all resident caches.
    async fn lookup(&self, url: &str) -> Result<Option<CachedResponse>, CacheError>;
    async fn delete_cache(&self, cache_name: &str) -> Result<bool, CacheError>;
}

#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<CachedResponse, CacheError>;
}

pub struct OfflineCache<B, F> {
    manifest: CacheManifest,
    backend: B,
    fetcher: F,
}

impl<B: CacheBackend, F: Fetcher> OfflineCache<B, F> {
    pub fn new(manifest: CacheManifest, backend: B, fetcher: F) -> Self {
        Self {
            manifest,
            backend,
            fetcher,
        }
    }

    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    /// Fetches the whole manifest and stores it under the current version.
    /// A single failed fetch aborts before anything is written.
    pub async fn install(&self) -> Result<usize, CacheError> {
        tracing::info!(
            "Installing cache {} ({} assets)",
            self.manifest.cache_name,
            self.manifest.urls.len()
        );
        let mut responses = Vec::with_capacity(self.manifest.urls.len());
        for url in &self.manifest.urls {
            responses.push(self.fetcher.fetch(url).await?);
        }
        let count = responses.len();
        self.backend
            .store_all(&self.manifest.cache_name, responses)
            .await?;
        Ok(count)
    }

    /// Cache-first lookup with network pass-through. Misses are not written back.
    pub async fn respond(&self, url: &str) -> Result<Served, CacheError> {
        match self.backend.lookup(url).await {
            Ok(Some(response)) => {
                tracing::debug!("Serving {url} from cache");
                return Ok(Served {
                    response,
                    source: ServedFrom::Cache,
                });
            }
            Ok(None) => {}
            Err(err) => tracing::warn!("Cache lookup for {url} failed: {err}"),
        }
        let response = self.fetcher.fetch(url).await?;
        Ok(Served {
            response,
            source: ServedFrom::Network,
        })
    }

    /// Deletes every cache version other than the current one.
    pub async fn activate(&self) -> Result<Vec<String>, CacheError> {
        let mut removed = Vec::new();
        for name in self.backend.cache_names().await? {
            if name != self.manifest.cache_name && self.backend.delete_cache(&name).await? {
                tracing::info!("Deleted stale cache {name}");
                removed.push(name);
            }
        }
        Ok(removed)
    }

    pub async fn is_installed(&self) -> Result<bool, CacheError> {
        Ok(self
            .backend
            .cache_names()
            .await?
            .iter()
            .any(|name| *name == self.manifest.cache_name))
    }

    /// Installs the current version when it is not resident yet, then activates it.
    /// Returns whether the current version is resident afterwards; failures are logged
    /// and retried on the next start.
    pub async fn ensure_ready(&self) -> bool {
        match self.is_installed().await {
            Ok(true) => {}
            Ok(false) => {
                if let Err(err) = self.install().await {
                    tracing::warn!("Cache install aborted: {err}");
                    return false;
                }
            }
            Err(err) => {
                tracing::warn!("Cache unavailable: {err}");
                return false;
            }
        }
        if let Err(err) = self.activate().await {
            tracing::warn!("Cache activation failed: {err}");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::memory::{MemoryBackend, StaticFetcher};
    use super::*;

    fn manifest(version: &str) -> CacheManifest {
        CacheManifest::new(version, ["/", "/index.html", "/style.css"])
    }

    fn full_fetcher() -> StaticFetcher {
        StaticFetcher::default()
            .with("/", b"root")
            .with("/index.html", b"<html>")
            .with("/style.css", b"body{}")
    }

    #[test]
    fn manifest_drops_duplicates() {
        let m = CacheManifest::new("v1", ["/a", "/b", "/a"]);
        assert_eq!(m.urls, vec!["/a".to_string(), "/b".to_string()]);
    }

    #[test]
    fn manifest_from_config() {
        let m = CacheManifest::from(&OfflineConfig::default());
        assert_eq!(m.cache_name, "audio-story-cache-v1");
        assert_eq!(m.urls.len(), 12);
    }

    #[tokio::test]
    async fn install_stores_every_manifest_entry() {
        let backend = MemoryBackend::default();
        let cache = OfflineCache::new(manifest("v1"), backend.clone(), full_fetcher());

        assert_eq!(cache.install().await.unwrap(), 3);
        assert_eq!(backend.cache_names().await.unwrap(), vec!["v1".to_string()]);
        assert_eq!(backend.entry_count("v1"), 3);
        assert!(cache.is_installed().await.unwrap());
    }

    #[tokio::test]
    async fn install_is_all_or_nothing() {
        let backend = MemoryBackend::default();
        let fetcher = StaticFetcher::default()
            .with("/", b"root")
            .with("/style.css", b"body{}");
        let cache = OfflineCache::new(manifest("v1"), backend.clone(), fetcher);

        let err = cache.install().await.unwrap_err();
        assert!(matches!(err, CacheError::Fetch { ref url, .. } if url == "/index.html"));
        assert!(backend.cache_names().await.unwrap().is_empty());
        assert_eq!(backend.entry_count("v1"), 0);
        assert!(backend.lookup("/").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn respond_prefers_cache_and_does_not_populate_on_miss() {
        let backend = MemoryBackend::default();
        let fetcher = full_fetcher().with("/audio/story1.mp3", b"mp3");
        let cache = OfflineCache::new(manifest("v1"), backend.clone(), fetcher.clone());
        cache.install().await.unwrap();

        let hit = cache.respond("/index.html").await.unwrap();
        assert_eq!(hit.source, ServedFrom::Cache);
        assert_eq!(hit.response.body, b"<html>".to_vec());

        let miss = cache.respond("/audio/story1.mp3").await.unwrap();
        assert_eq!(miss.source, ServedFrom::Network);
        assert_eq!(miss.response.body, b"mp3".to_vec());
        assert!(backend.lookup("/audio/story1.mp3").await.unwrap().is_none());
        assert_eq!(backend.entry_count("v1"), 3);
    }

    #[tokio::test]
    async fn respond_serves_offline_after_install() {
        let backend = MemoryBackend::default();
        let cache = OfflineCache::new(manifest("v1"), backend.clone(), full_fetcher());
        cache.install().await.unwrap();

        let offline = OfflineCache::new(manifest("v1"), backend, StaticFetcher::default());
        let served = offline.respond("/style.css").await.unwrap();
        assert_eq!(served.source, ServedFrom::Cache);
        assert!(offline.respond("/missing.png").await.is_err());
    }

    #[tokio::test]
    async fn activate_keeps_only_current_version() {
        let backend = MemoryBackend::default();
        for version in ["v1", "v2", "v3"] {
            OfflineCache::new(manifest(version), backend.clone(), full_fetcher())
                .install()
                .await
                .unwrap();
        }
        let cache = OfflineCache::new(manifest("v3"), backend.clone(), full_fetcher());

        let removed = cache.activate().await.unwrap();
        assert_eq!(removed, vec!["v1".to_string(), "v2".to_string()]);
        assert_eq!(backend.cache_names().await.unwrap(), vec!["v3".to_string()]);
    }

    #[tokio::test]
    async fn ensure_ready_installs_once_then_activates() {
        let backend = MemoryBackend::default();
        OfflineCache::new(manifest("v1"), backend.clone(), full_fetcher())
            .install()
            .await
            .unwrap();

        let fetcher = full_fetcher();
        let cache = OfflineCache::new(manifest("v2"), backend.clone(), fetcher.clone());
        assert!(cache.ensure_ready().await);
        assert_eq!(backend.cache_names().await.unwrap(), vec!["v2".to_string()]);
        assert_eq!(fetcher.fetch_count(), 3);

        assert!(cache.ensure_ready().await);
        assert_eq!(fetcher.fetch_count(), 3);
    }

    #[tokio::test]
    async fn ensure_ready_keeps_old_version_when_install_fails() {
        let backend = MemoryBackend::default();
        OfflineCache::new(manifest("v1"), backend.clone(), full_fetcher())
            .install()
            .await
            .unwrap();

        let cache = OfflineCache::new(manifest("v2"), backend.clone(), StaticFetcher::default());
        assert!(!cache.ensure_ready().await);
        assert_eq!(backend.cache_names().await.unwrap(), vec!["v1".to_string()]);
    }
}
