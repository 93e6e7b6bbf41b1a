// Network fetchers: gloo-net in the browser, reqwest or the local asset directory on desktop.
use super::{CachedResponse, Fetcher};
use crate::error::CacheError;

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct PlatformFetcher;

#[cfg(target_arch = "wasm32")]
impl PlatformFetcher {
    pub fn new(_asset_root: &str) -> Self {
        Self
    }
}

#[cfg(target_arch = "wasm32")]
impl Fetcher for PlatformFetcher {
    async fn fetch(&self, url: &str) -> Result<CachedResponse, CacheError> {
        let fail = |reason: String| CacheError::Fetch {
            url: url.to_string(),
            reason,
        };
        let response = gloo_net::http::Request::get(url)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;
        if !response.ok() {
            return Err(fail(format!("HTTP {}", response.status())));
        }
        let content_type = response.headers().get("content-type");
        let body = response.binary().await.map_err(|e| fail(e.to_string()))?;
        Ok(CachedResponse {
            url: url.to_string(),
            content_type,
            body,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct PlatformFetcher {
    asset_root: std::path::PathBuf,
    client: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl PlatformFetcher {
    pub fn new(asset_root: &str) -> Self {
        Self {
            asset_root: std::path::PathBuf::from(asset_root),
            client: reqwest::Client::new(),
        }
    }

    /// Maps a same-origin path onto the asset directory.
    fn local_path(&self, url: &str) -> std::path::PathBuf {
        let relative = url.split(['?', '#']).next().unwrap_or_default();
        let relative = relative.trim_start_matches('/');
        if relative.is_empty() {
            self.asset_root.join("index.html")
        } else {
            self.asset_root.join(relative)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn content_type_for(path: &std::path::Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "mp3" => "audio/mpeg",
        "woff2" => "font/woff2",
        _ => return None,
    };
    Some(mime.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
impl Fetcher for PlatformFetcher {
    async fn fetch(&self, url: &str) -> Result<CachedResponse, CacheError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            let response = self.client.get(url).send().await?.error_for_status()?;
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string());
            let body = response.bytes().await?.to_vec();
            return Ok(CachedResponse {
                url: url.to_string(),
                content_type,
                body,
            });
        }

        let path = self.local_path(url);
        let body = tokio::fs::read(&path).await.map_err(|e| CacheError::Fetch {
            url: url.to_string(),
            reason: format!("{}: {e}", path.display()),
        })?;
        Ok(CachedResponse {
            url: url.to_string(),
            content_type: content_type_for(&path),
            body,
        })
    }
}
