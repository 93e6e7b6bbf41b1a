// Browser Cache API backend (window.caches).
use super::{CacheBackend, CachedResponse};
use crate::error::CacheError;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Cache, CacheStorage, Headers, Response, ResponseInit};

#[derive(Debug, Clone, Default)]
pub struct BrowserCacheBackend;

fn storage() -> Result<CacheStorage, CacheError> {
    let window =
        web_sys::window().ok_or_else(|| CacheError::Storage("no window".to_string()))?;
    Ok(window.caches()?)
}

fn to_response(entry: &CachedResponse) -> Result<Response, CacheError> {
    let init = ResponseInit::new();
    if let Some(content_type) = &entry.content_type {
        let headers = Headers::new()?;
        headers.set("content-type", content_type)?;
        init.set_headers(&headers);
    }
    let body: js_sys::Object = js_sys::Uint8Array::from(entry.body.as_slice()).into();
    Ok(Response::new_with_opt_buffer_source_and_init(
        Some(&body),
        &init,
    )?)
}

impl CacheBackend for BrowserCacheBackend {
    async fn cache_names(&self) -> Result<Vec<String>, CacheError> {
        let keys = JsFuture::from(storage()?.keys()).await?;
        Ok(js_sys::Array::from(&keys)
            .iter()
            .filter_map(|key| key.as_string())
            .collect())
    }

    async fn store_all(
        &self,
        cache_name: &str,
        responses: Vec<CachedResponse>,
    ) -> Result<(), CacheError> {
        let storage = storage()?;
        let cache: Cache = JsFuture::from(storage.open(cache_name))
            .await?
            .dyn_into()?;

        for entry in &responses {
            let stored = match to_response(entry) {
                Ok(response) => JsFuture::from(cache.put_with_str(&entry.url, &response))
                    .await
                    .map_err(CacheError::from),
                Err(err) => Err(err),
            };
            if let Err(err) = stored {
                // Roll back so a half-written version never looks installed.
                let _ = JsFuture::from(storage.delete(cache_name)).await;
                return Err(err);
            }
        }
        Ok(())
    }

    async fn lookup(&self, url: &str) -> Result<Option<CachedResponse>, CacheError> {
        let found = JsFuture::from(storage()?.match_with_str(url)).await?;
        if found.is_undefined() || found.is_null() {
            return Ok(None);
        }
        let response: Response = found.dyn_into()?;
        let content_type = response.headers().get("content-type")?;
        let buffer = JsFuture::from(response.array_buffer()?).await?;
        Ok(Some(CachedResponse {
            url: url.to_string(),
            content_type,
            body: js_sys::Uint8Array::new(&buffer).to_vec(),
        }))
    }

    async fn delete_cache(&self, cache_name: &str) -> Result<bool, CacheError> {
        let deleted = JsFuture::from(storage()?.delete(cache_name)).await?;
        Ok(deleted.as_bool().unwrap_or(false))
    }
}
