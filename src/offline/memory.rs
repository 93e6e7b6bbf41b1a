use super::{CacheBackend, CachedResponse};
use crate::error::CacheError;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

type Entries = BTreeMap<String, CachedResponse>;

/// In-process cache store. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    caches: Rc<RefCell<BTreeMap<String, Entries>>>,
}

impl MemoryBackend {
    pub fn entry_count(&self, cache_name: &str) -> usize {
        self.caches
            .borrow()
            .get(cache_name)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }
}

impl CacheBackend for MemoryBackend {
    async fn cache_names(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.caches.borrow().keys().cloned().collect())
    }

    async fn store_all(
        &self,
        cache_name: &str,
        responses: Vec<CachedResponse>,
    ) -> Result<(), CacheError> {
        let mut caches = self.caches.borrow_mut();
        let entries = caches.entry(cache_name.to_string()).or_default();
        for response in responses {
            entries.insert(response.url.clone(), response);
        }
        Ok(())
    }

    async fn lookup(&self, url: &str) -> Result<Option<CachedResponse>, CacheError> {
        Ok(self
            .caches
            .borrow()
            .values()
            .find_map(|entries| entries.get(url).cloned()))
    }

    async fn delete_cache(&self, cache_name: &str) -> Result<bool, CacheError> {
        Ok(self.caches.borrow_mut().remove(cache_name).is_some())
    }
}

#[cfg(test)]
pub(crate) use testing::StaticFetcher;

#[cfg(test)]
mod testing {
    use super::super::Fetcher;
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// Serves canned bodies; any other URL fails like an unreachable network.
    #[derive(Debug, Clone, Default)]
    pub struct StaticFetcher {
        bodies: Rc<RefCell<HashMap<String, Vec<u8>>>>,
        fetches: Rc<Cell<usize>>,
    }

    impl StaticFetcher {
        pub fn with(self, url: &str, body: &[u8]) -> Self {
            self.bodies.borrow_mut().insert(url.to_string(), body.to_vec());
            self
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.get()
        }
    }

    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<CachedResponse, CacheError> {
            self.fetches.set(self.fetches.get() + 1);
            match self.bodies.borrow().get(url) {
                Some(body) => Ok(CachedResponse {
                    url: url.to_string(),
                    content_type: None,
                    body: body.clone(),
                }),
                None => Err(CacheError::Fetch {
                    url: url.to_string(),
                    reason: "network unreachable".to_string(),
                }),
            }
        }
    }
}
