use super::{GifProvider, SearchPage};
use crate::errors::ApiError;
use crate::validation::{self, PageParams};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Search {
        term: String,
        limit: u32,
        offset: u32,
    },
    Trending {
        limit: u32,
        offset: u32,
    },
}

struct CacheEntry {
    page: SearchPage,
    fetched_at: Instant,
}

/// TTL response cache in front of a [`GifProvider`].
///
/// Entries go stale after the TTL but are never evicted; the next fetch for
/// the same key overwrites them, last writer wins. Concurrent misses for one
/// key may each hit the provider, which is harmless.
pub struct CachedProvider<P> {
    inner: P,
    ttl: Duration,
    entries: Arc<Mutex<HashMap<CacheKey, CacheEntry>>>,
}

impl<P> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    pub fn with_ttl(inner: P, ttl: Duration) -> Self {
        CachedProvider {
            inner,
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lookup(&self, key: &CacheKey) -> Option<SearchPage> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() <= self.ttl)
            .map(|entry| entry.page.clone())
    }

    fn store(&self, key: CacheKey, page: &SearchPage) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key,
            CacheEntry {
                page: page.clone(),
                fetched_at: Instant::now(),
            },
        );
    }
}

#[async_trait]
impl<P: GifProvider> GifProvider for CachedProvider<P> {
    async fn search(&self, term: &str, page: PageParams) -> Result<SearchPage, ApiError> {
        let term = validation::validate_search_term(term)?;
        let key = CacheKey::Search {
            term: term.to_string(),
            limit: page.limit,
            offset: page.offset,
        };

        if let Some(hit) = self.lookup(&key) {
            debug!(term, offset = page.offset, "Search cache hit");
            return Ok(hit);
        }

        let fresh = self.inner.search(term, page).await?;
        self.store(key, &fresh);
        Ok(fresh)
    }

    async fn trending(&self, page: PageParams) -> Result<SearchPage, ApiError> {
        let key = CacheKey::Trending {
            limit: page.limit,
            offset: page.offset,
        };

        if let Some(hit) = self.lookup(&key) {
            debug!(offset = page.offset, "Trending cache hit");
            return Ok(hit);
        }

        let fresh = self.inner.trending(page).await?;
        self.store(key, &fresh);
        Ok(fresh)
    }
}
