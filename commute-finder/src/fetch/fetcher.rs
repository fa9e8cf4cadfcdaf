//! Cache-backed fetcher.

use reqwest::header::HeaderMap;

use crate::cache::{self, ResponseCache};

use super::error::FetchError;
use super::http::Transport;

/// Resolves URLs to response bodies, consulting the disk cache first.
///
/// Wraps a `Transport` and a `ResponseCache`. A URL is retrieved from the
/// network at most once; later requests for the same URL are answered from
/// the cache, even across runs.
#[derive(Debug, Clone)]
pub struct Fetcher<T> {
    transport: T,
    cache: ResponseCache,
}

impl<T: Transport> Fetcher<T> {
    /// Create a fetcher over the given transport and cache.
    pub fn new(transport: T, cache: ResponseCache) -> Self {
        Self { transport, cache }
    }

    /// Fetch `url` without extra headers.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_with_headers(url, &HeaderMap::new()).await
    }

    /// Fetch `url`, sending `headers` if the network is hit.
    ///
    /// Headers are not part of the cache key: two requests for the same URL
    /// share one entry whatever their headers.
    pub async fn fetch_with_headers(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> Result<String, FetchError> {
        let key = cache::key_for(url);
        self.cache
            .get_or_fetch(&key, || self.transport.get(url, headers))
            .await
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The underlying cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}
