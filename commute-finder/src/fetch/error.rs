//! Fetch error types.

use crate::cache::CacheError;

/// Errors from resolving a URL to a response body.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request failed, returned an error status or an empty body
    #[error("remote unavailable: {url}: {reason}")]
    RemoteUnavailable { url: String, reason: String },

    /// The service answered with a client error status
    #[error("{url} rejected the request with status {status}")]
    Rejected {
        url: String,
        status: u16,
        body: String,
    },

    /// The service rejected our credentials
    #[error("unauthorized: {url} rejected the configured API key")]
    Unauthorized { url: String },

    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Reading or writing the response cache failed
    #[error(transparent)]
    Cache(#[from] CacheError),
}
