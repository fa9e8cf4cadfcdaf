//! Dataset client error types.

use crate::fetch::FetchError;

/// Errors from the typed dataset client.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Retrieving the payload failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The payload is not the JSON document we expected
    #[error("unexpected response from {url}: {message}")]
    Json { url: String, message: String },

    /// The service answered with an explicit error
    #[error("{url} reported an error: {message}")]
    Api { url: String, message: String },

    /// A credential cannot be sent as an HTTP header
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
}
