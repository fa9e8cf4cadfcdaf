//! Network retrieval behind a disk cache.
//!
//! `Fetcher` answers a URL from the response cache when it can and
//! otherwise GETs it through a `Transport`, storing the body before
//! returning it. `HttpTransport` is the `reqwest` implementation.

mod error;
mod fetcher;
mod http;

pub use error::FetchError;
pub use fetcher::Fetcher;
pub use http::{DEFAULT_TIMEOUT_SECS, HttpTransport, Transport, redact};
