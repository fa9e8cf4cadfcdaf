//! HTTP transport.

use std::future::Future;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::HeaderMap;
use tracing::{info, warn};

use super::error::FetchError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum length of an error body quoted in an error message.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Query parameters whose values never appear in logs or errors.
const SECRET_PARAMS: &[&str] = &["key"];

/// Something that can GET a URL and return its body.
///
/// This abstraction lets the fetcher and the data sources be tested
/// without network access.
pub trait Transport {
    /// GET `url` with `headers` and return the full body as text.
    fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> impl Future<Output = Result<String, FetchError>>;
}

/// Transport backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<String, FetchError> {
        let shown = redact(url);
        info!(url = %shown, "fetching from web service");

        let unavailable = |reason: String| FetchError::RemoteUnavailable {
            url: shown.clone(),
            reason,
        };

        let response = self
            .http
            .get(url)
            .headers(headers.clone())
            .send()
            .await
            .map_err(|e| unavailable(e.without_url().to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized { url: shown.clone() });
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(unavailable(format!(
                "status {}: {}",
                status.as_u16(),
                truncate_body(&body)
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| unavailable(e.without_url().to_string()))?;

        if !status.is_success() {
            warn!(
                url = %shown,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "request rejected"
            );
            return Err(FetchError::Rejected {
                url: shown.clone(),
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Err(unavailable("empty response body".to_string()));
        }

        Ok(body)
    }
}

/// Replace credential query parameters with `***`.
///
/// URLs without such parameters are returned unchanged.
pub fn redact(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let is_secret = |name: &str| SECRET_PARAMS.contains(&name);
    if !parsed.query_pairs().any(|(k, _)| is_secret(&k)) {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            let v = if is_secret(&k) {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}

/// Truncate a response body to avoid logging excessive data.
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }

    let cut: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
    format!("{cut}... (truncated, {} total bytes)", body.len())
}
