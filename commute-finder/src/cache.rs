//! Disk cache for raw API responses.
//!
//! Each response body is stored verbatim in its own file, named after a hash
//! of the request URL. Entries are written once and never expire; deleting
//! the file (or the whole directory) is the only way to refresh one.

use std::future::Future;
use std::io;
use std::path::PathBuf;

use tracing::info;

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Errors from reading or writing the cache directory.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache directory could not be created
    #[error("failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An existing entry could not be read
    #[error("failed to read cache entry {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A new entry could not be written
    #[error("failed to write cache entry {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 32-bit polynomial hash of a string over its UTF-16 code units.
///
/// `h = 31 * h + unit`, wrapping. This is the same value the JVM computes for
/// `String.hashCode`, so cache directories written by earlier tooling keep
/// working. It is not collision resistant: `"Aa"` and `"BB"` hash alike.
pub fn url_hash(url: &str) -> i32 {
    url.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Cache key for a request URL.
pub fn key_for(url: &str) -> String {
    url_hash(url).to_string()
}

/// Directory of cached response bodies.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Create a cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding the entry for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load the entry for `key`.
    ///
    /// Returns `Ok(None)` if there is no entry. Any other I/O failure is an
    /// error, so a broken cache is never mistaken for an empty one.
    pub fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Read { path, source }),
        }
    }

    /// Persist `payload` as the entry for `key`.
    pub fn store(&self, key: &str, payload: &str) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| CacheError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(key);
        std::fs::write(&path, payload).map_err(|source| CacheError::Write { path, source })
    }

    /// Return the entry for `key`, producing and persisting it on a miss.
    ///
    /// `producer` is only invoked when there is no entry. If it fails, nothing
    /// is written and its error is returned unchanged.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, producer: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
        E: From<CacheError>,
    {
        if let Some(cached) = self.load(key)? {
            info!(entry = %self.path_for(key).display(), "loaded cached response");
            return Ok(cached);
        }

        let payload = producer().await?;
        self.store(key, &payload)?;
        Ok(payload)
    }
}
