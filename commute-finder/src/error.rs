//! Top-level error type of a commute-finder run.

use crate::config::ConfigError;
use crate::sources::DatasetError;

/// Anything that aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
