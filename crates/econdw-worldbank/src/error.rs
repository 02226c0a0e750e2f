//! Error type for `econdw-worldbank`.

use thiserror::Error;

/// A lookup that never produced a usable answer from the provider.
///
/// Callers treat every variant as "no value for this year"; the distinction
/// only matters for logging and failure counting.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{url} returned {status}")]
  Status { status: u16, url: String },
}

pub type Result<T, E = FetchError> = std::result::Result<T, E>;
