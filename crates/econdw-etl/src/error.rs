//! Error type for `econdw-etl`.
//!
//! Only failures that end a run surface here. Per-year fetch failures and
//! per-fact write failures are absorbed by the resolver and counted in the
//! [`crate::RunReport`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] econdw_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("indicator source unavailable: {failures} consecutive lookups failed")]
  SourceUnavailable { failures: u32 },
}

impl Error {
  pub(crate) fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
