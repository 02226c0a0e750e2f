//! Error type for configuration loading.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("invalid configuration: {0}")]
  Invalid(#[from] econdw_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
