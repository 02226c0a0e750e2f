//! Error types for `econdw-core`.

use thiserror::Error;

use crate::{measure::MeasureKind, year::Year};

#[derive(Debug, Error)]
pub enum Error {
  #[error("year {0} has no calendar anchor")]
  InvalidYear(i32),

  #[error("year window is inverted: min {min} > max {max}")]
  InvalidWindow { min: Year, max: Year },

  #[error("not an ISO 3166-1 alpha-3 code: {0:?}")]
  InvalidIso(String),

  #[error("country listed twice in catalog: {0}")]
  DuplicateCountry(String),

  #[error("indicator listed twice in catalog: {0}")]
  DuplicateIndicator(String),

  #[error("measure kind {0} is fed by more than one indicator")]
  DuplicateKind(MeasureKind),

  #[error("catalog has no {0}")]
  EmptyCatalog(&'static str),

  #[error("history depth for {0} must be at least one year")]
  ZeroHistory(String),

  #[error("unknown measure kind discriminant: {0:?}")]
  UnknownMeasureKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
