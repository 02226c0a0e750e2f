//! Error type for `econdw-store-sqlite`.

use econdw_core::measure::MeasureKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] econdw_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("indicator not found: {0}")]
  IndicatorNotFound(i64),

  /// A fact's measure must fill the slot its indicator is registered for.
  #[error("indicator {indicator_id} feeds {expected}, got a {got} measure")]
  KindMismatch {
    indicator_id: i64,
    expected:     String,
    got:          MeasureKind,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
