//! The `IndicatorSource` trait: one remote lookup per (country, indicator,
//! year).

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::year::Year;

/// What to ask the provider for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
  pub iso:  String,
  /// Provider series code.
  pub code: String,
  pub year: Year,
}

/// A non-null value reported by the provider, and the year it reported it
/// for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
  pub value: f64,
  pub year:  Year,
}

/// A remote statistics provider.
///
/// `Ok(None)` means the provider answered but has no value for the request
/// (including answers whose shape could not be understood). `Err` is reserved
/// for transport failures and non-success statuses; callers decide whether
/// those count as "no value".
pub trait IndicatorSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch(
    &self,
    request: FetchRequest,
  ) -> impl Future<Output = Result<Option<Observation>, Self::Error>> + Send + '_;
}
