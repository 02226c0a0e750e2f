//! The World Bank indicator response envelope.
//!
//! A successful answer is a two-element array: paging metadata, then a list
//! of observations (or `null` when the series has nothing for the request).
//! Error answers are a one-element array carrying a `message`.

use econdw_core::{source::Observation, year::Year};
use serde::Deserialize;
use serde::de::IgnoredAny;

#[derive(Deserialize)]
struct Envelope(IgnoredAny, Option<Vec<RawObservation>>);

#[derive(Deserialize)]
struct RawObservation {
  #[serde(default)]
  value: Option<RawValue>,
  #[serde(default)]
  date:  Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
  Number(f64),
  Text(String),
}

/// Extract the first observation's value from a response body.
///
/// Returns `None` for every body that is not a well-formed envelope with a
/// non-null, finite first value. The observation's year comes from its
/// `date` field, falling back to `requested` when that is missing or not a
/// plain year.
pub fn parse_observation(body: &[u8], requested: Year) -> Option<Observation> {
  let envelope: Envelope = match serde_json::from_slice(body) {
    Ok(e) => e,
    Err(e) => {
      tracing::debug!(error = %e, "unrecognised response shape");
      return None;
    }
  };

  let first = envelope.1?.into_iter().next()?;
  let value = match first.value? {
    RawValue::Number(v) => v,
    RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
  };
  if !value.is_finite() {
    return None;
  }

  let year = first
    .date
    .as_deref()
    .and_then(Year::parse_lenient)
    .unwrap_or(requested);

  Some(Observation { value, year })
}
