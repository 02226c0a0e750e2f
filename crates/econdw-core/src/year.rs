//! Calendar years and the bounded windows the backfill walks.

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, catalog::HistoryDepth};

// ─── Year ────────────────────────────────────────────────────────────────────

/// A calendar year. Facts are keyed by the January 1st anchor of a year.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Year(pub i32);

impl Year {
  pub fn current() -> Self { Self(Utc::now().year()) }

  pub fn get(self) -> i32 { self.0 }

  /// January 1st of this year.
  pub fn anchor(self) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(self.0, 1, 1).ok_or(Error::InvalidYear(self.0))
  }

  /// Parse the loose year strings providers emit (`"2023"`, `" 2023 "`).
  pub fn parse_lenient(s: &str) -> Option<Self> {
    s.trim().parse::<i32>().ok().map(Self)
  }
}

impl fmt::Display for Year {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<i32> for Year {
  fn from(y: i32) -> Self { Self(y) }
}

// ─── YearWindow ──────────────────────────────────────────────────────────────

/// The global range of years a run may request, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
  min: Year,
  max: Year,
}

impl YearWindow {
  pub fn new(min: Year, max: Year) -> Result<Self> {
    if min > max {
      return Err(Error::InvalidWindow { min, max });
    }
    Ok(Self { min, max })
  }

  pub fn min(&self) -> Year { self.min }

  pub fn max(&self) -> Year { self.max }

  /// Every year in the window, newest first.
  pub fn descending(&self) -> impl Iterator<Item = Year> + use<> {
    (self.min.0..=self.max.0).rev().map(Year)
  }

  /// Oldest year a country with `depth` should be backfilled to.
  ///
  /// `Years(n)` counts the window's max year as the first of the `n`, and
  /// never reaches past the window's floor.
  pub fn start_for(&self, depth: HistoryDepth) -> Year {
    match depth {
      HistoryDepth::All => self.min,
      HistoryDepth::Years(n) => {
        let span = i32::try_from(n).unwrap_or(i32::MAX);
        let start = self.max.0.saturating_sub(span).saturating_add(1);
        Year(start.max(self.min.0))
      }
    }
  }

  /// The years a historical backfill visits for `depth`, newest first.
  pub fn history(&self, depth: HistoryDepth) -> impl Iterator<Item = Year> + use<> {
    let start = self.start_for(depth);
    (start.0..=self.max.0).rev().map(Year)
  }
}
