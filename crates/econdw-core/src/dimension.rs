//! Dimension records: the descriptive side of the star schema.
//!
//! Every dimension row is created on first reference through the store's
//! get-or-create operations and is never updated afterwards. Surrogate ids
//! are assigned by the store.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{measure::MeasureKind, year::Year};

/// A calendar date with the attributes reports slice by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateDim {
  pub date_id:      i64,
  pub full_date:    NaiveDate,
  pub day:          u32,
  pub month:        u32,
  /// English month name, e.g. `January`.
  pub month_name:   String,
  pub quarter:      u32,
  pub year:         Year,
  /// ISO 8601 week number.
  pub week_of_year: u32,
  pub is_weekend:   bool,
}

impl DateDim {
  /// Derive every attribute from `date`.
  pub fn for_date(date_id: i64, date: NaiveDate) -> Self {
    Self {
      date_id,
      full_date: date,
      day: date.day(),
      month: date.month(),
      month_name: date.format("%B").to_string(),
      quarter: (date.month() - 1) / 3 + 1,
      year: Year(date.year()),
      week_of_year: date.iso_week().week(),
      is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryDim {
  pub country_id: i64,
  pub name:       String,
  /// ISO 3166-1 alpha-3.
  pub iso:        String,
  pub continent:  Option<String>,
  pub region:     Option<String>,
  pub capital:    Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorDim {
  pub indicator_id: i64,
  pub name:         String,
  pub description:  Option<String>,
  pub unit:         String,
  pub kind:         MeasureKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDim {
  pub source_id:      i64,
  pub name:           String,
  pub url:            Option<String>,
  pub last_refreshed: Option<NaiveDate>,
}
