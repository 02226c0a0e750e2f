//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Calendar dates are stored as ISO 8601 `YYYY-MM-DD` strings, measure kinds
//! as their snake_case discriminant, years as plain integers.

use std::str::FromStr as _;

use chrono::NaiveDate;
use econdw_core::{
  dimension::{CountryDim, DateDim, IndicatorDim, SourceDim},
  fact::FactRow,
  measure::{Measure, MeasureKind},
  year::Year,
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── MeasureKind ─────────────────────────────────────────────────────────────

pub fn encode_kind(k: MeasureKind) -> &'static str { k.into() }

pub fn decode_kind(s: &str) -> Result<MeasureKind> {
  MeasureKind::from_str(s)
    .map_err(|_| Error::Core(econdw_core::Error::UnknownMeasureKind(s.to_owned())))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawDate::read`].
pub const DATE_COLUMNS: &str =
  "date_id, full_date, day, month, month_name, quarter, year, week_of_year, is_weekend";

/// Raw values read directly from a `dim_date` row.
pub struct RawDate {
  pub date_id:      i64,
  pub full_date:    String,
  pub day:          u32,
  pub month:        u32,
  pub month_name:   String,
  pub quarter:      u32,
  pub year:         i32,
  pub week_of_year: u32,
  pub is_weekend:   bool,
}

impl RawDate {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      date_id:      row.get(0)?,
      full_date:    row.get(1)?,
      day:          row.get(2)?,
      month:        row.get(3)?,
      month_name:   row.get(4)?,
      quarter:      row.get(5)?,
      year:         row.get(6)?,
      week_of_year: row.get(7)?,
      is_weekend:   row.get(8)?,
    })
  }

  pub fn into_dim(self) -> Result<DateDim> {
    Ok(DateDim {
      date_id:      self.date_id,
      full_date:    decode_date(&self.full_date)?,
      day:          self.day,
      month:        self.month,
      month_name:   self.month_name,
      quarter:      self.quarter,
      year:         Year(self.year),
      week_of_year: self.week_of_year,
      is_weekend:   self.is_weekend,
    })
  }
}

/// Column list matching [`read_country`].
pub const COUNTRY_COLUMNS: &str = "country_id, name, iso, continent, region, capital";

pub fn read_country(row: &rusqlite::Row<'_>) -> rusqlite::Result<CountryDim> {
  Ok(CountryDim {
    country_id: row.get(0)?,
    name:       row.get(1)?,
    iso:        row.get(2)?,
    continent:  row.get(3)?,
    region:     row.get(4)?,
    capital:    row.get(5)?,
  })
}

/// Column list matching [`RawIndicator::read`].
pub const INDICATOR_COLUMNS: &str = "indicator_id, name, description, unit, measure_kind";

pub struct RawIndicator {
  pub indicator_id: i64,
  pub name:         String,
  pub description:  Option<String>,
  pub unit:         String,
  pub measure_kind: String,
}

impl RawIndicator {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      indicator_id: row.get(0)?,
      name:         row.get(1)?,
      description:  row.get(2)?,
      unit:         row.get(3)?,
      measure_kind: row.get(4)?,
    })
  }

  pub fn into_dim(self) -> Result<IndicatorDim> {
    Ok(IndicatorDim {
      indicator_id: self.indicator_id,
      name:         self.name,
      description:  self.description,
      unit:         self.unit,
      kind:         decode_kind(&self.measure_kind)?,
    })
  }
}

/// Column list matching [`RawSource::read`].
pub const SOURCE_COLUMNS: &str = "source_id, name, url, last_refreshed";

pub struct RawSource {
  pub source_id:      i64,
  pub name:           String,
  pub url:            Option<String>,
  pub last_refreshed: Option<String>,
}

impl RawSource {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      source_id:      row.get(0)?,
      name:           row.get(1)?,
      url:            row.get(2)?,
      last_refreshed: row.get(3)?,
    })
  }

  pub fn into_dim(self) -> Result<SourceDim> {
    Ok(SourceDim {
      source_id:      self.source_id,
      name:           self.name,
      url:            self.url,
      last_refreshed: self.last_refreshed.as_deref().map(decode_date).transpose()?,
    })
  }
}

/// `SELECT` prefix matching [`RawFactRow::read`]; callers append `WHERE` and
/// `ORDER BY`.
pub const FACT_ROW_SELECT: &str = "
SELECT d.year, f.observed_year, c.name, c.iso, i.name, f.measure_kind, f.value
FROM fact_economic f
JOIN dim_date      d ON d.date_id      = f.date_id
JOIN dim_country   c ON c.country_id   = f.country_id
JOIN dim_indicator i ON i.indicator_id = f.indicator_id";

/// A fact joined with its dimension labels.
pub struct RawFactRow {
  pub filed_under:  i32,
  pub observed_at:  i32,
  pub country:      String,
  pub iso:          String,
  pub indicator:    String,
  pub measure_kind: String,
  pub value:        f64,
}

impl RawFactRow {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      filed_under:  row.get(0)?,
      observed_at:  row.get(1)?,
      country:      row.get(2)?,
      iso:          row.get(3)?,
      indicator:    row.get(4)?,
      measure_kind: row.get(5)?,
      value:        row.get(6)?,
    })
  }

  pub fn into_row(self) -> Result<FactRow> {
    Ok(FactRow {
      filed_under: Year(self.filed_under),
      observed_at: Year(self.observed_at),
      country:     self.country,
      iso:         self.iso,
      indicator:   self.indicator,
      measure:     Measure::new(decode_kind(&self.measure_kind)?, self.value),
    })
  }
}
