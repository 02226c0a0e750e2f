//! The warehouse traits.
//!
//! [`Warehouse`] is the write side used by ingestion: idempotent
//! get-or-create for every dimension plus the fact upsert. [`WarehouseQuery`]
//! is the read side used by dashboards and exports. Both are implemented by
//! storage backends (e.g. `econdw-store-sqlite`); higher layers depend on the
//! traits, not on a concrete backend.
//!
//! All methods return `Send` futures so the traits can be used from a
//! multi-threaded tokio runtime and from `axum` handlers.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  catalog::{CountrySpec, IndicatorSpec, SourceSpec},
  dimension::{CountryDim, DateDim, IndicatorDim, SourceDim},
  fact::{Fact, FactRow, NewFact},
  year::Year,
};

// ─── Write side ──────────────────────────────────────────────────────────────

/// Dimension get-or-create and fact upsert.
///
/// Each `ensure_*` call is atomic: it returns the existing row for the
/// natural key untouched, or inserts one built from the supplied defaults.
/// The boolean is `true` only when this call created the row.
pub trait Warehouse: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Get or create the date row for `date`, keyed by the full date.
  fn ensure_date(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<(DateDim, bool), Self::Error>> + Send + '_;

  /// Get or create a country row, keyed by ISO code.
  fn ensure_country(
    &self,
    spec: CountrySpec,
  ) -> impl Future<Output = Result<(CountryDim, bool), Self::Error>> + Send + '_;

  /// Get or create an indicator row, keyed by name.
  fn ensure_indicator(
    &self,
    spec: IndicatorSpec,
  ) -> impl Future<Output = Result<(IndicatorDim, bool), Self::Error>> + Send + '_;

  /// Get or create the source row, keyed by name. `today` becomes the
  /// last-refresh date of a newly created row.
  fn ensure_source(
    &self,
    spec: SourceSpec,
    today: NaiveDate,
  ) -> impl Future<Output = Result<(SourceDim, bool), Self::Error>> + Send + '_;

  /// Insert or overwrite the fact for `input.key` in a single transaction.
  /// The boolean is `true` when the fact did not exist before.
  fn upsert_fact(
    &self,
    input: NewFact,
  ) -> impl Future<Output = Result<(Fact, bool), Self::Error>> + Send + '_;
}

// ─── Read side ───────────────────────────────────────────────────────────────

pub trait WarehouseQuery: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All countries, ordered by name.
  fn list_countries(
    &self,
  ) -> impl Future<Output = Result<Vec<CountryDim>, Self::Error>> + Send + '_;

  /// All indicators, ordered by name.
  fn list_indicators(
    &self,
  ) -> impl Future<Output = Result<Vec<IndicatorDim>, Self::Error>> + Send + '_;

  fn find_country(
    &self,
    iso: String,
  ) -> impl Future<Output = Result<Option<CountryDim>, Self::Error>> + Send + '_;

  /// The January 1st date row of `year`, if one was ever created.
  fn find_year(
    &self,
    year: Year,
  ) -> impl Future<Output = Result<Option<DateDim>, Self::Error>> + Send + '_;

  /// The most recent year any fact is filed under.
  fn latest_fact_year(
    &self,
  ) -> impl Future<Output = Result<Option<Year>, Self::Error>> + Send + '_;

  /// Facts filed under `year`, ordered by country name then indicator name.
  fn facts_filed_under(
    &self,
    year: Year,
  ) -> impl Future<Output = Result<Vec<FactRow>, Self::Error>> + Send + '_;

  /// Every fact of one country, ordered by year then indicator name.
  fn country_facts(
    &self,
    iso: String,
  ) -> impl Future<Output = Result<Vec<FactRow>, Self::Error>> + Send + '_;

  /// Every fact, ordered by year, country name, then indicator name.
  fn all_facts(
    &self,
  ) -> impl Future<Output = Result<Vec<FactRow>, Self::Error>> + Send + '_;

  fn count_facts(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
