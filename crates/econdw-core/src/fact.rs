//! Fact types: one measured value per (date, country, indicator, source).
//!
//! A fact is filed under a date-dimension row (`filed_under`) but carries the
//! year its value was actually reported for (`observed_at`) as a separate
//! attribute. Historical backfills file each value under its own year; the
//! latest-value sweep files everything under one reference year.

use serde::{Deserialize, Serialize};

use crate::{measure::Measure, year::Year};

/// The composite key of a fact. At most one fact exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactKey {
  pub date_id:      i64,
  pub country_id:   i64,
  pub indicator_id: i64,
  pub source_id:    i64,
}

/// Input to [`crate::store::Warehouse::upsert_fact`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewFact {
  pub key:         FactKey,
  pub measure:     Measure,
  pub observed_at: Year,
}

/// A persisted fact as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
  pub fact_id:     i64,
  pub key:         FactKey,
  pub filed_under: Year,
  pub observed_at: Year,
  pub measure:     Measure,
}

/// A fact joined with its dimension labels, as read back for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
  pub filed_under: Year,
  pub observed_at: Year,
  pub country:     String,
  pub iso:         String,
  pub indicator:   String,
  pub measure:     Measure,
}
