//! Measures: the numeric payload of a fact, tagged by what it measures.
//!
//! Each indicator in the catalog feeds exactly one [`MeasureKind`]; a fact
//! stores one `(kind, value)` pair rather than a row of mostly-empty columns.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

// ─── MeasureKind ─────────────────────────────────────────────────────────────

/// The slot a fact's value belongs to. The string form is the `measure_kind`
/// column discriminant.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MeasureKind {
  /// Annual consumer price inflation, percent.
  Inflation,
  /// Annual real GDP growth, percent.
  GdpGrowth,
  /// Official exchange rate, local currency units per USD.
  ExchangeRate,
  /// Consumer price index level.
  Cpi,
}

/// A single observed value together with the slot it fills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measure {
  pub kind:  MeasureKind,
  pub value: f64,
}

impl Measure {
  pub fn new(kind: MeasureKind, value: f64) -> Self { Self { kind, value } }
}

// ─── PerKind ─────────────────────────────────────────────────────────────────

/// One optional `T` per [`MeasureKind`] (the wide shape used by dashboards
/// and exports, where a country-year shows all four measures side by side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerKind<T> {
  pub inflation:     Option<T>,
  pub gdp_growth:    Option<T>,
  pub exchange_rate: Option<T>,
  pub cpi:           Option<T>,
}

impl<T> Default for PerKind<T> {
  fn default() -> Self {
    Self { inflation: None, gdp_growth: None, exchange_rate: None, cpi: None }
  }
}

impl<T> PerKind<T> {
  pub fn get(&self, kind: MeasureKind) -> Option<&T> {
    match kind {
      MeasureKind::Inflation => self.inflation.as_ref(),
      MeasureKind::GdpGrowth => self.gdp_growth.as_ref(),
      MeasureKind::ExchangeRate => self.exchange_rate.as_ref(),
      MeasureKind::Cpi => self.cpi.as_ref(),
    }
  }

  pub fn slot_mut(&mut self, kind: MeasureKind) -> &mut Option<T> {
    match kind {
      MeasureKind::Inflation => &mut self.inflation,
      MeasureKind::GdpGrowth => &mut self.gdp_growth,
      MeasureKind::ExchangeRate => &mut self.exchange_rate,
      MeasureKind::Cpi => &mut self.cpi,
    }
  }

  /// Number of slots holding a value.
  pub fn populated(&self) -> usize {
    [
      self.inflation.is_some(),
      self.gdp_growth.is_some(),
      self.exchange_rate.is_some(),
      self.cpi.is_some(),
    ]
    .into_iter()
    .filter(|set| *set)
    .count()
  }
}

impl From<Measure> for PerKind<f64> {
  fn from(m: Measure) -> Self {
    let mut slots = Self::default();
    *slots.slot_mut(m.kind) = Some(m.value);
    slots
  }
}
