//! The fact upserter: turns one resolved value into one stored fact.

use econdw_core::{
  dimension::{CountryDim, IndicatorDim, SourceDim},
  fact::{Fact, FactKey, NewFact},
  measure::Measure,
  store::Warehouse,
  year::Year,
};

use crate::{Error, Result};

/// A value the resolver has settled on, and where to file it.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
  pub filed_under: Year,
  pub country:     &'a CountryDim,
  pub indicator:   &'a IndicatorDim,
  pub value:       f64,
  pub observed_at: Year,
}

pub struct FactUpserter<'a, W> {
  store:  &'a W,
  source: &'a SourceDim,
}

impl<'a, W: Warehouse> FactUpserter<'a, W> {
  pub fn new(store: &'a W, source: &'a SourceDim) -> Self { Self { store, source } }

  /// Create the date row for `filed_under` if needed, then insert or
  /// overwrite the fact. The measure takes the indicator row's kind.
  pub async fn upsert(&self, resolved: Resolved<'_>) -> Result<(Fact, bool)> {
    let anchor = resolved.filed_under.anchor()?;
    let (date, _) = self.store.ensure_date(anchor).await.map_err(Error::store)?;

    let input = NewFact {
      key:         FactKey {
        date_id:      date.date_id,
        country_id:   resolved.country.country_id,
        indicator_id: resolved.indicator.indicator_id,
        source_id:    self.source.source_id,
      },
      measure:     Measure::new(resolved.indicator.kind, resolved.value),
      observed_at: resolved.observed_at,
    };

    self.store.upsert_fact(input).await.map_err(Error::store)
  }
}
