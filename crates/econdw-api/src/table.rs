//! Pivoting long fact rows into one wide record per (year, country).

use econdw_core::{fact::FactRow, measure::PerKind, year::Year};
use serde::Serialize;

/// A value together with the year it was reported for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cell {
  pub value:         f64,
  pub observed_year: Year,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryYear {
  pub year:     Year,
  pub country:  String,
  pub iso:      String,
  pub measures: PerKind<Cell>,
}

/// Group rows sharing (filed year, ISO) into one record each.
///
/// Input order is preserved, so rows sorted by year then country name come
/// out in that order. Rows for the same group must be adjacent.
pub fn pivot(rows: Vec<FactRow>) -> Vec<CountryYear> {
  let mut out: Vec<CountryYear> = Vec::new();
  for row in rows {
    let cell = Cell { value: row.measure.value, observed_year: row.observed_at };
    match out.last_mut() {
      Some(last) if last.year == row.filed_under && last.iso == row.iso => {
        *last.measures.slot_mut(row.measure.kind) = Some(cell);
      }
      _ => {
        let mut measures = PerKind::default();
        *measures.slot_mut(row.measure.kind) = Some(cell);
        out.push(CountryYear {
          year: row.filed_under,
          country: row.country,
          iso: row.iso,
          measures,
        });
      }
    }
  }
  out
}
