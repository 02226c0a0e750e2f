//! `GET /dashboard[?year=Y]`: one year across every country, plus the
//! chart country's full series.

use std::{collections::HashMap, sync::Arc};

use axum::{
  Json,
  extract::{Query, State},
};
use econdw_core::{
  measure::{MeasureKind, PerKind},
  store::WarehouseQuery,
  year::Year,
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
  ApiState,
  error::ApiError,
  series::{Series, load_series},
  table::{Cell, pivot},
};

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
  pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct DashboardRow {
  pub country:  String,
  pub iso:      String,
  pub measures: PerKind<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowestInflation {
  pub country: String,
  pub iso:     String,
  pub value:   f64,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
  pub year:             Year,
  pub rows:             Vec<DashboardRow>,
  pub lowest_inflation: Option<LowestInflation>,
  /// `None` when the chart country has never been ingested.
  pub chart:            Option<Series>,
}

pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<DashboardParams>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: WarehouseQuery + 'static,
{
  let store = &state.store;
  ensure_catalog_seeded(store).await?;

  let year = match params.year.map(Year) {
    Some(year) => {
      if year.anchor().is_err() {
        return Err(ApiError::NotFound(format!("{year} is not a valid calendar year")));
      }
      store
        .find_year(year)
        .await
        .map_err(ApiError::store)?
        .ok_or_else(|| ApiError::NotFound(format!("no data has been loaded for {year}")))?;
      year
    }
    None => store
      .latest_fact_year()
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| {
        ApiError::NotFound("no economic data has been loaded yet".to_string())
      })?,
  };

  let countries = store.list_countries().await.map_err(ApiError::store)?;
  let mut by_iso: HashMap<String, PerKind<Cell>> = pivot(
    store.facts_filed_under(year).await.map_err(ApiError::store)?,
  )
  .into_iter()
  .map(|cy| (cy.iso, cy.measures))
  .collect();

  let rows: Vec<DashboardRow> = countries
    .into_iter()
    .map(|c| DashboardRow {
      measures: by_iso.remove(&c.iso).unwrap_or_default(),
      country:  c.name,
      iso:      c.iso,
    })
    .collect();

  let lowest_inflation = lowest_inflation(&rows);
  let chart = load_series(store.as_ref(), state.chart_country.to_string()).await?;

  Ok(Json(Dashboard { year, rows, lowest_inflation, chart }))
}

/// Every measure kind needs an indicator row before the dashboard can label
/// its columns.
async fn ensure_catalog_seeded<S: WarehouseQuery>(store: &Arc<S>) -> Result<(), ApiError> {
  let indicators = store.list_indicators().await.map_err(ApiError::store)?;
  let missing: Vec<MeasureKind> = MeasureKind::iter()
    .filter(|kind| !indicators.iter().any(|i| i.kind == *kind))
    .collect();
  if missing.is_empty() {
    return Ok(());
  }
  tracing::warn!(?missing, "dashboard requested before the indicator catalog was seeded");
  Err(ApiError::Unavailable(
    "indicator catalog is not loaded; run populate-history or populate-latest first".to_string(),
  ))
}

/// The row with the smallest finite inflation value. Ties keep the first.
pub fn lowest_inflation(rows: &[DashboardRow]) -> Option<LowestInflation> {
  let mut best: Option<(&DashboardRow, f64)> = None;
  for row in rows {
    let Some(cell) = row.measures.inflation else { continue };
    if !cell.value.is_finite() {
      continue;
    }
    if best.is_none_or(|(_, v)| cell.value < v) {
      best = Some((row, cell.value));
    }
  }
  best.map(|(row, value)| LowestInflation {
    country: row.country.clone(),
    iso: row.iso.clone(),
    value,
  })
}
