//! `GET /series/{iso}`: every year on record for one country.

use axum::{
  Json,
  extract::{Path, State},
};
use econdw_core::{measure::PerKind, store::WarehouseQuery, year::Year};
use serde::Serialize;

use crate::{
  ApiState,
  error::ApiError,
  table::{Cell, pivot},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
  pub year:     Year,
  pub measures: PerKind<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
  pub country: String,
  pub iso:     String,
  pub points:  Vec<SeriesPoint>,
}

/// `None` when no country has this ISO code.
pub(crate) async fn load_series<S: WarehouseQuery>(
  store: &S,
  iso: String,
) -> Result<Option<Series>, ApiError> {
  let iso = iso.to_ascii_uppercase();
  let Some(country) = store.find_country(iso.clone()).await.map_err(ApiError::store)? else {
    return Ok(None);
  };

  let points = pivot(store.country_facts(iso).await.map_err(ApiError::store)?)
    .into_iter()
    .map(|cy| SeriesPoint { year: cy.year, measures: cy.measures })
    .collect();

  Ok(Some(Series { country: country.name, iso: country.iso, points }))
}

pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Path(iso): Path<String>,
) -> Result<Json<Series>, ApiError>
where
  S: WarehouseQuery + 'static,
{
  load_series(state.store.as_ref(), iso.clone())
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("unknown country {iso}")))
}
