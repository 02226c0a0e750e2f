//! Catalog seeding: make sure every catalog indicator and the source exist
//! before any fact refers to them.

use chrono::NaiveDate;
use econdw_core::{
  catalog::{IndicatorSpec, SourceSpec},
  dimension::{IndicatorDim, SourceDim},
  store::Warehouse,
};

use crate::{Error, Result};

/// A catalog indicator paired with its stored dimension row.
///
/// The row is authoritative: an indicator that already existed keeps the
/// definition it was first created with.
#[derive(Debug, Clone, PartialEq)]
pub struct SeededIndicator {
  pub spec: IndicatorSpec,
  pub dim:  IndicatorDim,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeededCatalog {
  pub source:     SourceDim,
  pub indicators: Vec<SeededIndicator>,
}

/// Get or create the source row and one indicator row per catalog entry,
/// in catalog order.
pub async fn seed_catalog<W: Warehouse>(
  store: &W,
  indicators: &[IndicatorSpec],
  source: &SourceSpec,
  today: NaiveDate,
) -> Result<SeededCatalog> {
  let (source_dim, created) = store
    .ensure_source(source.clone(), today)
    .await
    .map_err(Error::store)?;
  if created {
    tracing::info!(source = %source_dim.name, "created source row");
  }

  let mut seeded = Vec::with_capacity(indicators.len());
  for spec in indicators {
    let (dim, created) = store
      .ensure_indicator(spec.clone().with_default_description(&source.name))
      .await
      .map_err(Error::store)?;

    if created {
      tracing::info!(indicator = %dim.name, kind = %dim.kind, "created indicator row");
    } else if dim.name != spec.name {
      tracing::warn!(
        stored = %dim.name,
        configured = %spec.name,
        kind = %dim.kind,
        "indicator name differs from the stored row; using the stored row",
      );
    } else if dim.kind != spec.kind {
      tracing::warn!(
        indicator = %dim.name,
        stored = %dim.kind,
        configured = %spec.kind,
        "indicator kind differs from the stored row; using the stored kind",
      );
    }

    seeded.push(SeededIndicator { spec: spec.clone(), dim });
  }

  Ok(SeededCatalog { source: source_dim, indicators: seeded })
}
