//! The backfill resolver.
//!
//! Walks the catalog one (country, year, indicator) unit at a time, asks the
//! [`IndicatorSource`] for exactly that year, and hands every value found to
//! the [`FactUpserter`]. Fetch errors count as "no value"; a failed fact write
//! is logged and skipped. Only seeding, country rows, and the optional
//! consecutive-failure limit end a run early.

use chrono::Utc;
use econdw_core::{
  catalog::{Catalog, CountrySpec, SourceSpec},
  dimension::CountryDim,
  source::{FetchRequest, IndicatorSource, Observation},
  store::Warehouse,
  year::{Year, YearWindow},
};
use tracing::Instrument;

use crate::{
  Error, Result,
  report::{Missing, Mode, RunReport},
  seed::{SeededCatalog, SeededIndicator, seed_catalog},
  upsert::{FactUpserter, Resolved},
};

/// Per-run knobs that are not part of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
  pub window:                           YearWindow,
  /// Abort once this many lookups in a row have failed outright. `None`
  /// never aborts.
  pub abort_after_consecutive_failures: Option<u32>,
}

impl RunOptions {
  pub fn new(window: YearWindow) -> Self {
    Self { window, abort_after_consecutive_failures: None }
  }
}

pub struct Resolver<'a, W, S> {
  store:    &'a W,
  source:   &'a S,
  catalog:  &'a Catalog,
  provider: &'a SourceSpec,
  options:  RunOptions,
}

/// Mutable state threaded through one run.
struct RunState {
  report:      RunReport,
  consecutive: u32,
}

impl<'a, W, S> Resolver<'a, W, S>
where
  W: Warehouse,
  S: IndicatorSource,
{
  pub fn new(
    store: &'a W,
    source: &'a S,
    catalog: &'a Catalog,
    provider: &'a SourceSpec,
    options: RunOptions,
  ) -> Self {
    Self { store, source, catalog, provider, options }
  }

  pub async fn run_historical(&self) -> Result<RunReport> { self.run(Mode::Historical).await }

  pub async fn run_latest(&self, reference: Year) -> Result<RunReport> {
    self.run(Mode::Latest { reference }).await
  }

  pub async fn run(&self, mode: Mode) -> Result<RunReport> {
    let report = RunReport::new(mode);
    let span = tracing::info_span!("backfill", run_id = %report.run_id, %mode);
    self.run_inner(RunState { report, consecutive: 0 }).instrument(span).await
  }

  async fn run_inner(&self, mut state: RunState) -> Result<RunReport> {
    let window = self.options.window;
    tracing::info!(
      countries = self.catalog.countries.len(),
      indicators = self.catalog.indicators.len(),
      min = %window.min(),
      max = %window.max(),
      "starting backfill",
    );

    let today = Utc::now().date_naive();
    let seeded =
      seed_catalog(self.store, &self.catalog.indicators, self.provider, today).await?;

    if let Mode::Latest { reference } = state.report.mode {
      self
        .store
        .ensure_date(reference.anchor()?)
        .await
        .map_err(Error::store)?;
    }

    for spec in &self.catalog.countries {
      let (country, created) = self
        .store
        .ensure_country(spec.clone())
        .await
        .map_err(Error::store)?;
      if created {
        tracing::info!(iso = %country.iso, name = %country.name, "created country row");
      }

      match state.report.mode {
        Mode::Historical => self.historical(&mut state, &seeded, spec, &country).await?,
        Mode::Latest { reference } => {
          self.latest(&mut state, &seeded, &country, reference).await?
        }
      }
    }

    let r = &state.report;
    tracing::info!(
      created = r.facts_created,
      updated = r.facts_updated,
      fetch_failures = r.fetch_failures,
      write_failures = r.write_failures,
      missing = r.missing.len(),
      "backfill finished",
    );
    Ok(state.report)
  }

  /// Every year of the country's history, newest first, every indicator.
  async fn historical(
    &self,
    state: &mut RunState,
    seeded: &SeededCatalog,
    spec: &CountrySpec,
    country: &CountryDim,
  ) -> Result<()> {
    let years = self.options.window.history(spec.history);
    tracing::info!(iso = %country.iso, start = %self.options.window.start_for(spec.history), "historical backfill");

    for year in years {
      for indicator in &seeded.indicators {
        let Some(obs) = self.lookup(state, country, indicator, year, Mode::Historical).await?
        else {
          continue;
        };
        let resolved = Resolved {
          filed_under: year,
          country,
          indicator: &indicator.dim,
          value: obs.value,
          observed_at: obs.year,
        };
        self.write(state, seeded, resolved).await;
      }
    }
    Ok(())
  }

  /// For each indicator, the newest year in the window that has a value.
  async fn latest(
    &self,
    state: &mut RunState,
    seeded: &SeededCatalog,
    country: &CountryDim,
    reference: Year,
  ) -> Result<()> {
    let mode = Mode::Latest { reference };
    tracing::info!(iso = %country.iso, %reference, "latest-value sweep");

    for indicator in &seeded.indicators {
      let mut found = None;
      for year in self.options.window.descending() {
        if let Some(obs) = self.lookup(state, country, indicator, year, mode).await? {
          found = Some(obs);
          break;
        }
      }

      let Some(obs) = found else {
        tracing::warn!(
          iso = %country.iso,
          indicator = %indicator.dim.name,
          "no data found",
        );
        state.report.missing.push(Missing {
          iso:       country.iso.clone(),
          indicator: indicator.dim.name.clone(),
        });
        continue;
      };

      let resolved = Resolved {
        filed_under: reference,
        country,
        indicator: &indicator.dim,
        value: obs.value,
        observed_at: obs.year,
      };
      self.write(state, seeded, resolved).await;
    }
    Ok(())
  }

  /// Fetch one year. Failures are counted and read as "no value" unless the
  /// consecutive-failure limit is reached.
  async fn lookup(
    &self,
    state: &mut RunState,
    country: &CountryDim,
    indicator: &SeededIndicator,
    year: Year,
    mode: Mode,
  ) -> Result<Option<Observation>> {
    let request = FetchRequest {
      iso: country.iso.clone(),
      code: indicator.spec.code.clone(),
      year,
    };

    match self.source.fetch(request).await {
      Ok(obs) => {
        state.consecutive = 0;
        Ok(obs)
      }
      Err(e) => {
        state.report.fetch_failures += 1;
        state.consecutive += 1;
        match mode {
          Mode::Historical => tracing::debug!(
            iso = %country.iso,
            indicator = %indicator.dim.name,
            %year,
            error = %e,
            "lookup failed",
          ),
          Mode::Latest { .. } => tracing::warn!(
            iso = %country.iso,
            indicator = %indicator.dim.name,
            %year,
            error = %e,
            "lookup failed",
          ),
        }

        if let Some(limit) = self.options.abort_after_consecutive_failures
          && state.consecutive >= limit
        {
          tracing::error!(failures = state.consecutive, "giving up on the indicator source");
          return Err(Error::SourceUnavailable { failures: state.consecutive });
        }
        Ok(None)
      }
    }
  }

  async fn write(&self, state: &mut RunState, seeded: &SeededCatalog, resolved: Resolved<'_>) {
    let upserter = FactUpserter::new(self.store, &seeded.source);
    match upserter.upsert(resolved).await {
      Ok((_, true)) => state.report.facts_created += 1,
      Ok((_, false)) => state.report.facts_updated += 1,
      Err(e) => {
        state.report.write_failures += 1;
        tracing::error!(
          iso = %resolved.country.iso,
          indicator = %resolved.indicator.name,
          year = %resolved.filed_under,
          error = %e,
          "failed to store fact",
        );
      }
    }
  }
}
