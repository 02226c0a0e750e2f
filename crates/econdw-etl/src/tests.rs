//! Resolver tests against an in-memory store and a scripted indicator source.

use std::{collections::HashMap, sync::Mutex};

use chrono::NaiveDate;
use econdw_core::{
  catalog::{Catalog, CountrySpec, HistoryDepth, IndicatorSpec, SourceSpec},
  dimension::{CountryDim, DateDim, IndicatorDim, SourceDim},
  fact::{Fact, NewFact},
  measure::MeasureKind,
  source::{FetchRequest, IndicatorSource, Observation},
  store::{Warehouse, WarehouseQuery},
  year::{Year, YearWindow},
};
use econdw_store_sqlite::SqliteStore;

use crate::{Error, Missing, Mode, Resolver, RunOptions, seed_catalog};

// ─── Fixtures ────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("scripted outage")]
struct Outage;

#[derive(Clone, Copy)]
enum Answer {
  Value(f64),
  Fail,
}

/// Answers from a fixed script keyed by (iso, code, year); anything not
/// scripted gets `fallback`, or no value.
#[derive(Default)]
struct ScriptedSource {
  script:   HashMap<(String, String, i32), Answer>,
  fallback: Option<Answer>,
  calls:    Mutex<Vec<FetchRequest>>,
}

impl ScriptedSource {
  fn answering(fallback: Answer) -> Self { Self { fallback: Some(fallback), ..Self::default() } }

  fn with(mut self, iso: &str, code: &str, year: i32, answer: Answer) -> Self {
    self.script.insert((iso.into(), code.into(), year), answer);
    self
  }

  fn calls_for(&self, iso: &str, code: &str) -> Vec<i32> {
    self
      .calls
      .lock()
      .unwrap()
      .iter()
      .filter(|r| r.iso == iso && r.code == code)
      .map(|r| r.year.get())
      .collect()
  }

  fn call_count(&self) -> usize { self.calls.lock().unwrap().len() }
}

impl IndicatorSource for ScriptedSource {
  type Error = Outage;

  async fn fetch(&self, request: FetchRequest) -> Result<Option<Observation>, Outage> {
    let key = (request.iso.clone(), request.code.clone(), request.year.get());
    let year = request.year;
    self.calls.lock().unwrap().push(request);

    match self.script.get(&key).copied().or(self.fallback) {
      Some(Answer::Value(value)) => Ok(Some(Observation { value, year })),
      Some(Answer::Fail) => Err(Outage),
      None => Ok(None),
    }
  }
}

const INFLATION: &str = "FP.CPI.TOTL.ZG";
const GDP: &str = "NY.GDP.MKTP.KD.ZG";

fn indicator(name: &str, code: &str, kind: MeasureKind) -> IndicatorSpec {
  IndicatorSpec {
    name: name.into(),
    code: code.into(),
    unit: "%".into(),
    kind,
    description: None,
  }
}

fn catalog(countries: Vec<CountrySpec>) -> Catalog {
  Catalog {
    countries,
    indicators: vec![
      indicator("Inflación", INFLATION, MeasureKind::Inflation),
      indicator("Crecimiento PIB", GDP, MeasureKind::GdpGrowth),
    ],
  }
}

fn chile() -> CountrySpec { CountrySpec::new("Chile", "CHL", HistoryDepth::All) }

fn peru(years: u32) -> CountrySpec { CountrySpec::new("Perú", "PER", HistoryDepth::Years(years)) }

fn provider() -> SourceSpec {
  SourceSpec { name: "World Bank API".into(), url: None }
}

fn options(min: i32, max: i32) -> RunOptions {
  RunOptions::new(YearWindow::new(Year(min), Year(max)).unwrap())
}

async fn store() -> SqliteStore { SqliteStore::open_in_memory().await.expect("in-memory store") }

/// (filed year, observed year, indicator, value) for one country.
async fn facts_of(s: &SqliteStore, iso: &str) -> Vec<(i32, i32, String, f64)> {
  s.country_facts(iso.into())
    .await
    .unwrap()
    .into_iter()
    .map(|r| (r.filed_under.get(), r.observed_at.get(), r.indicator, r.measure.value))
    .collect()
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seeding_is_idempotent_and_fills_descriptions() {
  let s = store().await;
  let cat = catalog(vec![chile()]);
  let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

  let first = seed_catalog(&s, &cat.indicators, &provider(), today).await.unwrap();
  assert_eq!(first.indicators.len(), 2);
  assert_eq!(
    first.indicators[0].dim.description.as_deref(),
    Some("Inflación data from the World Bank API"),
  );
  assert_eq!(first.source.last_refreshed, Some(today));

  let again = seed_catalog(&s, &cat.indicators, &provider(), today).await.unwrap();
  assert_eq!(again, first);
  assert_eq!(s.list_indicators().await.unwrap().len(), 2);
}

#[tokio::test]
async fn renaming_an_indicator_keeps_filing_under_the_stored_row() {
  let s = store().await;
  let source = ScriptedSource::default().with("PER", INFLATION, 2025, Answer::Value(2.0));
  let provider = provider();

  let cat = catalog(vec![peru(1)]);
  Resolver::new(&s, &source, &cat, &provider, options(2000, 2025))
    .run_historical()
    .await
    .unwrap();

  let mut renamed = catalog(vec![peru(1)]);
  renamed.indicators[0].name = "Inflation".into();
  let report = Resolver::new(&s, &source, &renamed, &provider, options(2000, 2025))
    .run_historical()
    .await
    .unwrap();

  assert_eq!(report.facts_updated, 1);
  assert_eq!(report.write_failures, 0);
  assert_eq!(s.list_indicators().await.unwrap().len(), 2);
  assert_eq!(facts_of(&s, "PER").await, vec![(2025, 2025, "Inflación".to_string(), 2.0)]);
}

// ─── Historical ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn historical_covers_exactly_the_configured_years() {
  let s = store().await;
  let source = ScriptedSource::answering(Answer::Value(1.0));
  let cat = catalog(vec![chile(), peru(3)]);
  let provider = provider();

  let report = Resolver::new(&s, &source, &cat, &provider, options(2018, 2025))
    .run_historical()
    .await
    .unwrap();

  let years = |facts: Vec<(i32, i32, String, f64)>| {
    let mut y: Vec<i32> = facts.into_iter().map(|f| f.0).collect();
    y.dedup();
    y
  };
  assert_eq!(years(facts_of(&s, "PER").await), vec![2023, 2024, 2025]);
  assert_eq!(years(facts_of(&s, "CHL").await), (2018..=2025).collect::<Vec<_>>());

  // (8 + 3) years × 2 indicators.
  assert_eq!(report.facts_created, 22);
  assert_eq!(report.facts_updated, 0);
  assert_eq!(s.count_facts().await.unwrap(), 22);
}

#[tokio::test]
async fn historical_depth_never_reaches_below_the_floor() {
  let s = store().await;
  let source = ScriptedSource::answering(Answer::Value(1.0));
  let cat = catalog(vec![peru(10)]);
  let provider = provider();

  Resolver::new(&s, &source, &cat, &provider, options(2022, 2025))
    .run_historical()
    .await
    .unwrap();

  let mut calls = source.calls_for("PER", INFLATION);
  calls.sort();
  assert_eq!(calls, vec![2022, 2023, 2024, 2025]);
}

#[tokio::test]
async fn historical_rerun_updates_in_place() {
  let s = store().await;
  let source = ScriptedSource::default()
    .with("PER", INFLATION, 2024, Answer::Value(2.5))
    .with("PER", GDP, 2025, Answer::Value(3.1));
  let cat = catalog(vec![peru(2)]);
  let provider = provider();
  let resolver = Resolver::new(&s, &source, &cat, &provider, options(2000, 2025));

  let first = resolver.run_historical().await.unwrap();
  let before = facts_of(&s, "PER").await;
  let second = resolver.run_historical().await.unwrap();

  assert_eq!(first.facts_created, 2);
  assert_eq!(second.facts_created, 0);
  assert_eq!(second.facts_updated, 2);
  assert_ne!(first.run_id, second.run_id);
  assert_eq!(facts_of(&s, "PER").await, before);
}

#[tokio::test]
async fn historical_visits_every_year_even_after_a_hit() {
  let s = store().await;
  let source = ScriptedSource::default().with("PER", INFLATION, 2025, Answer::Value(4.0));
  let cat = catalog(vec![peru(3)]);
  let provider = provider();

  Resolver::new(&s, &source, &cat, &provider, options(2000, 2025))
    .run_historical()
    .await
    .unwrap();

  assert_eq!(source.calls_for("PER", INFLATION), vec![2025, 2024, 2023]);
  assert_eq!(source.call_count(), 6);
}

// ─── Latest value ────────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_picks_the_most_recent_year_with_data() {
  let s = store().await;
  let source = ScriptedSource::default()
    .with("CHL", INFLATION, 2019, Answer::Value(2.3))
    .with("CHL", INFLATION, 2021, Answer::Value(4.5));
  let cat = catalog(vec![chile()]);
  let provider = provider();

  let report = Resolver::new(&s, &source, &cat, &provider, options(2019, 2025))
    .run_latest(Year(2025))
    .await
    .unwrap();

  assert_eq!(facts_of(&s, "CHL").await, vec![(2025, 2021, "Inflación".to_string(), 4.5)]);
  // Scanning stops at the first hit.
  assert_eq!(source.calls_for("CHL", INFLATION), vec![2025, 2024, 2023, 2022, 2021]);
  assert_eq!(report.facts_created, 1);
}

#[tokio::test]
async fn latest_files_chilean_inflation_under_the_reference_year() {
  let s = store().await;
  let source = ScriptedSource::default().with("CHL", INFLATION, 2023, Answer::Value(3.5));
  let cat = catalog(vec![chile()]);
  let provider = provider();

  Resolver::new(&s, &source, &cat, &provider, options(1960, 2025))
    .run_latest(Year(2025))
    .await
    .unwrap();

  let rows = s.facts_filed_under(Year(2025)).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].iso, "CHL");
  assert_eq!(rows[0].observed_at, Year(2023));
  assert_eq!(rows[0].measure.kind, MeasureKind::Inflation);
  assert_eq!(rows[0].measure.value, 3.5);
}

#[tokio::test]
async fn latest_reports_pairs_without_any_value() {
  let s = store().await;
  let source = ScriptedSource::default().with("CHL", GDP, 2020, Answer::Value(-6.1));
  let cat = catalog(vec![chile()]);
  let provider = provider();

  let report = Resolver::new(&s, &source, &cat, &provider, options(2015, 2025))
    .run_latest(Year(2025))
    .await
    .unwrap();

  assert_eq!(report.mode, Mode::Latest { reference: Year(2025) });
  assert_eq!(report.missing, vec![Missing {
    iso:       "CHL".into(),
    indicator: "Inflación".into(),
  }]);
  assert_eq!(facts_of(&s, "CHL").await, vec![(2025, 2020, "Crecimiento PIB".to_string(), -6.1)]);
  assert_eq!(source.calls_for("CHL", INFLATION).len(), 11);
}

#[tokio::test]
async fn latest_creates_the_reference_date_row_even_without_data() {
  let s = store().await;
  let source = ScriptedSource::default();
  let cat = catalog(vec![chile()]);
  let provider = provider();

  let report = Resolver::new(&s, &source, &cat, &provider, options(2024, 2025))
    .run_latest(Year(2026))
    .await
    .unwrap();

  assert_eq!(report.facts_written(), 0);
  assert_eq!(report.missing.len(), 2);
  assert!(s.find_year(Year(2026)).await.unwrap().is_some());
  assert_eq!(s.count_facts().await.unwrap(), 0);
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_failures_are_read_as_no_value() {
  let s = store().await;
  let source = ScriptedSource::default()
    .with("CHL", INFLATION, 2025, Answer::Fail)
    .with("CHL", INFLATION, 2024, Answer::Value(4.1));
  let cat = catalog(vec![chile()]);
  let provider = provider();

  let report = Resolver::new(&s, &source, &cat, &provider, options(2020, 2025))
    .run_latest(Year(2025))
    .await
    .unwrap();

  assert_eq!(report.fetch_failures, 1);
  assert_eq!(facts_of(&s, "CHL").await, vec![(2025, 2024, "Inflación".to_string(), 4.1)]);
}

#[tokio::test]
async fn consecutive_failures_abort_when_a_limit_is_set() {
  let s = store().await;
  let source = ScriptedSource::answering(Answer::Fail);
  let cat = catalog(vec![chile(), peru(5)]);
  let provider = provider();
  let mut opts = options(2000, 2025);
  opts.abort_after_consecutive_failures = Some(3);

  let err = Resolver::new(&s, &source, &cat, &provider, opts).run_historical().await.unwrap_err();

  assert!(matches!(err, Error::SourceUnavailable { failures: 3 }));
  assert_eq!(source.call_count(), 3);
}

#[tokio::test]
async fn a_success_resets_the_failure_streak() {
  let s = store().await;
  // Inflation always fails but GDP always answers, so the streak never
  // reaches two.
  let mut source = ScriptedSource::answering(Answer::Fail);
  for year in 2020..=2025 {
    source = source.with("PER", GDP, year, Answer::Value(1.0));
  }
  let cat = catalog(vec![peru(6)]);
  let provider = provider();
  let mut opts = options(2020, 2025);
  opts.abort_after_consecutive_failures = Some(2);

  let report = Resolver::new(&s, &source, &cat, &provider, opts).run_historical().await.unwrap();
  assert_eq!(report.fetch_failures, 6);
  assert_eq!(report.facts_created, 6);
}

#[tokio::test]
async fn without_a_limit_failures_never_abort() {
  let s = store().await;
  let source = ScriptedSource::answering(Answer::Fail);
  let cat = catalog(vec![chile()]);
  let provider = provider();

  let report = Resolver::new(&s, &source, &cat, &provider, options(2021, 2025))
    .run_historical()
    .await
    .unwrap();

  assert_eq!(report.fetch_failures, 10);
  assert_eq!(report.facts_written(), 0);
}

/// Delegates to a real store but refuses to write facts carrying `poison`.
struct PoisonedStore {
  inner:  SqliteStore,
  poison: f64,
}

#[derive(Debug, thiserror::Error)]
enum PoisonError {
  #[error(transparent)]
  Store(#[from] econdw_store_sqlite::Error),
  #[error("poisoned write")]
  Poisoned,
}

impl Warehouse for PoisonedStore {
  type Error = PoisonError;

  async fn ensure_date(&self, date: NaiveDate) -> Result<(DateDim, bool), PoisonError> {
    Ok(self.inner.ensure_date(date).await?)
  }

  async fn ensure_country(&self, spec: CountrySpec) -> Result<(CountryDim, bool), PoisonError> {
    Ok(self.inner.ensure_country(spec).await?)
  }

  async fn ensure_indicator(
    &self,
    spec: IndicatorSpec,
  ) -> Result<(IndicatorDim, bool), PoisonError> {
    Ok(self.inner.ensure_indicator(spec).await?)
  }

  async fn ensure_source(
    &self,
    spec: SourceSpec,
    today: NaiveDate,
  ) -> Result<(SourceDim, bool), PoisonError> {
    Ok(self.inner.ensure_source(spec, today).await?)
  }

  async fn upsert_fact(&self, input: NewFact) -> Result<(Fact, bool), PoisonError> {
    if input.measure.value == self.poison {
      return Err(PoisonError::Poisoned);
    }
    Ok(self.inner.upsert_fact(input).await?)
  }
}

#[tokio::test]
async fn a_failed_write_does_not_stop_the_run() {
  let s = PoisonedStore { inner: store().await, poison: 13.0 };
  let source = ScriptedSource::answering(Answer::Value(1.0))
    .with("PER", INFLATION, 2024, Answer::Value(13.0));
  let cat = catalog(vec![peru(2)]);
  let provider = provider();

  let report = Resolver::new(&s, &source, &cat, &provider, options(2000, 2025))
    .run_historical()
    .await
    .unwrap();

  assert_eq!(report.write_failures, 1);
  assert_eq!(report.facts_created, 3);
  assert_eq!(s.inner.count_facts().await.unwrap(), 3);
}
