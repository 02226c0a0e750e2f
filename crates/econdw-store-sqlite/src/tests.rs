//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use econdw_core::{
  catalog::{CountrySpec, HistoryDepth, IndicatorSpec, SourceSpec},
  fact::{FactKey, NewFact},
  measure::{Measure, MeasureKind},
  store::{Warehouse, WarehouseQuery},
  year::Year,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn jan1(year: i32) -> NaiveDate { NaiveDate::from_ymd_opt(year, 1, 1).unwrap() }

fn chile() -> CountrySpec { CountrySpec::new("Chile", "CHL", HistoryDepth::All) }

fn peru() -> CountrySpec { CountrySpec::new("Perú", "PER", HistoryDepth::Years(10)) }

fn indicator(name: &str, kind: MeasureKind) -> IndicatorSpec {
  IndicatorSpec {
    name:        name.into(),
    code:        "FP.CPI.TOTL.ZG".into(),
    unit:        "%".into(),
    kind,
    description: Some(format!("{name} data")),
  }
}

fn world_bank() -> SourceSpec {
  SourceSpec {
    name: "World Bank API".into(),
    url:  Some("https://data.worldbank.org/indicator".into()),
  }
}

/// Seed one of each dimension and return the key of a fact on them.
async fn seeded_key(s: &SqliteStore, year: i32, kind: MeasureKind) -> FactKey {
  let (date, _) = s.ensure_date(jan1(year)).await.unwrap();
  let (country, _) = s.ensure_country(chile()).await.unwrap();
  let (ind, _) = s.ensure_indicator(indicator(kind.as_ref(), kind)).await.unwrap();
  let (src, _) = s.ensure_source(world_bank(), jan1(2025)).await.unwrap();
  FactKey {
    date_id:      date.date_id,
    country_id:   country.country_id,
    indicator_id: ind.indicator_id,
    source_id:    src.source_id,
  }
}

fn new_fact(key: FactKey, kind: MeasureKind, value: f64, observed: i32) -> NewFact {
  NewFact { key, measure: Measure::new(kind, value), observed_at: Year(observed) }
}

// ─── Dimensions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_date_creates_once() {
  let s = store().await;

  let (first, created) = s.ensure_date(jan1(2023)).await.unwrap();
  assert!(created);
  assert_eq!(first.year, Year(2023));
  assert_eq!(first.month_name, "January");
  assert_eq!(first.quarter, 1);

  let (again, created) = s.ensure_date(jan1(2023)).await.unwrap();
  assert!(!created);
  assert_eq!(again, first);
}

#[tokio::test]
async fn ensure_country_is_keyed_by_iso() {
  let s = store().await;

  let (c, created) = s.ensure_country(chile()).await.unwrap();
  assert!(created);
  assert_eq!(c.iso, "CHL");
  assert_eq!(c.continent.as_deref(), Some("N/A"));

  // Same ISO with a different display name returns the original row.
  let renamed = CountrySpec::new("República de Chile", "CHL", HistoryDepth::All);
  let (again, created) = s.ensure_country(renamed).await.unwrap();
  assert!(!created);
  assert_eq!(again.name, "Chile");
  assert_eq!(again.country_id, c.country_id);
}

#[tokio::test]
async fn ensure_country_rejects_name_reuse() {
  let s = store().await;
  s.ensure_country(chile()).await.unwrap();

  let impostor = CountrySpec::new("Chile", "XXX", HistoryDepth::All);
  assert!(s.ensure_country(impostor).await.is_err());
}

#[tokio::test]
async fn ensure_indicator_keeps_first_definition() {
  let s = store().await;

  let (ind, created) =
    s.ensure_indicator(indicator("Inflación", MeasureKind::Inflation)).await.unwrap();
  assert!(created);
  assert_eq!(ind.kind, MeasureKind::Inflation);

  let mut changed = indicator("Inflación", MeasureKind::Inflation);
  changed.unit = "ratio".into();
  let (again, created) = s.ensure_indicator(changed).await.unwrap();
  assert!(!created);
  assert_eq!(again.unit, "%");
}

#[tokio::test]
async fn renamed_indicator_resolves_to_the_row_holding_its_kind() {
  let s = store().await;
  let (original, _) =
    s.ensure_indicator(indicator("Inflación", MeasureKind::Inflation)).await.unwrap();

  let (again, created) =
    s.ensure_indicator(indicator("Inflation", MeasureKind::Inflation)).await.unwrap();
  assert!(!created);
  assert_eq!(again, original);
  assert_eq!(s.list_indicators().await.unwrap().len(), 1);

  // A new name with a new kind still gets its own row.
  let (cpi, created) = s.ensure_indicator(indicator("IPC", MeasureKind::Cpi)).await.unwrap();
  assert!(created);
  assert_ne!(cpi.indicator_id, original.indicator_id);
}

#[tokio::test]
async fn ensure_source_is_a_singleton() {
  let s = store().await;

  let (src, created) = s.ensure_source(world_bank(), jan1(2024)).await.unwrap();
  assert!(created);
  assert_eq!(src.last_refreshed, Some(jan1(2024)));

  let (again, created) = s.ensure_source(world_bank(), jan1(2025)).await.unwrap();
  assert!(!created);
  assert_eq!(again.source_id, src.source_id);
  assert_eq!(again.last_refreshed, Some(jan1(2024)));
}

// ─── Facts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_creates_then_overwrites() {
  let s = store().await;
  let key = seeded_key(&s, 2023, MeasureKind::Inflation).await;

  let (fact, created) =
    s.upsert_fact(new_fact(key, MeasureKind::Inflation, 3.5, 2023)).await.unwrap();
  assert!(created);
  assert_eq!(fact.filed_under, Year(2023));
  assert_eq!(fact.measure.value, 3.5);

  let (again, created) =
    s.upsert_fact(new_fact(key, MeasureKind::Inflation, 4.25, 2022)).await.unwrap();
  assert!(!created);
  assert_eq!(again.fact_id, fact.fact_id);

  assert_eq!(s.count_facts().await.unwrap(), 1);
  let rows = s.all_facts().await.unwrap();
  assert_eq!(rows[0].measure, Measure::new(MeasureKind::Inflation, 4.25));
  assert_eq!(rows[0].observed_at, Year(2022));
}

#[tokio::test]
async fn upsert_rejects_measure_of_wrong_kind() {
  let s = store().await;
  let key = seeded_key(&s, 2023, MeasureKind::Inflation).await;

  let err = s
    .upsert_fact(new_fact(key, MeasureKind::Cpi, 101.0, 2023))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::KindMismatch { .. }));
  assert_eq!(s.count_facts().await.unwrap(), 0);
}

#[tokio::test]
async fn upsert_rejects_unknown_indicator() {
  let s = store().await;
  let mut key = seeded_key(&s, 2023, MeasureKind::Inflation).await;
  key.indicator_id += 100;

  let err = s
    .upsert_fact(new_fact(key, MeasureKind::Inflation, 1.0, 2023))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::IndicatorNotFound(_)));
}

#[tokio::test]
async fn upsert_rejects_dangling_date() {
  let s = store().await;
  let mut key = seeded_key(&s, 2023, MeasureKind::Inflation).await;
  key.date_id += 100;

  assert!(s.upsert_fact(new_fact(key, MeasureKind::Inflation, 1.0, 2023)).await.is_err());
  assert_eq!(s.count_facts().await.unwrap(), 0);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_fact_year_ignores_bare_date_rows() {
  let s = store().await;
  assert_eq!(s.latest_fact_year().await.unwrap(), None);

  let key = seeded_key(&s, 2021, MeasureKind::GdpGrowth).await;
  s.upsert_fact(new_fact(key, MeasureKind::GdpGrowth, 2.0, 2021)).await.unwrap();
  s.ensure_date(jan1(2025)).await.unwrap();

  assert_eq!(s.latest_fact_year().await.unwrap(), Some(Year(2021)));
}

#[tokio::test]
async fn find_year_returns_the_anchor_row() {
  let s = store().await;
  assert!(s.find_year(Year(2025)).await.unwrap().is_none());

  s.ensure_date(jan1(2025)).await.unwrap();
  let d = s.find_year(Year(2025)).await.unwrap().unwrap();
  assert_eq!(d.full_date, jan1(2025));
}

#[tokio::test]
async fn all_facts_are_ordered_by_year_then_country() {
  let s = store().await;
  let (src, _) = s.ensure_source(world_bank(), jan1(2025)).await.unwrap();
  let (ind, _) = s.ensure_indicator(indicator("IPC", MeasureKind::Cpi)).await.unwrap();
  let (chl, _) = s.ensure_country(chile()).await.unwrap();
  let (per, _) = s.ensure_country(peru()).await.unwrap();

  for (year, country) in [(2024, &per), (2023, &per), (2024, &chl), (2023, &chl)] {
    let (date, _) = s.ensure_date(jan1(year)).await.unwrap();
    let key = FactKey {
      date_id:      date.date_id,
      country_id:   country.country_id,
      indicator_id: ind.indicator_id,
      source_id:    src.source_id,
    };
    s.upsert_fact(new_fact(key, MeasureKind::Cpi, 100.0, year)).await.unwrap();
  }

  let order: Vec<_> = s
    .all_facts()
    .await
    .unwrap()
    .into_iter()
    .map(|r| (r.filed_under.get(), r.iso))
    .collect();
  assert_eq!(order, vec![
    (2023, "CHL".to_string()),
    (2023, "PER".to_string()),
    (2024, "CHL".to_string()),
    (2024, "PER".to_string()),
  ]);

  let peru_series = s.country_facts("PER".into()).await.unwrap();
  assert_eq!(peru_series.len(), 2);
  assert!(peru_series[0].filed_under < peru_series[1].filed_under);

  assert_eq!(s.facts_filed_under(Year(2024)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn accented_names_sort_alphabetically() {
  let s = store().await;
  let (src, _) = s.ensure_source(world_bank(), jan1(2025)).await.unwrap();
  let (ind, _) = s.ensure_indicator(indicator("IPC", MeasureKind::Cpi)).await.unwrap();
  let (date, _) = s.ensure_date(jan1(2024)).await.unwrap();

  for (name, iso) in [("Brasil", "BRA"), ("Bélgica", "BEL"), ("Alemania", "DEU")] {
    let (country, _) =
      s.ensure_country(CountrySpec::new(name, iso, HistoryDepth::Years(10))).await.unwrap();
    let key = FactKey {
      date_id:      date.date_id,
      country_id:   country.country_id,
      indicator_id: ind.indicator_id,
      source_id:    src.source_id,
    };
    s.upsert_fact(new_fact(key, MeasureKind::Cpi, 100.0, 2024)).await.unwrap();
  }

  let listed: Vec<_> = s.list_countries().await.unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(listed, vec!["Alemania", "Bélgica", "Brasil"]);

  let exported: Vec<_> = s.all_facts().await.unwrap().into_iter().map(|r| r.country).collect();
  assert_eq!(exported, vec!["Alemania", "Bélgica", "Brasil"]);
}

#[tokio::test]
async fn list_and_find_countries() {
  let s = store().await;
  s.ensure_country(peru()).await.unwrap();
  s.ensure_country(chile()).await.unwrap();

  let names: Vec<_> =
    s.list_countries().await.unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(names, vec!["Chile", "Perú"]);

  assert!(s.find_country("PER".into()).await.unwrap().is_some());
  assert!(s.find_country("ARG".into()).await.unwrap().is_none());
}
