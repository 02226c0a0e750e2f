//! [`SqliteStore`]: the SQLite implementation of [`Warehouse`] and
//! [`WarehouseQuery`].

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::OptionalExtension as _;

use econdw_core::{
  catalog::{CountrySpec, IndicatorSpec, SourceSpec},
  dimension::{CountryDim, DateDim, IndicatorDim, SourceDim},
  fact::{Fact, FactRow, NewFact},
  store::{Warehouse, WarehouseQuery},
  year::Year,
};

use crate::{
  Error, Result,
  collate::{DISPLAY_NAME, compare_display_names},
  encode::{
    COUNTRY_COLUMNS, DATE_COLUMNS, FACT_ROW_SELECT, INDICATOR_COLUMNS, RawDate,
    RawFactRow, RawIndicator, RawSource, SOURCE_COLUMNS, encode_date, encode_kind,
    read_country,
  },
  schema::SCHEMA,
};

/// Placeholder for geographic attributes no source currently provides.
const UNKNOWN_ATTRIBUTE: &str = "N/A";

// ─── Store ───────────────────────────────────────────────────────────────────

/// An econdw warehouse backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// What the upsert transaction found, decided inside the connection thread.
enum UpsertOutcome {
  Written { fact_id: i64, filed_under: i32, created: bool },
  UnknownIndicator,
  KindMismatch(String),
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Register connection-local functions and apply the schema.
  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.create_collation(DISPLAY_NAME, compare_display_names)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a fact query built from [`FACT_ROW_SELECT`] plus `tail`.
  async fn fact_rows(
    &self,
    tail: &'static str,
    param: Option<rusqlite::types::Value>,
  ) -> Result<Vec<FactRow>> {
    let raws: Vec<RawFactRow> = self
      .conn
      .call(move |conn| {
        let sql = format!("{FACT_ROW_SELECT} {tail}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
          Some(p) => stmt
            .query_map([p], RawFactRow::read)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawFactRow::read)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFactRow::into_row).collect()
  }
}

// ─── Warehouse impl ──────────────────────────────────────────────────────────

impl Warehouse for SqliteStore {
  type Error = Error;

  async fn ensure_date(&self, date: NaiveDate) -> Result<(DateDim, bool)> {
    let attrs = DateDim::for_date(0, date);
    let date_str = encode_date(date);

    let (raw, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let inserted = tx.execute(
          "INSERT INTO dim_date (
             full_date, day, month, month_name, quarter, year, week_of_year, is_weekend
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT(full_date) DO NOTHING",
          rusqlite::params![
            date_str,
            attrs.day,
            attrs.month,
            attrs.month_name,
            attrs.quarter,
            attrs.year.get(),
            attrs.week_of_year,
            attrs.is_weekend,
          ],
        )?;
        let raw = tx.query_row(
          &format!("SELECT {DATE_COLUMNS} FROM dim_date WHERE full_date = ?1"),
          rusqlite::params![date_str],
          RawDate::read,
        )?;
        tx.commit()?;
        Ok((raw, inserted == 1))
      })
      .await?;

    Ok((raw.into_dim()?, created))
  }

  async fn ensure_country(&self, spec: CountrySpec) -> Result<(CountryDim, bool)> {
    let (dim, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Keyed by ISO code only: a different country reusing an existing
        // display name is a constraint violation, not a match.
        let inserted = tx.execute(
          "INSERT INTO dim_country (name, iso, continent, region, capital)
           VALUES (?1, ?2, ?3, ?3, ?3)
           ON CONFLICT(iso) DO NOTHING",
          rusqlite::params![spec.name, spec.iso, UNKNOWN_ATTRIBUTE],
        )?;
        let dim = tx.query_row(
          &format!("SELECT {COUNTRY_COLUMNS} FROM dim_country WHERE iso = ?1"),
          rusqlite::params![spec.iso],
          read_country,
        )?;
        tx.commit()?;
        Ok((dim, inserted == 1))
      })
      .await?;

    Ok((dim, created))
  }

  async fn ensure_indicator(&self, spec: IndicatorSpec) -> Result<(IndicatorDim, bool)> {
    let kind_str = encode_kind(spec.kind);

    let (raw, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let by_name = format!("SELECT {INDICATOR_COLUMNS} FROM dim_indicator WHERE name = ?1");

        // Each kind has at most one row, so a renamed indicator resolves to
        // the row already holding its kind.
        let existing = match tx
          .query_row(&by_name, rusqlite::params![spec.name], RawIndicator::read)
          .optional()?
        {
          Some(raw) => Some(raw),
          None => tx
            .query_row(
              &format!("SELECT {INDICATOR_COLUMNS} FROM dim_indicator WHERE measure_kind = ?1"),
              rusqlite::params![kind_str],
              RawIndicator::read,
            )
            .optional()?,
        };
        if let Some(raw) = existing {
          tx.commit()?;
          return Ok((raw, false));
        }

        tx.execute(
          "INSERT INTO dim_indicator (name, description, unit, measure_kind)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![spec.name, spec.description, spec.unit, kind_str],
        )?;
        let raw = tx.query_row(&by_name, rusqlite::params![spec.name], RawIndicator::read)?;
        tx.commit()?;
        Ok((raw, true))
      })
      .await?;

    Ok((raw.into_dim()?, created))
  }

  async fn ensure_source(&self, spec: SourceSpec, today: NaiveDate) -> Result<(SourceDim, bool)> {
    let today_str = encode_date(today);

    let (raw, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let inserted = tx.execute(
          "INSERT INTO dim_source (name, url, last_refreshed)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(name) DO NOTHING",
          rusqlite::params![spec.name, spec.url, today_str],
        )?;
        let raw = tx.query_row(
          &format!("SELECT {SOURCE_COLUMNS} FROM dim_source WHERE name = ?1"),
          rusqlite::params![spec.name],
          RawSource::read,
        )?;
        tx.commit()?;
        Ok((raw, inserted == 1))
      })
      .await?;

    Ok((raw.into_dim()?, created))
  }

  async fn upsert_fact(&self, input: NewFact) -> Result<(Fact, bool)> {
    let key = input.key;
    let kind_str = encode_kind(input.measure.kind);
    let value = input.measure.value;
    let observed = input.observed_at.get();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let registered: Option<String> = tx
          .query_row(
            "SELECT measure_kind FROM dim_indicator WHERE indicator_id = ?1",
            rusqlite::params![key.indicator_id],
            |r| r.get(0),
          )
          .optional()?;
        match registered {
          None => return Ok(UpsertOutcome::UnknownIndicator),
          Some(k) if k != kind_str => return Ok(UpsertOutcome::KindMismatch(k)),
          Some(_) => {}
        }

        let existed = tx
          .query_row(
            "SELECT 1 FROM fact_economic
             WHERE date_id = ?1 AND country_id = ?2 AND indicator_id = ?3 AND source_id = ?4",
            rusqlite::params![key.date_id, key.country_id, key.indicator_id, key.source_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();

        tx.execute(
          "INSERT INTO fact_economic (
             date_id, country_id, indicator_id, source_id,
             measure_kind, value, observed_year
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT(date_id, country_id, indicator_id, source_id) DO UPDATE SET
             measure_kind  = excluded.measure_kind,
             value         = excluded.value,
             observed_year = excluded.observed_year",
          rusqlite::params![
            key.date_id,
            key.country_id,
            key.indicator_id,
            key.source_id,
            kind_str,
            value,
            observed,
          ],
        )?;

        let (fact_id, filed_under): (i64, i32) = tx.query_row(
          "SELECT f.fact_id, d.year
           FROM fact_economic f
           JOIN dim_date d ON d.date_id = f.date_id
           WHERE f.date_id = ?1 AND f.country_id = ?2
             AND f.indicator_id = ?3 AND f.source_id = ?4",
          rusqlite::params![key.date_id, key.country_id, key.indicator_id, key.source_id],
          |r| Ok((r.get(0)?, r.get(1)?)),
        )?;

        tx.commit()?;
        Ok(UpsertOutcome::Written { fact_id, filed_under, created: !existed })
      })
      .await?;

    match outcome {
      UpsertOutcome::Written { fact_id, filed_under, created } => Ok((
        Fact {
          fact_id,
          key,
          filed_under: Year(filed_under),
          observed_at: input.observed_at,
          measure: input.measure,
        },
        created,
      )),
      UpsertOutcome::UnknownIndicator => Err(Error::IndicatorNotFound(key.indicator_id)),
      UpsertOutcome::KindMismatch(expected) => Err(Error::KindMismatch {
        indicator_id: key.indicator_id,
        expected,
        got: input.measure.kind,
      }),
    }
  }
}

// ─── WarehouseQuery impl ─────────────────────────────────────────────────────

impl WarehouseQuery for SqliteStore {
  type Error = Error;

  async fn list_countries(&self) -> Result<Vec<CountryDim>> {
    let countries = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COUNTRY_COLUMNS} FROM dim_country ORDER BY name COLLATE DISPLAY_NAME"
        ))?;
        let rows = stmt
          .query_map([], read_country)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(countries)
  }

  async fn list_indicators(&self) -> Result<Vec<IndicatorDim>> {
    let raws: Vec<RawIndicator> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INDICATOR_COLUMNS} FROM dim_indicator ORDER BY name COLLATE DISPLAY_NAME"
        ))?;
        let rows = stmt
          .query_map([], RawIndicator::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIndicator::into_dim).collect()
  }

  async fn find_country(&self, iso: String) -> Result<Option<CountryDim>> {
    let dim = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COUNTRY_COLUMNS} FROM dim_country WHERE iso = ?1"),
              rusqlite::params![iso],
              read_country,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(dim)
  }

  async fn find_year(&self, year: Year) -> Result<Option<DateDim>> {
    let date_str = encode_date(year.anchor()?);

    let raw: Option<RawDate> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {DATE_COLUMNS} FROM dim_date WHERE full_date = ?1"),
              rusqlite::params![date_str],
              RawDate::read,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDate::into_dim).transpose()
  }

  async fn latest_fact_year(&self) -> Result<Option<Year>> {
    let year: Option<i32> = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT MAX(d.year)
           FROM fact_economic f
           JOIN dim_date d ON d.date_id = f.date_id",
          [],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(year.map(Year))
  }

  async fn facts_filed_under(&self, year: Year) -> Result<Vec<FactRow>> {
    self
      .fact_rows(
        "WHERE d.year = ?1 ORDER BY c.name COLLATE DISPLAY_NAME, i.name COLLATE DISPLAY_NAME",
        Some(rusqlite::types::Value::Integer(i64::from(year.get()))),
      )
      .await
  }

  async fn country_facts(&self, iso: String) -> Result<Vec<FactRow>> {
    self
      .fact_rows(
        "WHERE c.iso = ?1 ORDER BY d.year, i.name COLLATE DISPLAY_NAME",
        Some(rusqlite::types::Value::Text(iso)),
      )
      .await
  }

  async fn all_facts(&self) -> Result<Vec<FactRow>> {
    self
      .fact_rows(
        "ORDER BY d.year, c.name COLLATE DISPLAY_NAME, i.name COLLATE DISPLAY_NAME",
        None,
      )
      .await
  }

  async fn count_facts(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM fact_economic", [], |r| r.get(0))?)
      })
      .await?;
    Ok(u64::try_from(n).unwrap_or_default())
  }
}
