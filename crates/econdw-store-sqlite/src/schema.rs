//! SQL schema for the econdw SQLite warehouse.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Dimension rows are insert-once; no UPDATE is ever issued against them.
CREATE TABLE IF NOT EXISTS dim_date (
    date_id       INTEGER PRIMARY KEY,
    full_date     TEXT    NOT NULL UNIQUE,   -- ISO 8601 calendar date
    day           INTEGER NOT NULL,
    month         INTEGER NOT NULL,
    month_name    TEXT    NOT NULL,
    quarter       INTEGER NOT NULL,
    year          INTEGER NOT NULL,
    week_of_year  INTEGER NOT NULL,
    is_weekend    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS dim_country (
    country_id  INTEGER PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    iso         TEXT NOT NULL UNIQUE,        -- ISO 3166-1 alpha-3
    continent   TEXT,
    region      TEXT,
    capital     TEXT
);

CREATE TABLE IF NOT EXISTS dim_indicator (
    indicator_id  INTEGER PRIMARY KEY,
    name          TEXT NOT NULL UNIQUE,
    description   TEXT,
    unit          TEXT NOT NULL,
    measure_kind  TEXT NOT NULL UNIQUE
        CHECK (measure_kind IN ('inflation', 'gdp_growth', 'exchange_rate', 'cpi'))
);

CREATE TABLE IF NOT EXISTS dim_source (
    source_id       INTEGER PRIMARY KEY,
    name            TEXT NOT NULL UNIQUE,
    url             TEXT,
    last_refreshed  TEXT                     -- ISO 8601 calendar date
);

-- One row per (date, country, indicator, source); re-ingestion overwrites
-- the measure in place.
CREATE TABLE IF NOT EXISTS fact_economic (
    fact_id        INTEGER PRIMARY KEY,
    date_id        INTEGER NOT NULL REFERENCES dim_date(date_id),
    country_id     INTEGER NOT NULL REFERENCES dim_country(country_id),
    indicator_id   INTEGER NOT NULL REFERENCES dim_indicator(indicator_id),
    source_id      INTEGER NOT NULL REFERENCES dim_source(source_id),
    measure_kind   TEXT    NOT NULL
        CHECK (measure_kind IN ('inflation', 'gdp_growth', 'exchange_rate', 'cpi')),
    value          REAL    NOT NULL,
    observed_year  INTEGER NOT NULL,         -- year the provider reported
    UNIQUE (date_id, country_id, indicator_id, source_id)
);

CREATE INDEX IF NOT EXISTS fact_country_idx ON fact_economic(country_id);
CREATE INDEX IF NOT EXISTS date_year_idx    ON dim_date(year);

PRAGMA user_version = 1;
";
