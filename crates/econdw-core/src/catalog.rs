//! The country and indicator catalog a run iterates over.
//!
//! Catalogs are configuration, loaded once at startup and handed to the
//! resolver; nothing below the binary embeds a country or indicator list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, measure::MeasureKind};

// ─── HistoryDepth ────────────────────────────────────────────────────────────

/// How far back a historical backfill reaches for one country.
///
/// Written in configuration as the string `"all"` or a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "HistoryRepr", into = "HistoryRepr")]
pub enum HistoryDepth {
  /// Every year down to the window's floor.
  #[default]
  All,
  /// The most recent `n` years, counting the window's max year.
  Years(u32),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum HistoryRepr {
  Years(u32),
  Keyword(String),
}

impl TryFrom<HistoryRepr> for HistoryDepth {
  type Error = String;

  fn try_from(repr: HistoryRepr) -> std::result::Result<Self, String> {
    let years = match repr {
      HistoryRepr::Years(n) => n,
      HistoryRepr::Keyword(s) if s.trim().eq_ignore_ascii_case("all") => {
        return Ok(Self::All);
      }
      // Environment overrides arrive as strings.
      HistoryRepr::Keyword(s) => s
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("expected \"all\" or a number of years, got {s:?}"))?,
    };
    if years == 0 {
      return Err("history must cover at least one year".to_string());
    }
    Ok(Self::Years(years))
  }
}

impl From<HistoryDepth> for HistoryRepr {
  fn from(d: HistoryDepth) -> Self {
    match d {
      HistoryDepth::All => Self::Keyword("all".to_string()),
      HistoryDepth::Years(n) => Self::Years(n),
    }
  }
}

// ─── Specs ───────────────────────────────────────────────────────────────────

/// A country to ingest, keyed by its ISO 3166-1 alpha-3 code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySpec {
  pub name:    String,
  pub iso:     String,
  #[serde(default)]
  pub history: HistoryDepth,
}

impl CountrySpec {
  pub fn new(name: impl Into<String>, iso: impl Into<String>, history: HistoryDepth) -> Self {
    Self { name: name.into(), iso: iso.into(), history }
  }
}

/// An indicator to ingest: a display name, the provider's series code, and
/// the measure slot its values fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSpec {
  pub name:        String,
  /// Provider series code, e.g. `FP.CPI.TOTL.ZG`.
  pub code:        String,
  pub unit:        String,
  pub kind:        MeasureKind,
  #[serde(default)]
  pub description: Option<String>,
}

impl IndicatorSpec {
  /// Fill in the description stored on first insert when the catalog gives
  /// none.
  pub fn with_default_description(mut self, source_name: &str) -> Self {
    if self.description.is_none() {
      self.description = Some(format!("{} data from the {source_name}", self.name));
    }
    self
  }
}

/// The upstream provider facts are attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
  pub name: String,
  pub url:  Option<String>,
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
  pub countries:  Vec<CountrySpec>,
  pub indicators: Vec<IndicatorSpec>,
}

impl Catalog {
  /// Reject catalogs the store's unique keys could not hold.
  pub fn validate(&self) -> Result<()> {
    if self.countries.is_empty() {
      return Err(Error::EmptyCatalog("countries"));
    }
    if self.indicators.is_empty() {
      return Err(Error::EmptyCatalog("indicators"));
    }

    let mut isos = HashSet::new();
    let mut names = HashSet::new();
    for c in &self.countries {
      if !is_alpha3(&c.iso) {
        return Err(Error::InvalidIso(c.iso.clone()));
      }
      if !isos.insert(c.iso.as_str()) || !names.insert(c.name.as_str()) {
        return Err(Error::DuplicateCountry(c.iso.clone()));
      }
      if c.history == HistoryDepth::Years(0) {
        return Err(Error::ZeroHistory(c.iso.clone()));
      }
    }

    let mut kinds = HashSet::new();
    let mut indicator_names = HashSet::new();
    for i in &self.indicators {
      if !indicator_names.insert(i.name.as_str()) {
        return Err(Error::DuplicateIndicator(i.name.clone()));
      }
      if !kinds.insert(i.kind) {
        return Err(Error::DuplicateKind(i.kind));
      }
    }
    Ok(())
  }
}

fn is_alpha3(s: &str) -> bool {
  s.len() == 3 && s.bytes().all(|b| b.is_ascii_uppercase())
}
