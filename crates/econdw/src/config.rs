//! Runtime configuration, read from a TOML file and `ECONDW_*` environment
//! variables.
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `ECONDW_SERVER__PORT=9000` or `ECONDW_YEARS__MAX=2024`.

use std::{path::PathBuf, time::Duration};

use econdw_core::{
  catalog::{Catalog, CountrySpec, IndicatorSpec, SourceSpec},
  year::{Year, YearWindow},
};
use econdw_etl::RunOptions;
use econdw_worldbank::{ClientConfig, DEFAULT_BASE_URL};
use serde::Deserialize;

use crate::{Result, defaults};

// ─── Sections ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
  pub host: String,
  pub port: u16,
}

impl Default for ServerSection {
  fn default() -> Self { Self { host: "127.0.0.1".to_string(), port: 8000 } }
}

/// The provider facts are attributed to, and where to reach it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceSection {
  pub name:         String,
  /// Human-facing page stored on the source row.
  pub url:          Option<String>,
  pub api_base:     String,
  pub timeout_secs: u64,
}

impl Default for SourceSection {
  fn default() -> Self {
    Self {
      name:         "World Bank API".to_string(),
      url:          Some("https://data.worldbank.org/indicator".to_string()),
      api_base:     DEFAULT_BASE_URL.to_string(),
      timeout_secs: 30,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YearsSection {
  pub min:       i32,
  /// Defaults to the current calendar year.
  pub max:       Option<i32>,
  /// Year latest-value runs file under. Defaults to `max`.
  pub reference: Option<i32>,
}

impl Default for YearsSection {
  fn default() -> Self { Self { min: 1960, max: None, reference: None } }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
  pub chart_country: String,
}

impl Default for DashboardSection {
  fn default() -> Self { Self { chart_country: "CHL".to_string() } }
}

// ─── AppConfig ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  #[serde(default = "default_store_path")]
  pub store_path:                       PathBuf,
  /// Abort a run after this many lookups in a row fail outright.
  #[serde(default)]
  pub abort_after_consecutive_failures: Option<u32>,
  #[serde(default)]
  pub server:                           ServerSection,
  #[serde(default)]
  pub source:                           SourceSection,
  #[serde(default)]
  pub years:                            YearsSection,
  #[serde(default)]
  pub dashboard:                        DashboardSection,
  #[serde(default = "defaults::indicators")]
  pub indicators:                       Vec<IndicatorSpec>,
  #[serde(default = "defaults::countries")]
  pub countries:                        Vec<CountrySpec>,
}

fn default_store_path() -> PathBuf { PathBuf::from("econdw.sqlite3") }

impl AppConfig {
  /// Layer `ECONDW_*` environment variables over `file` (which may be
  /// absent) and validate the result.
  pub fn load(file: PathBuf) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(
        config::Environment::with_prefix("ECONDW")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;
    Self::from_settings(settings)
  }

  /// Parse a TOML document with no environment overlay.
  pub fn from_toml(toml: &str) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()?;
    Self::from_settings(settings)
  }

  fn from_settings(settings: config::Config) -> Result<Self> {
    let cfg: Self = settings.try_deserialize()?;
    cfg.catalog().validate()?;
    cfg.window()?;
    Ok(cfg)
  }

  pub fn catalog(&self) -> Catalog {
    Catalog { countries: self.countries.clone(), indicators: self.indicators.clone() }
  }

  pub fn window(&self) -> Result<YearWindow> {
    let max = self.years.max.map(Year).unwrap_or_else(Year::current);
    Ok(YearWindow::new(Year(self.years.min), max)?)
  }

  /// `override_year` (from the command line) wins over the configured
  /// reference year, which wins over the window's max.
  pub fn reference_year(&self, override_year: Option<i32>) -> Result<Year> {
    let window = self.window()?;
    Ok(override_year.or(self.years.reference).map(Year).unwrap_or(window.max()))
  }

  pub fn run_options(&self) -> Result<RunOptions> {
    Ok(RunOptions {
      window:                           self.window()?,
      abort_after_consecutive_failures: self.abort_after_consecutive_failures,
    })
  }

  pub fn source_spec(&self) -> SourceSpec {
    SourceSpec { name: self.source.name.clone(), url: self.source.url.clone() }
  }

  pub fn client_config(&self) -> ClientConfig {
    ClientConfig {
      base_url: self.source.api_base.clone(),
      timeout:  Duration::from_secs(self.source.timeout_secs),
    }
  }
}
