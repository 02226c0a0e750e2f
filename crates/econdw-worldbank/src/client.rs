//! Async HTTP client for the World Bank indicator API.

use std::time::Duration;

use econdw_core::source::{FetchRequest, IndicatorSource, Observation};
use reqwest::Client;

use crate::{FetchError, Result, envelope::parse_observation};

/// Default endpoint root; requests go to `{base}/{iso}/indicator/{code}`.
pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2/country";

/// Connection settings for the indicator API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      timeout:  Duration::from_secs(30),
    }
  }
}

/// One GET per (country, indicator, year).
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct WorldBankClient {
  client: Client,
  config: ClientConfig,
}

impl WorldBankClient {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(FetchError::Build)?;
    Ok(Self { client, config })
  }

  fn url(&self, iso: &str, code: &str) -> String {
    format!(
      "{}/{}/indicator/{}",
      self.config.base_url.trim_end_matches('/'),
      iso,
      code
    )
  }

  /// `GET {base}/{iso}/indicator/{code}?date={year}&format=json`
  ///
  /// Transport failures and non-success statuses are errors; a response
  /// that arrives but carries no usable value is `Ok(None)`.
  pub async fn fetch_observation(&self, request: &FetchRequest) -> Result<Option<Observation>> {
    let url = self.url(&request.iso, &request.code);

    let resp = self
      .client
      .get(&url)
      .query(&[
        ("date", request.year.to_string()),
        ("format", "json".to_string()),
      ])
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(FetchError::Status { status: status.as_u16(), url });
    }

    let body = resp.bytes().await?;
    let observation = parse_observation(&body, request.year);
    tracing::debug!(
      iso = %request.iso,
      code = %request.code,
      year = %request.year,
      found = observation.is_some(),
      "indicator lookup",
    );
    Ok(observation)
  }
}

impl IndicatorSource for WorldBankClient {
  type Error = FetchError;

  async fn fetch(&self, request: FetchRequest) -> Result<Option<Observation>> {
    self.fetch_observation(&request).await
  }
}
