//! World Bank indicator API client.
//!
//! Implements [`econdw_core::source::IndicatorSource`]: one request per
//! (country, indicator, year), answering with the first reported value or
//! nothing.

mod client;
mod envelope;

pub mod error;

pub use client::{ClientConfig, DEFAULT_BASE_URL, WorldBankClient};
pub use envelope::parse_observation;
pub use error::{FetchError, Result};
