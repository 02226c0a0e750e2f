//! Ingestion: seed the catalog, resolve values year by year, and upsert them
//! as facts.
//!
//! Two backfills are offered. [`Mode::Historical`] files every value under
//! its own year; [`Mode::Latest`] keeps only the newest value per
//! (country, indicator) and files it under a single reference year.

pub mod error;
pub mod report;
pub mod resolver;
pub mod seed;
pub mod upsert;

pub use error::{Error, Result};
pub use report::{Missing, Mode, RunReport};
pub use resolver::{Resolver, RunOptions};
pub use seed::{SeededCatalog, SeededIndicator, seed_catalog};
pub use upsert::{FactUpserter, Resolved};

#[cfg(test)]
mod tests;
