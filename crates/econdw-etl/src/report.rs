//! Per-run counters returned by the resolver.

use std::fmt;

use econdw_core::year::Year;
use uuid::Uuid;

/// Which backfill a run performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Every year of each country's history, filed under its own year.
  Historical,
  /// The most recent value per (country, indicator), filed under
  /// `reference`.
  Latest { reference: Year },
}

impl fmt::Display for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Mode::Historical => f.write_str("historical"),
      Mode::Latest { reference } => write!(f, "latest (reference {reference})"),
    }
  }
}

/// A (country, indicator) pair for which no year in the window had a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Missing {
  pub iso:       String,
  pub indicator: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
  pub run_id:         Uuid,
  pub mode:           Mode,
  pub facts_created:  u64,
  pub facts_updated:  u64,
  pub fetch_failures: u64,
  pub write_failures: u64,
  pub missing:        Vec<Missing>,
}

impl RunReport {
  pub fn new(mode: Mode) -> Self {
    Self {
      run_id: Uuid::new_v4(),
      mode,
      facts_created: 0,
      facts_updated: 0,
      fetch_failures: 0,
      write_failures: 0,
      missing: Vec::new(),
    }
  }

  pub fn facts_written(&self) -> u64 { self.facts_created + self.facts_updated }
}
