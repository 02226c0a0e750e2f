//! Macroeconomic indicator warehouse: configuration and HTTP assembly for the
//! `econdw` binary.
//!
//! Ingestion lives in `econdw-etl`, storage in `econdw-store-sqlite`, the
//! read API in `econdw-api`. This crate wires them to a config file.

pub mod config;
pub mod defaults;
pub mod error;

pub use config::AppConfig;
pub use error::{Error, Result};

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use econdw_core::store::WarehouseQuery;
use tower_http::trace::TraceLayer;

/// The full HTTP application: the read API under `/api`, with request
/// tracing.
pub fn app<S>(store: Arc<S>, chart_country: &str) -> Router
where
  S: WarehouseQuery + 'static,
{
  Router::new()
    .nest("/api", econdw_api::api_router(store, chart_country))
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
