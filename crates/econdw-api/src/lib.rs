//! JSON read API over the econdw warehouse.
//!
//! Exposes an axum [`Router`] backed by any
//! [`econdw_core::store::WarehouseQuery`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", econdw_api::api_router(store.clone(), "CHL"))
//! ```

pub mod dashboard;
pub mod error;
pub mod export;
pub mod series;
pub mod table;

use std::sync::Arc;

use axum::{Router, routing::get};
use econdw_core::store::WarehouseQuery;

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:         Arc<S>,
  /// ISO code of the country whose series the dashboard charts.
  pub chart_country: Arc<str>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), chart_country: self.chart_country.clone() }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, chart_country: &str) -> Router<()>
where
  S: WarehouseQuery + 'static,
{
  let state = ApiState { store, chart_country: Arc::from(chart_country) };
  Router::new()
    .route("/dashboard", get(dashboard::handler::<S>))
    .route("/series/{iso}", get(series::handler::<S>))
    .route("/export/json", get(export::json::<S>))
    .route("/export/spreadsheet", get(export::spreadsheet::<S>))
    .with_state(state)
}
