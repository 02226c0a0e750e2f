//! Core types and trait definitions for the econdw warehouse.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod dimension;
pub mod error;
pub mod fact;
pub mod measure;
pub mod source;
pub mod store;
pub mod year;

pub use error::{Error, Result};
