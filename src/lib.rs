//! Tax Band Engine
//!
//! This crate computes income tax, national insurance, corporation tax, VAT
//! and withholding tax from versioned, per-jurisdiction rate tables. Rate
//! tables are YAML files validated into immutable [`config::RateTable`]
//! values; calculations in [`calculation`] are pure functions over a table and
//! a caller-supplied input. The [`api`] module exposes the engine over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
