//! Core library for cleaning pharmacy purchase invoice exports.
//!
//! This crate provides:
//! - CSV loading with a fixed column contract
//! - Forward-fill of invoice-level fields and day-first date parsing
//! - Normalization of Indonesian-formatted amounts, quantities and percentages
//! - Descriptive reports over the cleaned table (suppliers, liabilities,
//!   monthly spend, payment types, anomalies, reconciliation)

pub mod cache;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod rules;

pub use cache::TableCache;
pub use error::{FakturError, Result};
pub use models::{Column, FakturConfig, PurchaseLine, Table, Value};
pub use pipeline::{clean, FakturFiller, NumericNormalizer, Pipeline, Stage};
