//! Data models for purchase tables and configuration.

pub mod config;
pub mod purchase;
pub mod table;

pub use config::FakturConfig;
pub use purchase::PurchaseLine;
pub use table::{Column, Table, Value, DRUG_NAME};
