//! Rule-based field parsers for Indonesian purchase exports.

pub mod dates;
pub mod numbers;
pub mod patterns;

pub use dates::{parse_day_first, DateParser};
pub use numbers::{format_rupiah, parse_amount, parse_percent, parse_quantity, to_quantity};
pub use patterns::*;
