//! In-memory purchase table shared by the loader, the pipeline and the reports.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::SchemaError;

/// Header of the optional drug name column used by some reports.
pub const DRUG_NAME: &str = "Nama Obat";

/// A contract column of the purchase export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Invoice date (Tanggal).
    Tanggal,
    /// Invoice number (No Faktur).
    NoFaktur,
    /// Supplier name (Nama Supplier).
    NamaSupplier,
    /// Purchase type, cash or credit (Jenis Pembelian).
    JenisPembelian,
    /// Payment deadline (Deadline).
    Deadline,
    /// Quantity (Jumlah).
    Jumlah,
    /// Unit purchase price (Harga Beli).
    HargaBeli,
    /// Line total (Nilai Total).
    NilaiTotal,
    /// Transaction total (Total Transaksi).
    TotalTransaksi,
    /// Discount percent (Diskon).
    Diskon,
    /// Tax percent (Pajak).
    Pajak,
}

impl Column {
    /// Every column the export must contain, in export order.
    pub const ALL: [Column; 11] = [
        Column::Tanggal,
        Column::NoFaktur,
        Column::NamaSupplier,
        Column::JenisPembelian,
        Column::Deadline,
        Column::Jumlah,
        Column::HargaBeli,
        Column::NilaiTotal,
        Column::TotalTransaksi,
        Column::Diskon,
        Column::Pajak,
    ];

    /// Invoice header fields that are only written on the first line of an invoice.
    pub const DESCRIPTIVE: [Column; 5] = [
        Column::Tanggal,
        Column::NoFaktur,
        Column::NamaSupplier,
        Column::JenisPembelian,
        Column::Deadline,
    ];

    /// Calendar date columns.
    pub const DATES: [Column; 2] = [Column::Tanggal, Column::Deadline];

    /// Integer quantity columns.
    pub const QUANTITY: [Column; 1] = [Column::Jumlah];

    /// Rupiah amount columns.
    pub const CURRENCY: [Column; 3] = [Column::HargaBeli, Column::NilaiTotal, Column::TotalTransaksi];

    /// Percentage columns.
    pub const PERCENT: [Column; 2] = [Column::Diskon, Column::Pajak];

    /// Header name as it appears in the export.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Tanggal => "Tanggal",
            Column::NoFaktur => "No Faktur",
            Column::NamaSupplier => "Nama Supplier",
            Column::JenisPembelian => "Jenis Pembelian",
            Column::Deadline => "Deadline",
            Column::Jumlah => "Jumlah",
            Column::HargaBeli => "Harga Beli",
            Column::NilaiTotal => "Nilai Total",
            Column::TotalTransaksi => "Total Transaksi",
            Column::Diskon => "Diskon",
            Column::Pajak => "Pajak",
        }
    }

    /// Look a column up by its exact header name.
    pub fn from_header(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.header() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// A single cell.
///
/// `Null` is the absent value: an empty source cell, an unparseable amount
/// or an unparseable date. It is never folded into zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Date(NaiveDate),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Build a cell from raw source text. Empty text is absent.
    pub fn from_raw(raw: &str) -> Self {
        if raw.is_empty() {
            Value::Null
        } else {
            Value::Text(raw.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Numeric view of the cell. Text is not parsed here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Plain rendering used for CSV output: ISO dates, `.` decimals, empty for absent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// A row-ordered table of cells with named columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table, checking that header names are unique and every row is full width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, SchemaError> {
        for (i, name) in headers.iter().enumerate() {
            if headers[..i].contains(name) {
                return Err(SchemaError::DuplicateColumn(name.clone()));
            }
        }

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != headers.len() {
                return Err(SchemaError::RowWidth {
                    row,
                    expected: headers.len(),
                    found: cells.len(),
                });
            }
        }

        Ok(Self { headers, rows })
    }

    /// Create a table from raw text cells; empty cells become absent.
    pub fn from_text_rows<S: AsRef<str>>(
        headers: Vec<String>,
        rows: Vec<Vec<S>>,
    ) -> Result<Self, SchemaError> {
        let rows = rows
            .into_iter()
            .map(|r| r.iter().map(|c| Value::from_raw(c.as_ref())).collect())
            .collect();
        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a contract column.
    pub fn index_of(&self, column: Column) -> Result<usize, SchemaError> {
        self.position(column.header())
            .ok_or_else(|| SchemaError::MissingColumn(vec![column.header().to_string()]))
    }

    /// Check that every listed column is present, reporting all that are missing at once.
    pub fn require(&self, columns: &[Column]) -> Result<(), SchemaError> {
        let missing: Vec<String> = columns
            .iter()
            .filter(|c| self.position(c.header()).is_none())
            .map(|c| c.header().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingColumn(missing))
        }
    }

    /// Cell at `row` in the column at `index`.
    pub fn get(&self, row: usize, index: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// Cell at `row` in a contract column.
    pub fn cell(&self, row: usize, column: Column) -> Option<&Value> {
        self.position(column.header()).and_then(|i| self.get(row, i))
    }

    /// Mutable cells of one column in row order.
    pub fn column_mut(&mut self, index: usize) -> impl Iterator<Item = &mut Value> {
        self.rows.iter_mut().filter_map(move |r| r.get_mut(index))
    }

    /// Cells of one column in row order.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |r| r.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_text_rows_marks_empty_as_null() {
        let table = Table::from_text_rows(headers(&["A", "B"]), vec![vec!["x", ""]]).unwrap();
        assert_eq!(table.rows()[0], vec![Value::Text("x".into()), Value::Null]);
    }

    #[test]
    fn test_row_width_is_checked() {
        let err = Table::from_text_rows(headers(&["A", "B"]), vec![vec!["x"]]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::RowWidth {
                row: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = Table::from_text_rows::<&str>(headers(&["A", "A"]), vec![]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateColumn("A".into()));
    }

    #[test]
    fn test_require_lists_every_missing_column() {
        let table = Table::from_text_rows::<&str>(headers(&["Tanggal", "Jumlah"]), vec![]).unwrap();
        let err = table
            .require(&[Column::Tanggal, Column::Diskon, Column::Pajak])
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumn(vec!["Diskon".into(), "Pajak".into()])
        );
    }

    #[test]
    fn test_column_header_lookup() {
        for column in Column::ALL {
            assert_eq!(Column::from_header(column.header()), Some(column));
        }
        assert_eq!(Column::from_header("tanggal"), None);
    }

    #[test]
    fn test_value_display() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 3).unwrap();
        assert_eq!(Value::Date(date).to_string(), "2024-04-03");
        assert_eq!(Value::Float(18767.5).to_string(), "18767.5");
        assert_eq!(Value::Int(-2).to_string(), "-2");
        assert_eq!(Value::Null.to_string(), "");
    }
}
