//! Typed view of a cleaned purchase line.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::SchemaError;

use super::table::{Column, Table, Value, DRUG_NAME};

/// One line item of a purchase invoice after cleaning.
///
/// Amounts and dates are `None` when the source was empty or unparseable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseLine {
    /// Zero-based position in the source table.
    pub row: usize,

    /// Invoice date.
    pub date: Option<NaiveDate>,

    /// Invoice number.
    pub invoice_number: Option<String>,

    /// Supplier name.
    pub supplier: Option<String>,

    /// Purchase type as written in the export (e.g. "Tunai", "Hutang").
    pub purchase_type: Option<String>,

    /// Payment deadline.
    pub deadline: Option<NaiveDate>,

    /// Drug name, when the export carries it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_name: Option<String>,

    /// Quantity.
    pub quantity: i64,

    /// Unit purchase price.
    pub unit_price: Option<f64>,

    /// Line total.
    pub line_total: Option<f64>,

    /// Transaction total.
    pub transaction_total: Option<f64>,

    /// Discount in percent.
    pub discount_percent: Option<f64>,

    /// Tax in percent.
    pub tax_percent: Option<f64>,
}

impl PurchaseLine {
    /// Read every row of a cleaned table.
    ///
    /// Cells that were not normalized (still text) read as absent.
    pub fn collect(table: &Table) -> Result<Vec<PurchaseLine>, SchemaError> {
        table.require(&Column::ALL)?;

        let idx = |c: Column| table.index_of(c);
        let date = idx(Column::Tanggal)?;
        let invoice_number = idx(Column::NoFaktur)?;
        let supplier = idx(Column::NamaSupplier)?;
        let purchase_type = idx(Column::JenisPembelian)?;
        let deadline = idx(Column::Deadline)?;
        let quantity = idx(Column::Jumlah)?;
        let unit_price = idx(Column::HargaBeli)?;
        let line_total = idx(Column::NilaiTotal)?;
        let transaction_total = idx(Column::TotalTransaksi)?;
        let discount = idx(Column::Diskon)?;
        let tax = idx(Column::Pajak)?;
        let drug_name = table.position(DRUG_NAME);

        let lines = table
            .rows()
            .iter()
            .enumerate()
            .map(|(row, cells)| PurchaseLine {
                row,
                date: cells[date].as_date(),
                invoice_number: text(&cells[invoice_number]),
                supplier: text(&cells[supplier]),
                purchase_type: text(&cells[purchase_type]),
                deadline: cells[deadline].as_date(),
                drug_name: drug_name.and_then(|i| text(&cells[i])),
                quantity: cells[quantity].as_int().unwrap_or(0),
                unit_price: cells[unit_price].as_f64(),
                line_total: cells[line_total].as_f64(),
                transaction_total: cells[transaction_total].as_f64(),
                discount_percent: cells[discount].as_f64(),
                tax_percent: cells[tax].as_f64(),
            })
            .collect();

        Ok(lines)
    }

    /// Days between invoice date and deadline; absent if either date is unknown.
    pub fn liability_age_days(&self) -> Option<i64> {
        match (self.date, self.deadline) {
            (Some(date), Some(deadline)) => Some((deadline - date).num_days()),
            _ => None,
        }
    }

    /// Purchase type upper-cased and trimmed, for grouping.
    pub fn payment_kind(&self) -> Option<String> {
        self.purchase_type
            .as_deref()
            .map(|t| t.trim().to_uppercase())
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Text(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
