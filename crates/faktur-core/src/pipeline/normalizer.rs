//! Numeric normalization of quantity, amount and percentage columns.

use tracing::{debug, info, warn};

use crate::error::{NormalizeError, Result};
use crate::models::table::{Column, Table, Value};
use crate::rules::numbers::{parse_amount, parse_percent, to_quantity};

use super::Stage;

/// Parses locale-formatted numbers into typed cells.
///
/// - quantity columns become `Int`, with absent or unparseable input read as 0
/// - amount columns become `Float`, or `Null` when absent or unparseable
/// - percentage columns become `Float`; a malformed percentage fails the load
///
/// Cells that are already numeric pass through, so running the stage on its
/// own output changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericNormalizer;

impl NumericNormalizer {
    pub fn new() -> Self {
        Self
    }
}

/// Amount held by a cell, parsing text with the Indonesian separator rules.
pub fn amount_of(value: &Value) -> Option<f64> {
    match value {
        Value::Null | Value::Date(_) => None,
        Value::Text(s) => parse_amount(s),
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f).filter(|f| f.is_finite()),
    }
}

/// Quantity held by a cell; absent and unparseable input is 0.
pub fn quantity_of(value: &Value) -> i64 {
    match value {
        Value::Int(i) => *i,
        other => to_quantity(amount_of(other)),
    }
}

/// Percentage held by a cell.
///
/// An empty cell stays absent. Text that does not parse is returned as `Err`.
pub fn percent_of(value: &Value) -> std::result::Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Int(i) => Ok(Some(*i as f64)),
        Value::Float(f) => Ok(Some(*f)),
        other => {
            let text = other.to_string();
            match parse_percent(&text) {
                Some(v) if v.is_nan() => Ok(None),
                Some(v) => Ok(Some(v)),
                None => Err(text),
            }
        }
    }
}

fn normalize_quantities(table: &mut Table, column: Column) -> Result<()> {
    let index = table.index_of(column)?;
    let mut zeroed = 0;

    for cell in table.column_mut(index) {
        let quantity = quantity_of(cell);
        if quantity == 0 && !matches!(cell, Value::Int(0)) {
            zeroed += 1;
        }
        *cell = Value::Int(quantity);
    }

    if zeroed > 0 {
        debug!("{} {} values were empty or unreadable, set to 0", zeroed, column);
    }
    Ok(())
}

fn normalize_amounts(table: &mut Table, column: Column) -> Result<()> {
    let index = table.index_of(column)?;
    let mut degraded = 0;

    for (row, cell) in table.column_mut(index).enumerate() {
        let amount = amount_of(cell);
        if amount.is_none() && !cell.is_null() {
            debug!("Row {}: unparseable {} {:?}, treating as unknown", row, column, cell.to_string());
            degraded += 1;
        }
        *cell = amount.map(Value::Float).unwrap_or(Value::Null);
    }

    if degraded > 0 {
        warn!("{} {} values could not be read as amounts", degraded, column);
    }
    Ok(())
}

fn normalize_percentages(table: &mut Table, column: Column) -> Result<()> {
    let index = table.index_of(column)?;

    // Parse the whole column before writing so a failure leaves it untouched.
    let parsed = table
        .column(index)
        .enumerate()
        .map(|(row, cell)| {
            percent_of(cell)
                .map(|v| v.map(Value::Float).unwrap_or(Value::Null))
                .map_err(|value| NormalizeError::Percent {
                    row,
                    column: column.header().to_string(),
                    value,
                })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    for (cell, value) in table.column_mut(index).zip(parsed) {
        *cell = value;
    }
    Ok(())
}

impl Stage for NumericNormalizer {
    fn name(&self) -> &'static str {
        "numeric-normalizer"
    }

    fn apply(&self, table: &mut Table) -> Result<()> {
        let mut columns = Vec::new();
        columns.extend(Column::QUANTITY);
        columns.extend(Column::CURRENCY);
        columns.extend(Column::PERCENT);
        table.require(&columns)?;

        for column in Column::QUANTITY {
            normalize_quantities(table, column)?;
        }
        for column in Column::CURRENCY {
            normalize_amounts(table, column)?;
        }
        for column in Column::PERCENT {
            normalize_percentages(table, column)?;
        }

        info!("Normalized numeric columns for {} rows", table.row_count());
        Ok(())
    }
}
