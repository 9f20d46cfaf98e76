//! Forward fill of invoice header fields and day-first date parsing.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::table::{Column, Table, Value};
use crate::rules::dates::DateParser;

use super::Stage;

/// Fills invoice header fields that the export only writes on the first line of each invoice.
///
/// Every descriptive column is forward-filled in row order; a leading empty
/// run stays empty. `Tanggal` and `Deadline` are then parsed day-first, and
/// anything unparseable becomes an absent date.
#[derive(Debug, Clone, Default)]
pub struct FakturFiller {
    dates: DateParser,
}

impl FakturFiller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific date parser (e.g. with a different two-digit year pivot).
    pub fn with_date_parser(mut self, dates: DateParser) -> Self {
        self.dates = dates;
        self
    }

    /// Convert one cell to a date. Dates pass through unchanged.
    pub fn date_of(&self, value: &Value) -> Option<chrono::NaiveDate> {
        match value {
            Value::Date(d) => Some(*d),
            Value::Text(s) => self.dates.parse(s),
            _ => None,
        }
    }

    fn parse_dates(&self, table: &mut Table, column: Column) -> Result<usize> {
        let index = table.index_of(column)?;
        let mut degraded = 0;

        for (row, cell) in table.column_mut(index).enumerate() {
            if cell.is_null() {
                continue;
            }
            *cell = match self.date_of(cell) {
                Some(date) => Value::Date(date),
                None => {
                    debug!("Row {}: unparseable {} {:?}, treating as unknown", row, column, cell.to_string());
                    degraded += 1;
                    Value::Null
                }
            };
        }

        Ok(degraded)
    }
}

/// Replace every absent cell in a column with the nearest preceding present value.
///
/// Returns the number of cells filled.
pub fn forward_fill(table: &mut Table, index: usize) -> usize {
    let mut last: Option<Value> = None;
    let mut filled = 0;

    for cell in table.column_mut(index) {
        if cell.is_null() {
            if let Some(previous) = &last {
                *cell = previous.clone();
                filled += 1;
            }
        } else {
            last = Some(cell.clone());
        }
    }

    filled
}

/// True when every present cell of the column is already a date.
fn holds_dates(table: &Table, index: usize) -> bool {
    table.column(index).all(|v| matches!(v, Value::Null | Value::Date(_)))
}

impl Stage for FakturFiller {
    fn name(&self) -> &'static str {
        "faktur-filler"
    }

    fn apply(&self, table: &mut Table) -> Result<()> {
        table.require(&Column::DESCRIPTIVE)?;

        for column in Column::DESCRIPTIVE {
            let index = table.index_of(column)?;
            if Column::DATES.contains(&column) && holds_dates(table, index) {
                // absent cells in a parsed date column are unknown dates, not blanks
                debug!("{} already holds dates, not filling", column);
                continue;
            }
            let filled = forward_fill(table, index);
            if filled > 0 {
                debug!("Forward-filled {} cells in {}", filled, column);
            }
        }

        for column in Column::DATES {
            let degraded = self.parse_dates(table, column)?;
            if degraded > 0 {
                warn!("{} {} values could not be read as dates", degraded, column);
            }
        }

        info!("Filled invoice header fields for {} rows", table.row_count());
        Ok(())
    }
}
