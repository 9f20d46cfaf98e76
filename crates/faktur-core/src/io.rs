//! CSV reading and writing for purchase exports.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::config::{FakturConfig, InputConfig};
use crate::models::table::{Column, Table, Value};
use crate::pipeline::Pipeline;

/// Read an export into a raw table.
///
/// Every contract column must be in the header; a missing column fails here,
/// before any cleaning runs. Empty cells load as absent and extra columns
/// are kept as text.
pub fn read_table<R: Read>(reader: R, input: &InputConfig) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(input.delimiter_byte()?)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| {
            let h = h.trim_start_matches('\u{feff}');
            if input.trim_headers { h.trim() } else { h }.to_string()
        })
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(Value::from_raw).collect::<Vec<_>>());
    }

    let table = Table::new(headers, rows)?;
    table.require(&Column::ALL)?;

    debug!("Read {} rows with {} columns", table.row_count(), table.headers().len());
    Ok(table)
}

/// Read an export file into a raw table.
pub fn read_table_from_path(path: &Path, input: &InputConfig) -> Result<Table> {
    let file = File::open(path)?;
    read_table(BufReader::new(file), input)
}

/// Read and clean an export file.
pub fn load(path: &Path, config: &FakturConfig) -> Result<Table> {
    info!("Loading {}", path.display());
    let raw = read_table_from_path(path, &config.input)?;
    Pipeline::from_config(config).run(raw)
}

/// Write a table as CSV: ISO dates, ',' decimals, empty cells for absent values.
///
/// Fractions use the export's ',' decimal so a written table loads back to
/// the same values; the percentage rule drops every '.'.
pub fn write_table<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);

    wtr.write_record(table.headers())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(csv_field))?;
    }

    wtr.flush()?;
    Ok(())
}

fn csv_field(value: &Value) -> String {
    match value {
        Value::Float(v) => v.to_string().replace('.', ","),
        other => other.to_string(),
    }
}
