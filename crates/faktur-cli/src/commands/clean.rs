//! Clean command - run the pipeline over a single export.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use faktur_core::{io as table_io, Table};

/// Arguments for the clean command.
#[derive(Args)]
pub struct CleanArgs {
    /// Input CSV export
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: TableFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum TableFormat {
    /// CSV with ISO dates and plain numbers
    Csv,
    /// JSON array of row objects
    Json,
}

pub fn run(args: CleanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let table = table_io::load(&args.input, &config)?;
    info!("Cleaned {} in {:?}", args.input.display(), start.elapsed());

    match &args.output {
        Some(output_path) => {
            let file = BufWriter::new(File::create(output_path)?);
            write_table(file, &table, args.format)?;

            println!(
                "{} Cleaned {} rows, written to {}",
                style("✓").green(),
                table.row_count(),
                output_path.display()
            );
            print_preview(&table, config.report.preview_rows);
        }
        None => {
            let stdout = io::stdout();
            write_table(stdout.lock(), &table, args.format)?;
        }
    }

    Ok(())
}

/// Write a clean table in the requested format.
pub fn write_table<W: Write>(mut writer: W, table: &Table, format: TableFormat) -> anyhow::Result<()> {
    match format {
        TableFormat::Csv => table_io::write_table(writer, table)?,
        TableFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &table_records(table))?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn table_records(table: &Table) -> Vec<serde_json::Map<String, serde_json::Value>> {
    table
        .rows()
        .iter()
        .map(|row| {
            table
                .headers()
                .iter()
                .zip(row)
                .map(|(header, value)| {
                    let json = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
                    (header.clone(), json)
                })
                .collect()
        })
        .collect()
}

fn print_preview(table: &Table, rows: usize) {
    if rows == 0 || table.is_empty() {
        return;
    }

    println!();
    println!("{}", style(table.headers().join(" | ")).bold());
    for row in table.rows().iter().take(rows) {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{}", cells.join(" | "));
    }
    if table.row_count() > rows {
        println!("{}", style(format!("... {} more rows", table.row_count() - rows)).dim());
    }
}
