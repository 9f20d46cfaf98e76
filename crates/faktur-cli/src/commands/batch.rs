//! Batch command - clean every export matching a glob pattern.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, warn};

use faktur_core::{io as table_io, FakturConfig};

use super::clean::{write_table, TableFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching CSV exports
    #[arg(required = true)]
    pattern: String,

    /// Directory for the cleaned tables
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Format of each cleaned table
    #[arg(short, long, value_enum, default_value = "csv")]
    format: TableFormat,

    /// Write summary.csv with one line per export
    #[arg(long)]
    summary: bool,

    /// Keep going after an export fails
    #[arg(long)]
    continue_on_error: bool,
}

/// What happened to one export.
struct Outcome {
    path: PathBuf,
    result: Result<usize, String>,
    elapsed: Duration,
}

/// One line of summary.csv.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    status: &'static str,
    rows: Option<usize>,
    processing_time_ms: u64,
    error: Option<&'a str>,
}

impl Outcome {
    fn summary_row(&self) -> SummaryRow<'_> {
        SummaryRow {
            filename: self.path.file_name().and_then(|s| s.to_str()).unwrap_or(""),
            status: if self.result.is_ok() { "success" } else { "error" },
            rows: self.result.as_ref().ok().copied(),
            processing_time_ms: self.elapsed.as_millis() as u64,
            error: self.result.as_ref().err().map(String::as_str),
        }
    }
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let exports = matching_exports(&args.pattern)?;
    println!("{} Found {} files to clean", style("ℹ").blue(), exports.len());

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(exports.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut outcomes: Vec<Outcome> = Vec::with_capacity(exports.len());
    for path in exports {
        pb.set_message(display_name(&path).to_string());
        let file_start = Instant::now();
        let result = clean_one(&path, &args, &config).map_err(|e| e.to_string());

        if let Err(message) = &result {
            if !args.continue_on_error {
                pb.abandon();
                anyhow::bail!("Cleaning {} failed: {}", path.display(), message);
            }
            warn!("Skipping {}: {}", path.display(), message);
        }

        outcomes.push(Outcome {
            path,
            result,
            elapsed: file_start.elapsed(),
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or(Path::new("."))
            .join("summary.csv");
        write_summary(&summary_path, &outcomes)?;
        println!("{} Summary written to {}", style("✓").green(), summary_path.display());
    }

    print_totals(&outcomes, start.elapsed());
    Ok(())
}

fn matching_exports(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let exports: Vec<PathBuf> = glob(pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .collect();

    if exports.is_empty() {
        anyhow::bail!("No CSV exports match {}", pattern);
    }
    Ok(exports)
}

fn display_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("export")
}

/// Clean one export, writing it to the output directory when one is set.
/// Returns the row count.
fn clean_one(path: &Path, args: &BatchArgs, config: &FakturConfig) -> anyhow::Result<usize> {
    let table = table_io::load(path, config)?;

    if let Some(dir) = &args.output_dir {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("export");
        let extension = match args.format {
            TableFormat::Csv => "csv",
            TableFormat::Json => "json",
        };
        let target = dir.join(format!("{stem}.clean.{extension}"));
        write_table(BufWriter::new(File::create(&target)?), &table, args.format)?;
        debug!("Wrote {}", target.display());
    }

    Ok(table.row_count())
}

fn write_summary(path: &Path, outcomes: &[Outcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for outcome in outcomes {
        wtr.serialize(outcome.summary_row())?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_totals(outcomes: &[Outcome], elapsed: Duration) {
    let failed: Vec<&Outcome> = outcomes.iter().filter(|o| o.result.is_err()).collect();

    println!();
    println!("{} Cleaned {} files in {:?}", style("✓").green(), outcomes.len(), elapsed);
    println!(
        "   {} successful, {} failed",
        style(outcomes.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if failed.is_empty() {
        return;
    }
    println!();
    println!("{}", style("Failed files:").red());
    for outcome in failed {
        if let Err(message) = &outcome.result {
            println!("  - {}: {}", outcome.path.display(), message);
        }
    }
}
