//! Report command - descriptive views over a cleaned export.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use console::style;

use faktur_core::models::config::ReportConfig;
use faktur_core::report::{
    detect_anomalies, liability_ages, monthly_spend, payment_composition, purchase_trend, reconcile,
    supplier_summary,
};
use faktur_core::rules::format_rupiah;
use faktur_core::{PurchaseLine, TableCache};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Input CSV export
    #[arg(required = true)]
    input: PathBuf,

    /// Report to show
    #[arg(value_enum)]
    view: ReportView,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportView {
    /// Totals, liability age and discount per supplier
    Suppliers,
    /// Days between invoice date and deadline
    LiabilityAge,
    /// Monthly spend with growth
    Monthly,
    /// Share of cash and credit purchases
    PaymentTypes,
    /// Unusual prices, discounts, taxes and totals
    Anomalies,
    /// Recomputed line totals against the export
    Reconciliation,
    /// Monthly transaction totals
    Trend,
    /// Every report
    All,
}

impl ReportView {
    const EACH: [ReportView; 7] = [
        ReportView::Suppliers,
        ReportView::LiabilityAge,
        ReportView::Monthly,
        ReportView::PaymentTypes,
        ReportView::Anomalies,
        ReportView::Reconciliation,
        ReportView::Trend,
    ];

    fn name(self) -> &'static str {
        match self {
            ReportView::Suppliers => "suppliers",
            ReportView::LiabilityAge => "liability-age",
            ReportView::Monthly => "monthly",
            ReportView::PaymentTypes => "payment-types",
            ReportView::Anomalies => "anomalies",
            ReportView::Reconciliation => "reconciliation",
            ReportView::Trend => "trend",
            ReportView::All => "all",
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// Aligned text tables
    Text,
    /// CSV, one block per report
    Csv,
    /// JSON
    Json,
}

/// One rendered report: raw values for CSV and JSON, display values for text.
struct Section {
    view: ReportView,
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
    display_rows: Vec<Vec<String>>,
    notes: Vec<String>,
    json: serde_json::Value,
}

pub fn run(args: ReportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let views: Vec<ReportView> = if args.view == ReportView::All {
        ReportView::EACH.to_vec()
    } else {
        vec![args.view]
    };

    let mut cache = TableCache::new(config.clone());
    let mut sections = Vec::with_capacity(views.len());
    for view in views {
        let table = cache.load(&args.input)?;
        let lines = PurchaseLine::collect(table)?;
        sections.push(build_section(view, &lines, &config.report)?);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        ReportFormat::Text => {
            for (i, section) in sections.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                write_text(&mut out, section)?;
            }
        }
        ReportFormat::Csv => {
            for (i, section) in sections.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                write_csv(&mut out, section)?;
            }
        }
        ReportFormat::Json => {
            let value = if sections.len() == 1 {
                sections[0].json.clone()
            } else {
                let map: serde_json::Map<String, serde_json::Value> = sections
                    .iter()
                    .map(|s| (s.view.name().to_string(), s.json.clone()))
                    .collect();
                serde_json::Value::Object(map)
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        }
    }

    Ok(())
}

fn build_section(view: ReportView, lines: &[PurchaseLine], config: &ReportConfig) -> anyhow::Result<Section> {
    let section = match view {
        ReportView::Suppliers => {
            let summary = supplier_summary(lines);
            Section {
                view,
                headers: vec!["supplier", "total_purchases", "mean_liability_age_days", "mean_discount_percent", "transactions"],
                rows: summary
                    .iter()
                    .map(|s| {
                        vec![
                            s.supplier.clone(),
                            s.total_purchases.to_string(),
                            opt(s.mean_liability_age_days),
                            opt(s.mean_discount_percent),
                            s.transactions.to_string(),
                        ]
                    })
                    .collect(),
                display_rows: summary
                    .iter()
                    .map(|s| {
                        vec![
                            s.supplier.clone(),
                            format_rupiah(s.total_purchases),
                            opt_days(s.mean_liability_age_days),
                            opt_percent(s.mean_discount_percent),
                            s.transactions.to_string(),
                        ]
                    })
                    .collect(),
                notes: Vec::new(),
                json: serde_json::to_value(&summary)?,
            }
        }
        ReportView::LiabilityAge => {
            let report = liability_ages(lines, config.liability_age_bins);
            let rows: Vec<Vec<String>> = report
                .histogram
                .iter()
                .map(|b| vec![format!("{:.1}", b.start), format!("{:.1}", b.end), b.count.to_string()])
                .collect();
            Section {
                view,
                headers: vec!["from_days", "to_days", "lines"],
                display_rows: rows.clone(),
                rows,
                notes: vec![
                    format!("Mean liability age: {}", opt_days(report.mean_days)),
                    format!("Lines without both dates: {}", report.unknown),
                ],
                json: serde_json::to_value(&report)?,
            }
        }
        ReportView::Monthly => {
            let spend = monthly_spend(lines);
            Section {
                view,
                headers: vec!["month", "total", "growth_percent"],
                rows: spend
                    .iter()
                    .map(|m| vec![m.month.clone(), m.total.to_string(), opt(m.growth_percent)])
                    .collect(),
                display_rows: spend
                    .iter()
                    .map(|m| vec![m.month.clone(), format_rupiah(m.total), opt_percent(m.growth_percent)])
                    .collect(),
                notes: Vec::new(),
                json: serde_json::to_value(&spend)?,
            }
        }
        ReportView::PaymentTypes => {
            let shares = payment_composition(lines);
            Section {
                view,
                headers: vec!["kind", "count", "percent"],
                rows: shares
                    .iter()
                    .map(|s| vec![s.kind.clone(), s.count.to_string(), s.percent.to_string()])
                    .collect(),
                display_rows: shares
                    .iter()
                    .map(|s| vec![s.kind.clone(), s.count.to_string(), format!("{:.2}%", s.percent)])
                    .collect(),
                notes: Vec::new(),
                json: serde_json::to_value(&shares)?,
            }
        }
        ReportView::Anomalies => {
            let found = detect_anomalies(lines, config);
            let reasons = |a: &faktur_core::report::Anomaly| {
                a.reasons.iter().map(|r| r.to_string()).collect::<Vec<_>>().join("; ")
            };
            Section {
                view,
                headers: vec![
                    "row", "date", "supplier", "drug_name", "unit_price", "discount_percent",
                    "tax_percent", "quantity", "computed_total", "price_zscore", "reasons",
                ],
                rows: found
                    .iter()
                    .map(|a| {
                        vec![
                            a.row.to_string(),
                            a.date.map(|d| d.to_string()).unwrap_or_default(),
                            a.supplier.clone().unwrap_or_default(),
                            a.drug_name.clone().unwrap_or_default(),
                            opt(a.unit_price),
                            a.discount_percent.to_string(),
                            a.tax_percent.to_string(),
                            a.quantity.to_string(),
                            opt(a.computed_total),
                            opt(a.price_zscore),
                            reasons(a),
                        ]
                    })
                    .collect(),
                display_rows: found
                    .iter()
                    .map(|a| {
                        vec![
                            a.row.to_string(),
                            a.date.map(|d| d.to_string()).unwrap_or_default(),
                            a.supplier.clone().unwrap_or_default(),
                            a.drug_name.clone().unwrap_or_default(),
                            opt_rupiah(a.unit_price),
                            format!("{}%", a.discount_percent),
                            format!("{}%", a.tax_percent),
                            a.quantity.to_string(),
                            opt_rupiah(a.computed_total),
                            a.price_zscore.map(|z| format!("{:.2}", z)).unwrap_or_default(),
                            reasons(a),
                        ]
                    })
                    .collect(),
                notes: vec![format!("{} anomalous lines", found.len())],
                json: serde_json::to_value(&found)?,
            }
        }
        ReportView::Reconciliation => {
            let report = reconcile(lines);
            Section {
                view,
                headers: vec![
                    "row", "drug_name", "unit_price", "quantity", "discount_percent", "tax_percent",
                    "line_total", "computed_total", "difference",
                ],
                rows: report
                    .lines
                    .iter()
                    .map(|l| {
                        vec![
                            l.row.to_string(),
                            l.drug_name.clone().unwrap_or_default(),
                            opt(l.unit_price),
                            l.quantity.to_string(),
                            opt(l.discount_percent),
                            opt(l.tax_percent),
                            opt(l.line_total),
                            opt(l.computed_total),
                            opt(l.difference),
                        ]
                    })
                    .collect(),
                display_rows: report
                    .lines
                    .iter()
                    .map(|l| {
                        vec![
                            l.row.to_string(),
                            l.drug_name.clone().unwrap_or_default(),
                            opt_rupiah(l.unit_price),
                            l.quantity.to_string(),
                            opt_percent(l.discount_percent),
                            opt_percent(l.tax_percent),
                            opt_rupiah(l.line_total),
                            opt_rupiah(l.computed_total),
                            opt_rupiah(l.difference),
                        ]
                    })
                    .collect(),
                notes: vec![
                    format!("Total difference: {}", format_rupiah(report.total_difference)),
                    format!(
                        "Mean difference: {}",
                        report.mean_difference.map(format_rupiah).unwrap_or_else(|| "-".into())
                    ),
                ],
                json: serde_json::to_value(&report)?,
            }
        }
        ReportView::Trend => {
            let trend = purchase_trend(lines);
            Section {
                view,
                headers: vec!["month", "total"],
                rows: trend.iter().map(|m| vec![m.month.clone(), m.total.to_string()]).collect(),
                display_rows: trend
                    .iter()
                    .map(|m| vec![m.month.clone(), format_rupiah(m.total)])
                    .collect(),
                notes: Vec::new(),
                json: serde_json::to_value(&trend)?,
            }
        }
        ReportView::All => anyhow::bail!("'all' is expanded before building reports"),
    };

    Ok(section)
}

fn write_text<W: Write>(out: &mut W, section: &Section) -> anyhow::Result<()> {
    writeln!(out, "{}", style(section.view.name()).bold().underlined())?;

    if section.display_rows.is_empty() {
        writeln!(out, "{}", style("(no data)").dim())?;
    } else {
        let mut widths: Vec<usize> = section.headers.iter().map(|h| h.chars().count()).collect();
        for row in &section.display_rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header: Vec<String> = section
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<w$}", h, w = *w))
            .collect();
        writeln!(out, "{}", style(header.join("  ").trim_end()).bold())?;

        for row in &section.display_rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<w$}", c, w = *w))
                .collect();
            writeln!(out, "{}", cells.join("  ").trim_end())?;
        }
    }

    for note in &section.notes {
        writeln!(out, "{}", note)?;
    }

    Ok(())
}

fn write_csv<W: Write>(out: &mut W, section: &Section) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(&section.headers)?;
    for row in &section.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_rupiah(value: Option<f64>) -> String {
    value.map(format_rupiah).unwrap_or_else(|| "-".into())
}

fn opt_percent(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}%", v)).unwrap_or_else(|| "-".into())
}

fn opt_days(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1} days", v)).unwrap_or_else(|| "-".into())
}
