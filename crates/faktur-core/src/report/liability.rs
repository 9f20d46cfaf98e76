//! Liability age: days between invoice date and payment deadline.

use serde::Serialize;

use crate::models::PurchaseLine;

use super::mean;

/// One equal-width histogram bin, `[start, end)`; the last bin includes `end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Distribution of liability ages over lines with both dates known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiabilityAgeReport {
    /// `(row, days)` for every line with both dates known.
    pub ages: Vec<(usize, i64)>,
    /// Lines left out because a date was unknown.
    pub unknown: usize,
    /// Mean age in days.
    pub mean_days: Option<f64>,
    /// Equal-width histogram of the ages.
    pub histogram: Vec<HistogramBin>,
}

/// Compute liability ages and their histogram with `bins` bins.
pub fn liability_ages(lines: &[PurchaseLine], bins: usize) -> LiabilityAgeReport {
    let ages: Vec<(usize, i64)> = lines
        .iter()
        .filter_map(|l| l.liability_age_days().map(|d| (l.row, d)))
        .collect();

    let values: Vec<f64> = ages.iter().map(|(_, d)| *d as f64).collect();

    LiabilityAgeReport {
        unknown: lines.len() - ages.len(),
        mean_days: mean(values.iter().copied()),
        histogram: histogram(&values, bins),
        ages,
    }
}

fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in values {
        let index = (((v - lo) / width) as usize).min(bins - 1);
        result[index].count += 1;
    }

    result
}
