//! Per-supplier purchase aggregates.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::PurchaseLine;

use super::{mean, round2};

/// Aggregates for one supplier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierSummary {
    /// Supplier name.
    pub supplier: String,
    /// Sum of line totals, in rupiah.
    pub total_purchases: f64,
    /// Mean days between invoice date and deadline.
    pub mean_liability_age_days: Option<f64>,
    /// Mean discount percent.
    pub mean_discount_percent: Option<f64>,
    /// Number of purchase lines.
    pub transactions: usize,
}

#[derive(Default)]
struct Accumulator {
    total: f64,
    ages: Vec<f64>,
    discounts: Vec<f64>,
    lines: usize,
}

/// Summarize purchases per supplier, largest total first.
///
/// Lines without a supplier are left out. Values are rounded to two decimals.
pub fn supplier_summary(lines: &[PurchaseLine]) -> Vec<SupplierSummary> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for line in lines {
        let Some(supplier) = line.supplier.as_deref() else {
            continue;
        };
        let acc = groups.entry(supplier).or_default();
        acc.total += line.line_total.unwrap_or(0.0);
        acc.ages.extend(line.liability_age_days().map(|d| d as f64));
        acc.discounts.extend(line.discount_percent);
        acc.lines += 1;
    }

    let mut summary: Vec<SupplierSummary> = groups
        .into_iter()
        .map(|(supplier, acc)| SupplierSummary {
            supplier: supplier.to_string(),
            total_purchases: round2(acc.total),
            mean_liability_age_days: mean(acc.ages).map(round2),
            mean_discount_percent: mean(acc.discounts).map(round2),
            transactions: acc.lines,
        })
        .collect();

    // stable sort keeps suppliers with equal totals in name order
    summary.sort_by(|a, b| b.total_purchases.total_cmp(&a.total_purchases));
    summary
}
