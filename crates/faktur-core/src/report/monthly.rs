//! Monthly spend and purchase trend.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::models::PurchaseLine;

/// Transaction totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Sum of transaction totals in rupiah.
    pub total: f64,
}

/// Monthly spend with month-over-month growth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySpend {
    pub month: String,
    pub total: f64,
    /// Growth against the previous listed month, in percent.
    pub growth_percent: Option<f64>,
}

/// Sum of transaction totals per month, in chronological order.
///
/// Lines with an unknown invoice date are left out; unknown totals add nothing.
pub fn purchase_trend(lines: &[PurchaseLine]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<(i32, u32), f64> = BTreeMap::new();

    for line in lines {
        let Some(date) = line.date else {
            continue;
        };
        *months.entry((date.year(), date.month())).or_insert(0.0) +=
            line.transaction_total.unwrap_or(0.0);
    }

    months
        .into_iter()
        .map(|((year, month), total)| MonthlyTotal {
            month: format!("{:04}-{:02}", year, month),
            total,
        })
        .collect()
}

/// Monthly totals with growth against the previous month present in the data.
///
/// Growth is absent for the first month and after a month that totals zero.
pub fn monthly_spend(lines: &[PurchaseLine]) -> Vec<MonthlySpend> {
    let mut previous: Option<f64> = None;

    purchase_trend(lines)
        .into_iter()
        .map(|m| {
            let growth_percent = match previous {
                Some(prev) if prev != 0.0 => Some((m.total - prev) / prev * 100.0),
                _ => None,
            };
            previous = Some(m.total);
            MonthlySpend {
                month: m.month,
                total: m.total,
                growth_percent,
            }
        })
        .collect()
}
