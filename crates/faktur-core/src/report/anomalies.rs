//! Detection of unusual price, discount and tax values.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::config::ReportConfig;
use crate::models::PurchaseLine;

use super::{mean, sample_std};

/// Why a line was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyReason {
    /// Unit price z-score above the threshold.
    PriceOutlier,
    /// Discount above the maximum.
    HighDiscount,
    /// Tax above the maximum.
    HighTax,
    /// Recomputed total well above price x quantity.
    TotalOverrun,
}

impl fmt::Display for AnomalyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnomalyReason::PriceOutlier => "price outlier",
            AnomalyReason::HighDiscount => "high discount",
            AnomalyReason::HighTax => "high tax",
            AnomalyReason::TotalOverrun => "total overrun",
        };
        f.write_str(s)
    }
}

/// A flagged purchase line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub row: usize,
    pub date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub drug_name: Option<String>,
    pub unit_price: Option<f64>,
    pub discount_percent: f64,
    pub tax_percent: f64,
    pub quantity: i64,
    pub line_total: Option<f64>,
    /// Unit price after discount and tax, times quantity.
    pub computed_total: Option<f64>,
    pub price_zscore: Option<f64>,
    pub reasons: Vec<AnomalyReason>,
}

/// Flag lines with outlying prices, large discounts or taxes, or inflated totals.
///
/// Missing discount and tax count as 0. A line with an unknown price can
/// only be flagged for discount or tax.
pub fn detect_anomalies(lines: &[PurchaseLine], config: &ReportConfig) -> Vec<Anomaly> {
    let prices: Vec<f64> = lines.iter().filter_map(|l| l.unit_price).collect();
    let price_mean = mean(prices.iter().copied());
    let price_std = sample_std(&prices).filter(|s| *s > 0.0);

    lines
        .iter()
        .filter_map(|line| {
            let discount = line.discount_percent.unwrap_or(0.0);
            let tax = line.tax_percent.unwrap_or(0.0);
            let quantity = line.quantity as f64;

            let computed_total = line
                .unit_price
                .map(|p| p * (1.0 - discount / 100.0) * (1.0 + tax / 100.0) * quantity);
            let price_zscore = match (line.unit_price, price_mean, price_std) {
                (Some(p), Some(m), Some(s)) => Some((p - m) / s),
                _ => None,
            };

            let mut reasons = Vec::new();
            if price_zscore.is_some_and(|z| z > config.zscore_threshold) {
                reasons.push(AnomalyReason::PriceOutlier);
            }
            if discount > config.max_discount_percent {
                reasons.push(AnomalyReason::HighDiscount);
            }
            if tax > config.max_tax_percent {
                reasons.push(AnomalyReason::HighTax);
            }
            if let (Some(total), Some(price)) = (computed_total, line.unit_price) {
                if total > price * quantity * config.total_overrun_ratio {
                    reasons.push(AnomalyReason::TotalOverrun);
                }
            }

            if reasons.is_empty() {
                return None;
            }

            Some(Anomaly {
                row: line.row,
                date: line.date,
                supplier: line.supplier.clone(),
                drug_name: line.drug_name.clone(),
                unit_price: line.unit_price,
                discount_percent: discount,
                tax_percent: tax,
                quantity: line.quantity,
                line_total: line.line_total,
                computed_total,
                price_zscore,
                reasons,
            })
        })
        .collect()
}
