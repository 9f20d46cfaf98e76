//! Descriptive views over a cleaned purchase table.
//!
//! Every view takes the typed lines from [`PurchaseLine::collect`] and
//! returns plain data; rendering is left to the caller. Absent amounts and
//! dates are skipped, never counted as zero, unless a view says otherwise.
//!
//! [`PurchaseLine::collect`]: crate::models::PurchaseLine::collect

pub mod anomalies;
pub mod liability;
pub mod monthly;
pub mod payment;
pub mod reconciliation;
pub mod suppliers;

pub use anomalies::{detect_anomalies, Anomaly, AnomalyReason};
pub use liability::{liability_ages, HistogramBin, LiabilityAgeReport};
pub use monthly::{monthly_spend, purchase_trend, MonthlySpend, MonthlyTotal};
pub use payment::{payment_composition, PaymentShare};
pub use reconciliation::{reconcile, ReconciliationLine, ReconciliationReport};
pub use suppliers::{supplier_summary, SupplierSummary};

/// Round to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean of the present values.
pub(crate) fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 { None } else { Some(sum / count as f64) }
}

/// Sample standard deviation (n - 1 denominator).
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values.iter().copied())?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::models::PurchaseLine;

    /// A fully populated line; tests override what they need.
    pub fn line(row: usize, supplier: &str) -> PurchaseLine {
        PurchaseLine {
            row,
            date: NaiveDate::from_ymd_opt(2024, 1, 10),
            invoice_number: Some(format!("F-{row:03}")),
            supplier: Some(supplier.to_string()),
            purchase_type: Some("Tunai".to_string()),
            deadline: NaiveDate::from_ymd_opt(2024, 1, 10),
            drug_name: Some("Paracetamol".to_string()),
            quantity: 1,
            unit_price: Some(1000.0),
            line_total: Some(1000.0),
            transaction_total: Some(1000.0),
            discount_percent: Some(0.0),
            tax_percent: Some(0.0),
        }
    }

    pub fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_helpers() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean(vec![1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(sample_std(&[5.0]), None);
        assert_eq!(sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).map(round2), Some(2.14));
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(-7.899), -7.9);
    }
}
