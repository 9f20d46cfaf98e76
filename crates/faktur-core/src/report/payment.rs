//! Share of purchase types (cash vs credit).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::PurchaseLine;

use super::round2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentShare {
    /// Purchase type, upper-cased and trimmed.
    pub kind: String,
    pub count: usize,
    /// Share of lines with a known purchase type, in percent.
    pub percent: f64,
}

/// Share of each purchase type, most frequent first.
pub fn payment_composition(lines: &[PurchaseLine]) -> Vec<PaymentShare> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for kind in lines.iter().filter_map(|l| l.payment_kind()) {
        *counts.entry(kind).or_insert(0) += 1;
    }

    let known: usize = counts.values().sum();
    let mut shares: Vec<PaymentShare> = counts
        .into_iter()
        .map(|(kind, count)| PaymentShare {
            kind,
            count,
            percent: round2(count as f64 / known as f64 * 100.0),
        })
        .collect();

    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}
