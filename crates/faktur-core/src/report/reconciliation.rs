//! Recompute line totals from price, quantity, discount and tax, and compare.

use serde::Serialize;

use crate::models::PurchaseLine;

use super::mean;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationLine {
    pub row: usize,
    pub drug_name: Option<String>,
    pub unit_price: Option<f64>,
    pub quantity: i64,
    pub discount_percent: Option<f64>,
    pub tax_percent: Option<f64>,
    /// Line total as exported.
    pub line_total: Option<f64>,
    /// Gross minus discount plus tax.
    pub computed_total: Option<f64>,
    /// `computed_total - line_total`.
    pub difference: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    pub lines: Vec<ReconciliationLine>,
    /// Sum of the known differences.
    pub total_difference: f64,
    /// Mean of the known differences.
    pub mean_difference: Option<f64>,
}

/// Recompute each line total and compare it with the exported one.
///
/// Any absent input makes that line's difference absent; the totals only
/// cover lines where the difference is known.
pub fn reconcile(lines: &[PurchaseLine]) -> ReconciliationReport {
    let lines: Vec<ReconciliationLine> = lines.iter().map(reconcile_line).collect();
    let differences: Vec<f64> = lines.iter().filter_map(|l| l.difference).collect();

    ReconciliationReport {
        total_difference: differences.iter().sum(),
        mean_difference: mean(differences.iter().copied()),
        lines,
    }
}

fn reconcile_line(line: &PurchaseLine) -> ReconciliationLine {
    let computed_total = match (line.unit_price, line.discount_percent, line.tax_percent) {
        (Some(price), Some(discount), Some(tax)) => {
            let gross = price * line.quantity as f64;
            let after_discount = gross - gross * (discount / 100.0);
            Some(after_discount + after_discount * (tax / 100.0))
        }
        _ => None,
    };

    let difference = match (computed_total, line.line_total) {
        (Some(computed), Some(exported)) => Some(computed - exported),
        _ => None,
    };

    ReconciliationLine {
        row: line.row,
        drug_name: line.drug_name.clone(),
        unit_price: line.unit_price,
        quantity: line.quantity,
        discount_percent: line.discount_percent,
        tax_percent: line.tax_percent,
        line_total: line.line_total,
        computed_total,
        difference,
    }
}
