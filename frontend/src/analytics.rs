//! Series preparation for the two dashboard charts.

use std::collections::BTreeMap;

use crate::model::{CategoryTotal, MonthlyTotal};

#[derive(Debug, Clone, PartialEq)]
pub struct MonthPoint {
    pub month: String,
    pub total: f64,
}

/// Sums rows per month key and keeps the `window` most recent months,
/// oldest first. Keys are zero-padded "YYYY-MM", so ordering the strings
/// orders the months.
pub fn monthly_series(rows: &[MonthlyTotal], window: usize) -> Vec<MonthPoint> {
    let mut by_month: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        *by_month.entry(row.month.as_str()).or_insert(0.0) += row.total_amount;
    }

    let skip = by_month.len().saturating_sub(window);
    by_month
        .into_iter()
        .skip(skip)
        .map(|(month, total)| MonthPoint {
            month: month.to_string(),
            total,
        })
        .collect()
}

pub fn category_total(rows: &[CategoryTotal]) -> f64 {
    rows.iter().map(|r| r.total_amount).sum()
}

/// Percentage of `total` that `value` represents; 0 when there is no total.
pub fn share_percent(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}
