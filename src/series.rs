// Chart series - date-ordered amounts, unusual-spend markers, trend line
//
// Feeds the spending chart. Unlike the trend estimator this orders by date.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::transaction::Transaction;

/// Quantile used to flag unusually large amounts
pub const UNUSUAL_QUANTILE: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub id: String,
    pub date: NaiveDate,
    pub amount: f64,
    /// Amount is above the unusual-spend threshold
    pub unusual: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpendingSeries {
    pub points: Vec<SeriesPoint>,
    /// Least-squares fit evaluated at each point, same length as `points`;
    /// empty with fewer than two points
    pub trend_line: Vec<f64>,
    pub threshold: Option<f64>,
    pub slope_per_day: f64,
}

/// Build the chart series for a transaction set
pub fn spending_series(transactions: &[Transaction]) -> SpendingSeries {
    if transactions.is_empty() {
        return SpendingSeries::default();
    }

    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|tx| tx.date);

    let amounts: Vec<f64> = sorted
        .iter()
        .map(|tx| tx.amount.to_f64().unwrap_or(0.0))
        .collect();
    let threshold = quantile(&amounts, UNUSUAL_QUANTILE);

    let first_date = sorted[0].date;
    let xy: Vec<(f64, f64)> = sorted
        .iter()
        .zip(&amounts)
        .map(|(tx, amount)| ((tx.date - first_date).num_days() as f64, *amount))
        .collect();
    let (slope, intercept) = linear_regression(&xy);

    let points = sorted
        .iter()
        .zip(&amounts)
        .map(|(tx, amount)| SeriesPoint {
            id: tx.id.clone(),
            date: tx.date,
            amount: *amount,
            unusual: threshold.map(|t| *amount > t).unwrap_or(false),
        })
        .collect();

    // One point has no trend to draw
    let trend_line = if xy.len() < 2 {
        Vec::new()
    } else {
        xy.iter().map(|(x, _)| slope * x + intercept).collect()
    };

    SpendingSeries {
        points,
        trend_line,
        threshold,
        slope_per_day: slope,
    }
}

/// Sample quantile of unsorted values.
///
/// Rank rule: for `idx = n * p`, a fractional index takes the element at
/// `ceil(idx) - 1`; a whole index averages the two neighbours when `n` is
/// even and takes `sorted[idx]` when `n` is odd.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();

    if p == 1.0 {
        return sorted.last().copied();
    }
    if p == 0.0 {
        return sorted.first().copied();
    }

    let idx = n as f64 * p;
    if idx.fract() != 0.0 {
        return Some(sorted[idx.ceil() as usize - 1]);
    }

    let idx = idx as usize;
    if n % 2 == 0 {
        Some((sorted[idx - 1] + sorted[idx]) / 2.0)
    } else {
        Some(sorted[idx])
    }
}

/// Ordinary least squares over (x, y) pairs, returning (slope, intercept).
///
/// With a single point or no spread in x the line is flat at the mean of y.
pub fn linear_regression(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    if points.is_empty() {
        return (0.0, 0.0);
    }

    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return (0.0, sum_y / n);
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = sum_y / n - slope * sum_x / n;
    (slope, intercept)
}
