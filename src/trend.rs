// Trend estimator - positional half-split of the filtered set
//
// The split is by position, not by date. Reordering the input changes the
// result; callers that sort for display must keep a separate view.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::transaction::Transaction;

/// Expense magnitude of each positional half, split at `len / 2`
pub fn half_expenses(transactions: &[Transaction]) -> (Decimal, Decimal) {
    let (first, second) = transactions.split_at(transactions.len() / 2);
    (expense_sum(first), expense_sum(second))
}

/// Percentage change in expense magnitude from the first positional half
/// to the second.
///
/// Returns 0.0 when the first half has no expenses, which also covers
/// sets with fewer than two transactions. Ratios beyond `Decimal` range
/// are computed in f64.
pub fn spending_trend(transactions: &[Transaction]) -> f64 {
    let (first, second) = half_expenses(transactions);

    if first.is_zero() {
        return 0.0;
    }

    let exact = second
        .checked_sub(first)
        .and_then(|delta| delta.checked_div(first))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64());

    exact.unwrap_or_else(|| {
        let first = first.to_f64().unwrap_or(f64::MAX);
        let second = second.to_f64().unwrap_or(f64::MAX);
        (second - first) / first * 100.0
    })
}

/// Expense magnitudes, saturating at `Decimal::MAX`
fn expense_sum(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|tx| tx.is_expense())
        .fold(Decimal::ZERO, |sum, tx| sum.saturating_add(tx.magnitude()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(id: &str, day: u32, amount: Decimal) -> Transaction {
        Transaction::new(
            id,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            "food",
            amount,
        )
    }

    #[test]
    fn test_trend_two_expenses() {
        let txs = vec![tx("1", 1, dec!(-10)), tx("2", 2, dec!(-30))];
        assert!((spending_trend(&txs) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_empty_and_single() {
        assert_eq!(spending_trend(&[]), 0.0);
        assert_eq!(spending_trend(&[tx("1", 1, dec!(-10))]), 0.0);
    }

    #[test]
    fn test_trend_zero_first_half() {
        let txs = vec![tx("1", 1, dec!(500)), tx("2", 2, dec!(-30))];
        assert_eq!(spending_trend(&txs), 0.0);
    }

    #[test]
    fn test_trend_odd_count_puts_extra_in_second_half() {
        // split_at(1): [-20] | [-10, -20]
        let txs = vec![tx("1", 1, dec!(-20)), tx("2", 2, dec!(-10)), tx("3", 3, dec!(-20))];
        let (first, second) = half_expenses(&txs);

        assert_eq!(first, dec!(20));
        assert_eq!(second, dec!(30));
        assert!((spending_trend(&txs) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_ignores_income() {
        let txs = vec![
            tx("1", 1, dec!(-40)),
            tx("2", 2, dec!(1000)),
            tx("3", 3, dec!(-10)),
            tx("4", 4, dec!(250)),
        ];
        // [-40, 1000] | [-10, 250]
        assert!((spending_trend(&txs) - (-75.0)).abs() < 1e-9);
    }

    #[test]
    fn test_trend_out_of_decimal_range() {
        use crate::transaction::parse_amount;

        let tiny = parse_amount("-0.0000000000000000000000000001").unwrap();
        let huge = parse_amount("-70000000000000000000000000000").unwrap();
        let trend = spending_trend(&[tx("1", 1, tiny), tx("2", 2, huge)]);

        assert!(trend.is_finite());
        assert!(trend > 1e50);
    }

    #[test]
    fn test_trend_saturated_halves() {
        use crate::transaction::parse_amount;

        let big = parse_amount("-50000000000000000000000000000").unwrap();
        let txs = vec![tx("1", 1, big), tx("2", 2, big), tx("3", 3, big), tx("4", 4, big)];
        let (first, second) = half_expenses(&txs);

        assert_eq!(first, Decimal::MAX);
        assert_eq!(second, Decimal::MAX);
        assert_eq!(spending_trend(&txs), 0.0);
    }

    #[test]
    fn test_trend_depends_on_position_not_date() {
        let forward = vec![tx("1", 1, dec!(-10)), tx("2", 2, dec!(-30))];
        let reversed = vec![tx("2", 2, dec!(-30)), tx("1", 1, dec!(-10))];

        assert!((spending_trend(&forward) - 200.0).abs() < 1e-9);
        assert!((spending_trend(&reversed) - (-66.666_666_666_666)).abs() < 1e-6);
    }
}
