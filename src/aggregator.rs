// Aggregator - category totals, spending, balance
//
// Every call recomputes from the slice it is given. Nothing is cached
// and nothing is updated incrementally.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::transaction::Transaction;

// ============================================================================
// SPENDING BASIS
// ============================================================================

/// Which transactions count towards category totals and total spending.
///
/// The basis applies to both figures, so the category totals always sum
/// to the total spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingBasis {
    /// Only negative amounts count (their magnitude)
    #[default]
    ExpensesOnly,
    /// Every amount counts by magnitude, income included
    AllMagnitudes,
}

impl SpendingBasis {
    pub fn counts(&self, tx: &Transaction) -> bool {
        match self {
            SpendingBasis::ExpensesOnly => tx.is_expense(),
            SpendingBasis::AllMagnitudes => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpendingBasis::ExpensesOnly => "expenses_only",
            SpendingBasis::AllMagnitudes => "all_magnitudes",
        }
    }
}

impl fmt::Display for SpendingBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpendingBasis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "expenses_only" | "expenses" => Ok(SpendingBasis::ExpensesOnly),
            "all_magnitudes" | "all" => Ok(SpendingBasis::AllMagnitudes),
            other => Err(Error::InvalidData(format!("Unknown spending basis: {}", other))),
        }
    }
}

// ============================================================================
// AGGREGATES
// ============================================================================

/// One entry of a ranked category breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub amount: Decimal,
}

/// Aggregates - derived summary of one transaction set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Aggregates {
    /// Absolute totals per category; categories with nothing counted are absent
    pub category_totals: BTreeMap<String, Decimal>,
    pub total_spending: Decimal,
    /// Sum of signed amounts
    pub balance: Decimal,
    /// Sum of positive amounts
    pub income: Decimal,
    /// Sum of magnitudes of negative amounts
    pub expenses: Decimal,
    pub count: usize,
}

impl Aggregates {
    /// Category totals, largest first (ties broken by name)
    pub fn ranked_categories(&self) -> Vec<CategoryAggregate> {
        let mut ranked: Vec<CategoryAggregate> = self
            .category_totals
            .iter()
            .map(|(category, amount)| CategoryAggregate {
                category: category.clone(),
                amount: *amount,
            })
            .collect();

        ranked.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
        ranked
    }

    /// Share of total spending for one category, as a percentage
    pub fn share_of(&self, category: &str) -> f64 {
        use rust_decimal::prelude::ToPrimitive;

        if self.total_spending.is_zero() {
            return 0.0;
        }
        let amount = self.category_totals.get(category).copied().unwrap_or_default();
        amount
            .checked_div(self.total_spending)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|share| share.to_f64())
            .unwrap_or(0.0)
    }
}

/// Aggregate a transaction set under the given spending basis
pub fn aggregate(transactions: &[Transaction], basis: SpendingBasis) -> Aggregates {
    let mut aggregates = Aggregates {
        count: transactions.len(),
        ..Aggregates::default()
    };

    // Sums saturate at Decimal::MAX / Decimal::MIN rather than overflow
    for tx in transactions {
        aggregates.balance = aggregates.balance.saturating_add(tx.amount);

        if tx.is_income() {
            aggregates.income = aggregates.income.saturating_add(tx.amount);
        } else if tx.is_expense() {
            aggregates.expenses = aggregates.expenses.saturating_add(tx.magnitude());
        }

        if basis.counts(tx) {
            let total = aggregates
                .category_totals
                .entry(tx.category.clone())
                .or_insert(Decimal::ZERO);
            *total = total.saturating_add(tx.magnitude());
            aggregates.total_spending = aggregates.total_spending.saturating_add(tx.magnitude());
        }
    }

    aggregates
}
