// Filter stage - category selection and date window
//
// Filters always run against the full base set. Applying new criteria never
// starts from the output of a previous filter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::temporal::DateRange;
use crate::transaction::Transaction;

/// What an empty category selection means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySelection {
    /// No categories selected keeps every transaction
    #[default]
    ShowAll,
    /// No categories selected keeps nothing (strict inclusion)
    ShowNone,
}

impl EmptySelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmptySelection::ShowAll => "show_all",
            EmptySelection::ShowNone => "show_none",
        }
    }
}

impl fmt::Display for EmptySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmptySelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "show_all" | "all" => Ok(EmptySelection::ShowAll),
            "show_none" | "none" => Ok(EmptySelection::ShowNone),
            other => Err(Error::InvalidData(format!("Unknown empty-selection policy: {}", other))),
        }
    }
}

/// FilterCriteria - selected categories plus an optional date window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub categories: BTreeSet<String>,
    pub range: Option<DateRange>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: select categories
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Builder pattern: restrict to a date window
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.range.is_none()
    }

    pub fn matches_category(&self, tx: &Transaction, policy: EmptySelection) -> bool {
        if self.categories.is_empty() {
            return policy == EmptySelection::ShowAll;
        }
        self.categories.contains(&tx.category)
    }

    pub fn matches_date(&self, tx: &Transaction) -> bool {
        match &self.range {
            Some(range) => range.contains(tx.date),
            None => true,
        }
    }

    pub fn matches(&self, tx: &Transaction, policy: EmptySelection) -> bool {
        self.matches_category(tx, policy) && self.matches_date(tx)
    }
}

/// Apply criteria to the base set, keeping input order
pub fn apply(
    base: &[Transaction],
    criteria: &FilterCriteria,
    policy: EmptySelection,
) -> Vec<Transaction> {
    base.iter()
        .filter(|tx| criteria.matches(tx, policy))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{aggregate, SpendingBasis};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tx(id: &str, date: &str, category: &str, amount: Decimal) -> Transaction {
        Transaction::new(
            id,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category,
            amount,
        )
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("1", "2024-01-05", "food", dec!(-12)),
            tx("2", "2024-01-20", "travel", dec!(-300)),
            tx("3", "2024-02-01", "food", dec!(-8)),
            tx("4", "2024-02-15", "salary", dec!(2000)),
            tx("5", "2024-03-10", "travel", dec!(-45)),
        ]
    }

    fn ids(txs: &[Transaction]) -> Vec<&str> {
        txs.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_category_filter_keeps_selected() {
        let criteria = FilterCriteria::new().with_categories(["travel"]);
        let result = apply(&sample(), &criteria, EmptySelection::ShowAll);

        assert_eq!(ids(&result), vec!["2", "5"]);
    }

    #[test]
    fn test_empty_selection_policies() {
        let criteria = FilterCriteria::new();

        let all = apply(&sample(), &criteria, EmptySelection::ShowAll);
        assert_eq!(all.len(), 5);

        let none = apply(&sample(), &criteria, EmptySelection::ShowNone);
        assert!(none.is_empty());
    }

    #[test]
    fn test_full_category_set_returns_input() {
        let base = sample();
        let every: BTreeSet<String> = base.iter().map(|t| t.category.clone()).collect();
        let criteria = FilterCriteria::new().with_categories(every);

        for policy in [EmptySelection::ShowAll, EmptySelection::ShowNone] {
            let result = apply(&base, &criteria, policy);
            let mut got = ids(&result);
            let mut want = ids(&base);
            got.sort();
            want.sort();
            assert_eq!(got, want);
        }
    }

    #[test]
    fn test_date_filter_is_inclusive() {
        let range = DateRange::parse("2024-01-20", "2024-02-15").unwrap();
        let criteria = FilterCriteria::new().with_range(range);
        let result = apply(&sample(), &criteria, EmptySelection::ShowAll);

        assert_eq!(ids(&result), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_date_window_excluding_everything() {
        let range = DateRange::parse("2023-01-01", "2023-12-31").unwrap();
        let criteria = FilterCriteria::new().with_range(range);
        let result = apply(&sample(), &criteria, EmptySelection::ShowAll);

        assert!(result.is_empty());
        let agg = aggregate(&result, SpendingBasis::ExpensesOnly);
        assert!(agg.category_totals.is_empty());
        assert_eq!(agg.total_spending, Decimal::ZERO);
        assert_eq!(agg.balance, Decimal::ZERO);
    }

    #[test]
    fn test_category_and_date_combine() {
        let range = DateRange::parse("2024-02-01", "2024-12-31").unwrap();
        let criteria = FilterCriteria::new()
            .with_categories(["food", "travel"])
            .with_range(range);
        let result = apply(&sample(), &criteria, EmptySelection::ShowAll);

        assert_eq!(ids(&result), vec!["3", "5"]);
    }

    #[test]
    fn test_filters_do_not_compound() {
        let base = sample();
        let narrow = FilterCriteria::new().with_categories(["food"]);
        let first = apply(&base, &narrow, EmptySelection::ShowAll);
        assert_eq!(first.len(), 2);

        // New criteria start from the base again, not from `first`
        let wide = FilterCriteria::new().with_categories(["travel"]);
        let second = apply(&base, &wide, EmptySelection::ShowAll);
        assert_eq!(ids(&second), vec!["2", "5"]);
    }

    #[test]
    fn test_unknown_category_selects_nothing() {
        let criteria = FilterCriteria::new().with_categories(["gifts"]);
        assert!(apply(&sample(), &criteria, EmptySelection::ShowAll).is_empty());
    }

    #[test]
    fn test_empty_selection_from_str() {
        assert_eq!("show_all".parse::<EmptySelection>().unwrap(), EmptySelection::ShowAll);
        assert_eq!("show-none".parse::<EmptySelection>().unwrap(), EmptySelection::ShowNone);
        assert!("maybe".parse::<EmptySelection>().is_err());
    }
}
