// Transaction store - caller-owned home for the loaded set and its criteria
//
// The store owns the base set and the current criteria. Every criteria change
// rebuilds the filtered set from the base; queries are pure reads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

use crate::aggregator::{aggregate, Aggregates, SpendingBasis};
use crate::filter::{apply, EmptySelection, FilterCriteria};
use crate::series::{spending_series, SpendingSeries};
use crate::temporal::DateRange;
use crate::transaction::Transaction;
use crate::trend::spending_trend;

// ============================================================================
// SORTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Category,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Table ordering for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        SortSpec { key, direction }
    }

    /// Clicking a column: same key flips direction, a new key starts ascending
    pub fn toggled(current: Option<SortSpec>, key: SortKey) -> SortSpec {
        match current {
            Some(spec) if spec.key == key && spec.direction == SortDirection::Ascending => {
                SortSpec::new(key, SortDirection::Descending)
            }
            _ => SortSpec::new(key, SortDirection::Ascending),
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ordering = match self.key {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Category => a.category.cmp(&b.category),
            SortKey::Amount => a.amount.cmp(&b.amount),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

/// Dashboard tiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Balance over every loaded transaction, independent of filters
    pub balance: Decimal,
    /// Spending over the filtered set
    pub total_spending: Decimal,
    /// Trend percentage over the filtered set
    pub trend: f64,
    pub transaction_count: usize,
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    base: Vec<Transaction>,
    filtered: Vec<Transaction>,
    criteria: FilterCriteria,
    basis: SpendingBasis,
    empty_selection: EmptySelection,
}

impl TransactionStore {
    pub fn new(basis: SpendingBasis, empty_selection: EmptySelection) -> Self {
        let mut store = TransactionStore {
            basis,
            empty_selection,
            ..Default::default()
        };
        store.refilter();
        store
    }

    /// Replace the loaded set. Criteria reset so stale selections never
    /// hide a fresh load.
    pub fn load(&mut self, transactions: Vec<Transaction>) {
        debug!(count = transactions.len(), "Loading transactions into store");
        self.base = transactions;
        self.criteria = FilterCriteria::default();
        self.refilter();
    }

    pub fn basis(&self) -> SpendingBasis {
        self.basis
    }

    pub fn empty_selection(&self) -> EmptySelection {
        self.empty_selection
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.base
    }

    pub fn filtered(&self) -> &[Transaction] {
        &self.filtered
    }

    // ------------------------------------------------------------------------
    // Criteria
    // ------------------------------------------------------------------------

    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria.categories = categories.into_iter().map(Into::into).collect();
        self.refilter();
    }

    /// Single-category focus: selecting the focused category again clears
    /// the selection, anything else replaces it.
    pub fn toggle_focus(&mut self, category: &str) {
        let already_focused =
            self.criteria.categories.len() == 1 && self.criteria.categories.contains(category);

        self.criteria.categories.clear();
        if !already_focused {
            self.criteria.categories.insert(category.to_string());
        }
        self.refilter();
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.criteria.range = range;
        self.refilter();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.refilter();
    }

    pub fn set_basis(&mut self, basis: SpendingBasis) {
        self.basis = basis;
    }

    pub fn set_empty_selection(&mut self, policy: EmptySelection) {
        self.empty_selection = policy;
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = apply(&self.base, &self.criteria, self.empty_selection);
        debug!(
            base = self.base.len(),
            filtered = self.filtered.len(),
            "Recomputed filtered set"
        );
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Distinct categories across the whole loaded set
    pub fn categories(&self) -> Vec<String> {
        self.base
            .iter()
            .map(|tx| tx.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Aggregates over the filtered set
    pub fn aggregates(&self) -> Aggregates {
        aggregate(&self.filtered, self.basis)
    }

    /// Aggregates over every loaded transaction
    pub fn overall(&self) -> Aggregates {
        aggregate(&self.base, self.basis)
    }

    pub fn trend(&self) -> f64 {
        spending_trend(&self.filtered)
    }

    pub fn series(&self) -> SpendingSeries {
        spending_series(&self.filtered)
    }

    pub fn summary(&self) -> Summary {
        let filtered = self.aggregates();
        Summary {
            balance: self.overall().balance,
            total_spending: filtered.total_spending,
            trend: self.trend(),
            transaction_count: filtered.count,
        }
    }

    /// Filtered set in display order. Stable, and leaves the order `trend()`
    /// sees untouched.
    pub fn sorted_view(&self, spec: Option<SortSpec>) -> Vec<&Transaction> {
        let mut view: Vec<&Transaction> = self.filtered.iter().collect();
        if let Some(spec) = spec {
            view.sort_by(|a, b| spec.compare(a, b));
        }
        view
    }
}
