use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RowRejection;
use crate::temporal::parse_calendar_date;

/// Transaction - a dated, categorized, signed monetary record
///
/// Positive amounts are income, negative amounts are expenses.
/// Never mutated once built; views and filters work on clones or references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,

    // Optional fields carried by the remote feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl Transaction {
    pub fn new(id: &str, date: NaiveDate, category: &str, amount: Decimal) -> Self {
        Transaction {
            id: id.to_string(),
            date,
            category: category.to_string(),
            amount,
            description: None,
            account: None,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    pub fn is_income(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Absolute value of the amount
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }
}

/// RawRecord - one input row before validation
///
/// Every field is still text here. `validate()` is the only way to turn it
/// into a `Transaction`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub id: String,
    pub date: String,
    pub category: String,
    pub amount: String,
    pub description: Option<String>,
    pub account: Option<String>,
}

impl RawRecord {
    pub fn new(id: &str, date: &str, category: &str, amount: &str) -> Self {
        RawRecord {
            id: id.trim().to_string(),
            date: date.trim().to_string(),
            category: category.trim().to_string(),
            amount: amount.trim().to_string(),
            description: None,
            account: None,
        }
    }

    /// Builder pattern: add optional description
    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    /// Builder pattern: add optional account
    pub fn with_account(mut self, account: String) -> Self {
        self.account = Some(account);
        self
    }

    /// Check required fields and parse date and amount.
    ///
    /// Field checks run in column order, so a row missing both id and
    /// category reports the id.
    pub fn validate(&self) -> Result<Transaction, RowRejection> {
        if self.id.is_empty() {
            return Err(RowRejection::MissingField("id"));
        }
        if self.date.is_empty() {
            return Err(RowRejection::MissingField("date"));
        }
        if self.category.is_empty() {
            return Err(RowRejection::MissingField("category"));
        }
        if self.amount.is_empty() {
            return Err(RowRejection::MissingField("amount"));
        }

        let amount = parse_amount(&self.amount)
            .ok_or_else(|| RowRejection::InvalidAmount(self.amount.clone()))?;
        let date = parse_calendar_date(&self.date)
            .ok_or_else(|| RowRejection::InvalidDate(self.date.clone()))?;

        Ok(Transaction {
            id: self.id.clone(),
            date,
            category: self.category.clone(),
            amount,
            description: self.description.clone().filter(|d| !d.is_empty()),
            account: self.account.clone().filter(|a| !a.is_empty()),
        })
    }
}

/// Parse a signed decimal amount ("-12.50", "300", "1.5e2")
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
