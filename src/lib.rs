// Spending Lens - Core Library
// Exposes all modules for use in the CLI, the TUI, and tests

pub mod aggregator;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod parser;
pub mod series;
pub mod store;
pub mod temporal;
pub mod transaction;
pub mod trend;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use aggregator::{aggregate, Aggregates, CategoryAggregate, SpendingBasis};
pub use client::{ApiClient, Credentials, Registration};
pub use config::{default_config_path, ApiConfig, Config, PolicyConfig};
pub use error::{Error, Result, RowRejection};
pub use filter::{apply as apply_filter, EmptySelection, FilterCriteria};
pub use parser::{
    detect_format, import_file, importer_for,
    CsvImporter, ImportFormat, ImportReport, JsonImporter, RejectedRow, TransactionSource,
};
pub use series::{spending_series, SeriesPoint, SpendingSeries};
pub use store::{SortDirection, SortKey, SortSpec, Summary, TransactionStore};
pub use temporal::{parse_calendar_date, DateRange, MonthWindow, MONTH_NAMES};
pub use transaction::{RawRecord, Transaction};
pub use trend::spending_trend;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
