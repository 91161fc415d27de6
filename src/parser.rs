// Import framework - CSV uploads and JSON feeds into validated transactions
//
// Importers never hand the aggregator a half-parsed row: every row either
// validates into a Transaction or is recorded as a RejectedRow.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Error, Result, RowRejection};
use crate::transaction::{RawRecord, Transaction};

// ============================================================================
// CORE TYPES
// ============================================================================

/// ImportFormat - which importer understands a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            ImportFormat::Csv => "CSV upload",
            ImportFormat::Json => "JSON feed",
        }
    }
}

/// A row that failed validation, with its position in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// CSV: 1-based file line (header is line 1). JSON: 0-based array index.
    pub line: usize,
    pub reason: RowRejection,
}

/// ImportReport - output of `TransactionSource::parse`
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<RejectedRow>,
}

impl ImportReport {
    pub fn accepted_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    fn push(&mut self, line: usize, record: RawRecord) {
        match record.validate() {
            Ok(tx) => self.transactions.push(tx),
            Err(reason) => self.reject(line, reason),
        }
    }

    fn reject(&mut self, line: usize, reason: RowRejection) {
        debug!(line, %reason, "Dropping row");
        self.rejected.push(RejectedRow { line, reason });
    }
}

// ============================================================================
// IMPORTER TRAIT
// ============================================================================

/// TransactionSource - turns a text payload into transactions
pub trait TransactionSource: Send + Sync {
    /// Parse a whole payload.
    ///
    /// Row-level problems land in `ImportReport::rejected`. An `Err` means
    /// the payload as a whole is unusable and nothing was loaded.
    fn parse(&self, input: &str) -> Result<ImportReport>;

    fn format(&self) -> ImportFormat;
}

// ============================================================================
// FACTORY FUNCTIONS
// ============================================================================

/// Detect import format from the file extension
pub fn detect_format(file_path: &Path) -> Result<ImportFormat> {
    let extension = file_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" | "txt" => Ok(ImportFormat::Csv),
        "json" => Ok(ImportFormat::Json),
        _ => Err(Error::UnsupportedFormat(file_path.display().to_string())),
    }
}

/// Get the importer for a format
pub fn importer_for(format: ImportFormat) -> Box<dyn TransactionSource> {
    match format {
        ImportFormat::Csv => Box::new(CsvImporter::new()),
        ImportFormat::Json => Box::new(JsonImporter::new()),
    }
}

/// Read a file and import it with the importer its extension selects
pub fn import_file(file_path: &Path) -> Result<ImportReport> {
    let format = detect_format(file_path)?;
    let content = fs::read_to_string(file_path)?;
    let report = importer_for(format).parse(&content)?;

    info!(
        file = %file_path.display(),
        format = format.name(),
        accepted = report.accepted_count(),
        rejected = report.rejected_count(),
        "Imported transactions"
    );
    if report.rejected_count() > 0 {
        warn!(
            "{} row(s) in {} were dropped",
            report.rejected_count(),
            file_path.display()
        );
    }

    Ok(report)
}

// ============================================================================
// CSV IMPORTER
// ============================================================================

/// CSV upload: header row, then `id,date,category,amount`
pub struct CsvImporter;

impl CsvImporter {
    pub fn new() -> Self {
        CsvImporter
    }
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionSource for CsvImporter {
    fn parse(&self, input: &str) -> Result<ImportReport> {
        use csv::{ReaderBuilder, Trim};

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input.as_bytes());

        let mut report = ImportReport::default();

        for (row_num, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    // Broken quoting and the like: drop the row, keep going
                    report.reject(row_num + 2, RowRejection::MalformedRow(e.to_string()));
                    continue;
                }
            };
            // Fallback: +1 for 1-indexed, +1 for the header
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(row_num + 2);

            if record.len() < 4 {
                report.reject(
                    line,
                    RowRejection::MalformedRow(format!("expected 4 columns, found {}", record.len())),
                );
                continue;
            }

            let raw = RawRecord::new(
                record.get(0).unwrap_or(""),
                record.get(1).unwrap_or(""),
                record.get(2).unwrap_or(""),
                record.get(3).unwrap_or(""),
            );
            report.push(line, raw);
        }

        Ok(report)
    }

    fn format(&self) -> ImportFormat {
        ImportFormat::Csv
    }
}

// ============================================================================
// JSON IMPORTER
// ============================================================================

/// JSON feed: an array of flat transaction objects
///
/// Field names follow the remote API, with the CSV names as alternatives:
/// `id`, `date`/`time`, `category`, `amount`/`val`, `description`/`ref`,
/// `account`/`accountno`.
pub struct JsonImporter;

impl JsonImporter {
    pub fn new() -> Self {
        JsonImporter
    }

    /// Parse an already-decoded JSON value
    pub fn parse_value(&self, value: &Value) -> Result<ImportReport> {
        let items = value
            .as_array()
            .ok_or_else(|| Error::InvalidData("Expected a JSON array of transactions".to_string()))?;

        let mut report = ImportReport::default();

        for (idx, item) in items.iter().enumerate() {
            let object = match item.as_object() {
                Some(object) => object,
                None => {
                    report.reject(idx, RowRejection::MalformedRow("not a JSON object".to_string()));
                    continue;
                }
            };

            let field = |names: &[&str]| -> String {
                names
                    .iter()
                    .find_map(|name| object.get(*name).and_then(scalar_text))
                    .unwrap_or_default()
            };

            let mut raw = RawRecord::new(
                &field(&["id"]),
                &field(&["date", "time"]),
                &field(&["category"]),
                &field(&["amount", "val"]),
            );
            let description = field(&["description", "ref"]);
            if !description.is_empty() {
                raw = raw.with_description(description);
            }
            let account = field(&["account", "accountno"]);
            if !account.is_empty() {
                raw = raw.with_account(account);
            }

            report.push(idx, raw);
        }

        Ok(report)
    }
}

impl Default for JsonImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionSource for JsonImporter {
    fn parse(&self, input: &str) -> Result<ImportReport> {
        let value: Value = serde_json::from_str(input)?;
        self.parse_value(&value)
    }

    fn format(&self) -> ImportFormat {
        ImportFormat::Json
    }
}

/// Text form of a scalar JSON field; null, arrays and objects count as absent
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
