use std::path::Path;

use encoding_rs::Encoding;
use log::debug;
use serde::Serialize;

use crate::{
    data::parse_number,
    error::{AnalystError, AnalystResult},
    record::{Record, RecordReader},
};

pub const DEFAULT_FILTER_LIMIT: usize = 10;

/// How a single cell compared against the filter target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Both sides parsed as numbers and are equal.
    NumericMatch,
    /// Both sides parsed as numbers, differ, and the text differs too.
    NumericMismatch,
    /// Trimmed text is identical; the numeric comparison did not apply or failed.
    StringMatch,
    NoMatch,
}

impl MatchOutcome {
    pub fn is_match(self) -> bool {
        matches!(self, MatchOutcome::NumericMatch | MatchOutcome::StringMatch)
    }
}

/// A filter value pre-normalized into its trimmed text and numeric forms.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterTarget {
    text: String,
    number: Option<f64>,
}

impl FilterTarget {
    pub fn new(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let number = parse_number(&text);
        Self { text, number }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn number(&self) -> Option<f64> {
        self.number
    }

    /// Numeric comparison first, exact trimmed-string comparison as fallback.
    pub fn compare(&self, cell: Option<&str>) -> MatchOutcome {
        let cell = cell.unwrap_or("").trim();
        let cell_number = self.number.and_then(|_| parse_number(cell));
        if let (Some(target), Some(value)) = (self.number, cell_number)
            && target == value
        {
            return MatchOutcome::NumericMatch;
        }
        if cell == self.text {
            MatchOutcome::StringMatch
        } else if cell_number.is_some() {
            MatchOutcome::NumericMismatch
        } else {
            MatchOutcome::NoMatch
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterResult {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
    pub count_returned: usize,
}

/// Reports a header lookup failure the way tool callers expect it.
pub fn unknown_column(column: &str, available: &[String]) -> AnalystError {
    AnalystError::invalid_argument(format!(
        "Column '{column}' not found. Available: {available:?}"
    ))
}

/// Collects, in file order, the first `limit` rows whose `column` equals `value`.
pub fn filter_equals(
    path: &Path,
    column: &str,
    value: &str,
    limit: usize,
    encoding: &'static Encoding,
) -> AnalystResult<FilterResult> {
    let mut reader = RecordReader::open(path, encoding)?;
    let columns = reader.headers().to_vec();
    let Some(column_index) = reader.column_index(column) else {
        return Err(unknown_column(column, &columns));
    };
    let target = FilterTarget::new(value);

    let mut rows = Vec::new();
    if limit > 0 {
        for record in reader.by_ref() {
            let record = record?;
            if target.compare(record.cell(column_index)).is_match() {
                rows.push(record);
                if rows.len() >= limit {
                    break;
                }
            }
        }
    }
    debug!(
        "Matched {} row(s) where '{}' = '{}' after scanning {} row(s) of {:?}",
        rows.len(),
        column,
        target.text(),
        reader.rows_read(),
        path
    );
    Ok(FilterResult {
        columns,
        count_returned: rows.len(),
        rows,
    })
}
