//! Type and null/min/max inference over a bounded prefix of a CSV file.
//!
//! Each column gets a [`ColumnStat`] accumulator. Cells are folded in one at a
//! time through [`ColumnStat::observe`]; once the scan ends the accumulators
//! are frozen into [`ColumnSummary`] values. A column is `numeric` only while
//! every non-null cell seen so far parsed as a number, and a single failure
//! downgrades it for the rest of the scan.

use std::path::Path;

use encoding_rs::Encoding;
use log::debug;
use serde::{
    Serialize,
    ser::{SerializeMap, Serializer},
};

use crate::{
    data::{is_null, parse_number},
    error::AnalystResult,
    record::RecordReader,
};

pub const DEFAULT_SAMPLE_ROWS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStat {
    pub nulls: usize,
    pub non_nulls: usize,
    pub numeric: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Default for ColumnStat {
    fn default() -> Self {
        Self {
            nulls: 0,
            non_nulls: 0,
            numeric: true,
            min: None,
            max: None,
        }
    }
}

impl ColumnStat {
    pub fn observe(&mut self, cell: Option<&str>) {
        let value = match cell {
            Some(value) if !is_null(cell) => value,
            _ => {
                self.nulls += 1;
                return;
            }
        };
        self.non_nulls += 1;
        match parse_number(value) {
            Some(number) => {
                if self.min.is_none_or(|min| number < min) {
                    self.min = Some(number);
                }
                if self.max.is_none_or(|max| number > max) {
                    self.max = Some(number);
                }
            }
            None => self.numeric = false,
        }
    }

    pub fn finish(&self) -> ColumnSummary {
        let kind = if self.numeric && self.non_nulls > 0 {
            ColumnKind::Numeric
        } else {
            ColumnKind::TextOrMixed
        };
        let numeric = kind == ColumnKind::Numeric;
        ColumnSummary {
            kind,
            nulls: self.nulls,
            non_nulls: self.non_nulls,
            min: self.min.filter(|_| numeric),
            max: self.max.filter(|_| numeric),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    TextOrMixed,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::TextOrMixed => "text_or_mixed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSummary {
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    pub nulls: usize,
    pub non_nulls: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Column summaries keyed by name, kept in header order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryMap(Vec<(String, ColumnSummary)>);

impl SummaryMap {
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, summary)| summary)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnSummary)> {
        self.0.iter().map(|(name, summary)| (name.as_str(), summary))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SummaryMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, summary) in &self.0 {
            map.serialize_entry(name, summary)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub columns: Vec<String>,
    pub summary: SummaryMap,
    pub sampled_rows: usize,
}

pub struct StatsAccumulator {
    columns: Vec<String>,
    stats: Vec<ColumnStat>,
    rows: usize,
}

impl StatsAccumulator {
    pub fn new(columns: &[String]) -> Self {
        Self {
            columns: columns.to_vec(),
            stats: vec![ColumnStat::default(); columns.len()],
            rows: 0,
        }
    }

    pub fn ingest<'a, I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut cells = cells.into_iter();
        for stat in &mut self.stats {
            stat.observe(cells.next().flatten());
        }
        self.rows += 1;
    }

    pub fn finish(self) -> Description {
        let summary = self
            .columns
            .iter()
            .cloned()
            .zip(self.stats.iter().map(ColumnStat::finish))
            .collect();
        Description {
            columns: self.columns,
            summary: SummaryMap(summary),
            sampled_rows: self.rows,
        }
    }
}

/// Scans at most `sample_rows` records of `path` and summarizes each column.
pub fn describe(
    path: &Path,
    sample_rows: usize,
    encoding: &'static Encoding,
) -> AnalystResult<Description> {
    let mut reader = RecordReader::open(path, encoding)?;
    let mut stats = StatsAccumulator::new(reader.headers());
    for record in reader.by_ref().take(sample_rows) {
        let record = record?;
        stats.ingest(record.cells().iter().map(|cell| cell.as_deref()));
    }
    debug!(
        "Sampled {} row(s) of {:?} (limit {})",
        reader.rows_read(),
        path,
        sample_rows
    );
    Ok(stats.finish())
}
