//! Tool surface over the scanning engine.
//!
//! [`CsvAnalyst`] binds the engine to one data directory. Every call resolves
//! the file name through [`DataRoot`], validates caller-supplied counts, and
//! runs a fresh scan; nothing is cached between calls.

use encoding_rs::{Encoding, UTF_8};
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::{
    catalog::{DataRoot, RootDiagnostics},
    config::Settings,
    describe::{self, DEFAULT_SAMPLE_ROWS, Description},
    error::{AnalystError, AnalystResult},
    filter::{self, DEFAULT_FILTER_LIMIT, FilterResult},
    preview::{self, DEFAULT_PREVIEW_ROWS, Preview},
};

pub const CSV_INDEX_URI: &str = "csv://index";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub preview_rows: usize,
    pub sample_rows: usize,
    pub filter_limit: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            filter_limit: DEFAULT_FILTER_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvAnalyst {
    root: DataRoot,
    encoding: &'static Encoding,
    defaults: Defaults,
}

impl CsvAnalyst {
    pub fn new(root: DataRoot) -> Self {
        Self {
            root,
            encoding: UTF_8,
            defaults: Defaults::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> AnalystResult<Self> {
        Ok(Self {
            root: DataRoot::open(&settings.data_dir)?,
            encoding: settings.encoding()?,
            defaults: Defaults {
                preview_rows: settings.preview_rows,
                sample_rows: settings.sample_rows,
                filter_limit: settings.filter_limit,
            },
        })
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn root(&self) -> &DataRoot {
        &self.root
    }

    pub fn list_csvs(&self) -> AnalystResult<Vec<String>> {
        self.root.list_csvs()
    }

    /// Text body of the `csv://index` resource.
    pub fn csv_index(&self) -> AnalystResult<String> {
        let files = self.root.list_csvs()?;
        if files.is_empty() {
            return Ok(format!(
                "No CSV files found in {}",
                self.root.path().display()
            ));
        }
        let listed = files
            .iter()
            .map(|name| format!("- {name}"))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!("Available CSV files:\n{listed}"))
    }

    pub fn debug_paths(&self) -> RootDiagnostics {
        self.root.diagnostics()
    }

    pub fn preview_csv(&self, filename: &str, n: Option<i64>) -> AnalystResult<Preview> {
        let rows = count_arg("n", n, self.defaults.preview_rows)?;
        let path = self.root.resolve(filename)?;
        preview::preview(&path, rows, self.encoding)
    }

    pub fn describe_csv(
        &self,
        filename: &str,
        sample_rows: Option<i64>,
    ) -> AnalystResult<Description> {
        let sample_rows = count_arg("sample_rows", sample_rows, self.defaults.sample_rows)?;
        let path = self.root.resolve(filename)?;
        describe::describe(&path, sample_rows, self.encoding)
    }

    pub fn filter_equals(
        &self,
        filename: &str,
        column: &str,
        value: &str,
        limit: Option<i64>,
    ) -> AnalystResult<FilterResult> {
        let limit = count_arg("limit", limit, self.defaults.filter_limit)?;
        let path = self.root.resolve(filename)?;
        filter::filter_equals(&path, column, value, limit, self.encoding)
    }

    /// Dispatches a tool call by name with a JSON argument object.
    pub fn call_tool(&self, name: &str, arguments: &Map<String, Value>) -> AnalystResult<Value> {
        debug!("Calling tool '{}' with {:?}", name, arguments);
        match name {
            "list_csvs" => to_json(self.list_csvs()?),
            "debug_paths" => to_json(self.debug_paths()),
            "preview_csv" => to_json(self.preview_csv(
                &string_arg(arguments, "filename")?,
                int_arg(arguments, "n")?,
            )?),
            "describe_csv" => to_json(self.describe_csv(
                &string_arg(arguments, "filename")?,
                int_arg(arguments, "sample_rows")?,
            )?),
            "filter_equals" => to_json(self.filter_equals(
                &string_arg(arguments, "filename")?,
                &string_arg(arguments, "column")?,
                &string_arg(arguments, "value")?,
                int_arg(arguments, "limit")?,
            )?),
            other => Err(AnalystError::invalid_argument(format!(
                "Unknown tool '{other}'"
            ))),
        }
    }
}

/// Name, description and JSON input schema of every callable tool.
pub fn tool_definitions() -> Vec<Value> {
    let filename = json!({
        "type": "string",
        "description": "CSV file name inside the data directory, e.g. 'games.csv'"
    });
    vec![
        json!({
            "name": "list_csvs",
            "description": "List the CSV files available in the data directory.",
            "inputSchema": {"type": "object", "properties": {}}
        }),
        json!({
            "name": "preview_csv",
            "description": "Return the header and the first N rows of a CSV file.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "filename": filename,
                    "n": {"type": "integer", "minimum": 0, "default": DEFAULT_PREVIEW_ROWS}
                },
                "required": ["filename"]
            }
        }),
        json!({
            "name": "describe_csv",
            "description": "Estimate column types (numeric / text_or_mixed), null counts and numeric min/max over the first sample_rows rows.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "filename": filename,
                    "sample_rows": {"type": "integer", "minimum": 0, "default": DEFAULT_SAMPLE_ROWS}
                },
                "required": ["filename"]
            }
        }),
        json!({
            "name": "filter_equals",
            "description": "Return rows where column equals value, comparing numerically when both sides are numbers and as trimmed text otherwise.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "filename": filename,
                    "column": {"type": "string"},
                    "value": {"type": "string"},
                    "limit": {"type": "integer", "minimum": 0, "default": DEFAULT_FILTER_LIMIT}
                },
                "required": ["filename", "column", "value"]
            }
        }),
        json!({
            "name": "debug_paths",
            "description": "Report the data directory, whether it exists, and the CSV files found there.",
            "inputSchema": {"type": "object", "properties": {}}
        }),
    ]
}

fn count_arg(name: &str, value: Option<i64>, default: usize) -> AnalystResult<usize> {
    match value {
        None => Ok(default),
        Some(raw) => usize::try_from(raw).map_err(|_| {
            AnalystError::invalid_argument(format!("'{name}' must be >= 0, got {raw}"))
        }),
    }
}

fn string_arg(arguments: &Map<String, Value>, key: &str) -> AnalystResult<String> {
    match arguments.get(key) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => Ok(value.to_string()),
        Some(other) => Err(AnalystError::invalid_argument(format!(
            "Argument '{key}' must be a string, got {other}"
        ))),
        None => Err(AnalystError::invalid_argument(format!(
            "Missing required argument '{key}'"
        ))),
    }
}

fn int_arg(arguments: &Map<String, Value>, key: &str) -> AnalystResult<Option<i64>> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number.as_i64().map(Some).ok_or_else(|| {
            AnalystError::invalid_argument(format!(
                "Argument '{key}' must be an integer, got {number}"
            ))
        }),
        Some(Value::String(text)) => text.trim().parse::<i64>().map(Some).map_err(|_| {
            AnalystError::invalid_argument(format!(
                "Argument '{key}' must be an integer, got '{text}'"
            ))
        }),
        Some(other) => Err(AnalystError::invalid_argument(format!(
            "Argument '{key}' must be an integer, got {other}"
        ))),
    }
}

fn to_json<T: Serialize>(value: T) -> AnalystResult<Value> {
    Ok(serde_json::to_value(value)?)
}
