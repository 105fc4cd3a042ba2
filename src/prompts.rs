//! Natural-language prompt templates offered next to the tools.
//!
//! These are plain string formatting over caller-supplied arguments; nothing
//! here touches the filesystem.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AnalystError, AnalystResult};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PromptSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static [PromptArgument],
}

const FILENAME_ARG: PromptArgument = PromptArgument {
    name: "filename",
    description: "CSV file name inside the data directory",
    required: true,
};

pub const PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        name: "explain_columns",
        description: "Explain the columns of a CSV file and suggest analyses.",
        arguments: &[
            FILENAME_ARG,
            PromptArgument {
                name: "columns",
                description: "Column names as a JSON list or a comma-separated string",
                required: true,
            },
        ],
    },
    PromptSpec {
        name: "detect_anomalies",
        description: "Point out likely anomalies and outliers from a column summary.",
        arguments: &[
            FILENAME_ARG,
            PromptArgument {
                name: "summary",
                description: "Summary object as produced by describe_csv, or its JSON text",
                required: true,
            },
        ],
    },
    PromptSpec {
        name: "generate_query",
        description: "Draft a natural-language query that extracts a subset of a CSV file.",
        arguments: &[
            FILENAME_ARG,
            PromptArgument {
                name: "objective",
                description: "What the subset should achieve",
                required: true,
            },
        ],
    },
];

pub const SUMMARY_EXAMPLE: &str =
    r#"{"price":{"type":"numeric","nulls":0,"non_nulls":12,"min":0,"max":59.99}}"#;

/// Accepts a JSON list, a JSON-encoded list or scalar, or a comma-separated string.
pub fn parse_columns(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => items.iter().map(scalar_text).collect(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items.iter().map(scalar_text).collect(),
            Ok(other) => vec![scalar_text(&other)],
            Err(_) => text
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        },
        other => vec![scalar_text(other)],
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn explain_columns(filename: &str, columns: &[String]) -> String {
    let listed = serde_json::to_string(columns).unwrap_or_default();
    format!(
        "You have a CSV file named \"{filename}\" with these columns:\n{listed}\n\n\
         Explain in plain language what each column means and what it represents, \
         and suggest at least two useful kinds of analysis or visualization."
    )
}

/// `summary` may be the structured object or JSON text; unparseable text
/// yields guidance on the expected shape instead of an error.
pub fn detect_anomalies(filename: &str, summary: &Value) -> String {
    let parsed = match summary {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => value,
            Err(_) => {
                return format!(
                    "The 'summary' field must be valid JSON. Example: {SUMMARY_EXAMPLE}"
                );
            }
        },
        other => other.clone(),
    };
    let rendered = serde_json::to_string_pretty(&parsed).unwrap_or_default();
    format!(
        "The file \"{filename}\" has these statistics:\n{rendered}\n\n\
         - Point out columns with possibly anomalous values and explain why.\n\
         - Suggest additional checks to verify them.\n\
         - Propose a strategy or visualization to investigate the outliers."
    )
}

pub fn generate_query(filename: &str, objective: &str) -> String {
    format!(
        "File: \"{filename}\"\nObjective: {objective}\n\n\
         Write a natural-language query that:\n\
         - filters the dataset in line with the objective;\n\
         - names the columns to filter, group, or sort by;\n\
         - describes how to carry it out with pandas or with the filter_equals tool."
    )
}

/// Renders the prompt `name` from a JSON argument object.
pub fn render(name: &str, arguments: &Map<String, Value>) -> AnalystResult<String> {
    let spec = PROMPTS
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| AnalystError::invalid_argument(format!("Unknown prompt '{name}'")))?;
    let text_arg = |key: &str| -> AnalystResult<String> {
        match required(spec, arguments, key)? {
            Value::String(text) => Ok(text.clone()),
            other => Ok(other.to_string()),
        }
    };
    match spec.name {
        "explain_columns" => {
            let columns = parse_columns(required(spec, arguments, "columns")?);
            Ok(explain_columns(&text_arg("filename")?, &columns))
        }
        "detect_anomalies" => Ok(detect_anomalies(
            &text_arg("filename")?,
            required(spec, arguments, "summary")?,
        )),
        "generate_query" => Ok(generate_query(
            &text_arg("filename")?,
            &text_arg("objective")?,
        )),
        other => Err(AnalystError::invalid_argument(format!(
            "Unknown prompt '{other}'"
        ))),
    }
}

fn required<'a>(
    spec: &PromptSpec,
    arguments: &'a Map<String, Value>,
    key: &str,
) -> AnalystResult<&'a Value> {
    arguments.get(key).ok_or_else(|| {
        AnalystError::invalid_argument(format!(
            "Prompt '{}' requires argument '{key}'",
            spec.name
        ))
    })
}
