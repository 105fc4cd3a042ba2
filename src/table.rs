//! Aligned plain-text rendering for `--table` output.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::{describe::Description, record::Record};

pub fn render_records(columns: &[String], rows: &[Record]) -> String {
    let cells = rows.iter().map(Record::to_strings).collect::<Vec<_>>();
    render_table(columns, &cells)
}

pub fn render_summary(description: &Description) -> String {
    let headers = ["column", "type", "nulls", "non_nulls", "min", "max"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let rows = description
        .summary
        .iter()
        .map(|(name, summary)| {
            vec![
                name.to_string(),
                summary.kind.as_str().to_string(),
                summary.nulls.to_string(),
                summary.non_nulls.to_string(),
                summary.min.map(|v| v.to_string()).unwrap_or_default(),
                summary.max.map(|v| v.to_string()).unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&headers, &rows)
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let sanitized = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&sanitized));
            format!("{sanitized}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.truncate(line.trim_end().len());
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
