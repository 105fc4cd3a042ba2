//! I/O utilities for opening CSV files and decoding their bytes.
//!
//! Every scan in csv-analyst goes through this module:
//!
//! - **Encoding**: cell bytes are decoded via `encoding_rs`, defaulting to UTF-8.
//!   Malformed sequences are rejected rather than replaced.
//! - **Reader construction**: comma-delimited, header row expected, and
//!   `flexible` so short rows reach the record layer where missing cells
//!   become nulls.
//! - **Existence checks**: a path that is missing or not a regular file is a
//!   `NotFound` before any handle is opened.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use encoding_rs::{Encoding, UTF_8};

use crate::error::{AnalystError, AnalystResult};

pub const CSV_DELIMITER: u8 = b',';

pub fn resolve_encoding(label: Option<&str>) -> AnalystResult<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes()).ok_or_else(|| {
            AnalystError::invalid_argument(format!("Unknown encoding '{value}'"))
        }),
        None => Ok(UTF_8),
    }
}

pub fn open_csv_reader<R>(reader: R) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(CSV_DELIMITER)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(path: &Path) -> AnalystResult<csv::Reader<BufReader<File>>> {
    match path.metadata() {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(AnalystError::NotFound(path.to_path_buf())),
    }
    let file = File::open(path)?;
    Ok(open_csv_reader(BufReader::new(file)))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Decodes a data record; empty cells become `None`.
pub fn decode_record(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
) -> AnalystResult<Vec<Option<String>>> {
    record
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            if field.is_empty() {
                return Ok(None);
            }
            decode_bytes(field, encoding)
                .map(Some)
                .ok_or_else(|| AnalystError::Decode {
                    context: format!("field {} on line {}", idx + 1, line_of(record)),
                    encoding: encoding.name(),
                })
        })
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> AnalystResult<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    headers
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let (text, had_errors) = encoding.decode_with_bom_removal(field);
            if had_errors {
                Err(AnalystError::Decode {
                    context: format!("header column {}", idx + 1),
                    encoding: encoding.name(),
                })
            } else {
                Ok(text.into_owned())
            }
        })
        .collect()
}

fn line_of(record: &csv::ByteRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or_default()
}
