use std::path::Path;

use encoding_rs::Encoding;
use log::debug;
use serde::Serialize;

use crate::{
    error::AnalystResult,
    record::{Record, RecordReader},
};

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
    pub count_returned: usize,
}

/// Returns the header and the first `rows` records of `path`, untouched.
pub fn preview(path: &Path, rows: usize, encoding: &'static Encoding) -> AnalystResult<Preview> {
    let mut reader = RecordReader::open(path, encoding)?;
    let columns = reader.headers().to_vec();
    let collected = reader
        .by_ref()
        .take(rows)
        .collect::<AnalystResult<Vec<_>>>()?;
    debug!(
        "Previewed {} of requested {} row(s) from {:?}",
        collected.len(),
        rows,
        path
    );
    Ok(Preview {
        columns,
        count_returned: collected.len(),
        rows: collected,
    })
}
