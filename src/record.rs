//! Lazy, header-aware record stream over a single CSV file.
//!
//! [`RecordReader`] decodes one record per `next()` call and never buffers
//! beyond the current row, so callers that stop early leave the rest of the
//! file unread. Each reader owns its own file handle; re-reading a file means
//! opening a new reader.

use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use encoding_rs::Encoding;
use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{
    error::AnalystResult,
    io_utils,
};

/// One data row keyed by the header's column names, in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Arc<[String]>,
    cells: Vec<Option<String>>,
}

impl Record {
    /// Builds a record, padding missing trailing cells with nulls and dropping
    /// cells past the last header column.
    pub fn new(columns: Arc<[String]>, mut cells: Vec<Option<String>>) -> Self {
        cells.resize(columns.len(), None);
        Self { columns, cells }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|cell| cell.as_deref())
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.cell(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.columns
            .iter()
            .zip(self.cells.iter())
            .map(|(name, cell)| (name.as_str(), cell.as_deref()))
    }

    /// Cells rendered as strings, nulls as empty.
    pub fn to_strings(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|cell| cell.clone().unwrap_or_default())
            .collect()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, cell) in self.iter() {
            map.serialize_entry(name, &cell)?;
        }
        map.end()
    }
}

pub struct RecordReader {
    reader: csv::Reader<BufReader<File>>,
    columns: Arc<[String]>,
    encoding: &'static Encoding,
    buffer: csv::ByteRecord,
    rows_read: usize,
    finished: bool,
}

impl RecordReader {
    pub fn open(path: &Path, encoding: &'static Encoding) -> AnalystResult<Self> {
        let mut reader = io_utils::open_csv_reader_from_path(path)?;
        let headers = io_utils::reader_headers(&mut reader, encoding)?;
        debug!(
            "Opened {:?} with {} column(s) ({})",
            path,
            headers.len(),
            encoding.name()
        );
        Ok(Self {
            reader,
            columns: headers.into(),
            encoding,
            buffer: csv::ByteRecord::new(),
            rows_read: 0,
            finished: false,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Number of data records yielded so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    fn read_next(&mut self) -> AnalystResult<Option<Record>> {
        if !self.reader.read_byte_record(&mut self.buffer)? {
            return Ok(None);
        }
        let cells = io_utils::decode_record(&self.buffer, self.encoding)?;
        self.rows_read += 1;
        Ok(Some(Record::new(Arc::clone(&self.columns), cells)))
    }
}

impl Iterator for RecordReader {
    type Item = AnalystResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl std::fmt::Debug for RecordReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordReader")
            .field("columns", &self.columns)
            .field("encoding", &self.encoding.name())
            .field("rows_read", &self.rows_read)
            .finish()
    }
}
