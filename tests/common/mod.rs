#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv_analyst::{CsvAnalyst, catalog::DataRoot};
use tempfile::{TempDir, tempdir};

/// The three-row fixture used throughout: `val` turns non-numeric on row 3.
pub const SMALL_CSV: &str = "name,val\na,1\na,2\nb,x\n";

/// Scratch data directory that cleans up on drop.
///
/// Files are written under `<tmp>/data`, leaving `<tmp>` itself available for
/// files that must sit outside the data root.
pub struct TestWorkspace {
    temp_dir: TempDir,
    data_dir: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("temp dir");
        let data_dir = temp_dir.path().join("data");
        fs::create_dir(&data_dir).expect("create data dir");
        Self { temp_dir, data_dir }
    }

    /// Root of the scratch area; the parent of the data directory.
    pub fn outer(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Writes `contents` into the data directory and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        write_file(&self.data_dir.join(name), contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        write_file(&self.data_dir.join(name), contents)
    }

    /// Writes `contents` next to, not inside, the data directory.
    pub fn write_outside(&self, name: &str, contents: &str) -> PathBuf {
        write_file(&self.temp_dir.path().join(name), contents.as_bytes())
    }

    pub fn analyst(&self) -> CsvAnalyst {
        CsvAnalyst::new(DataRoot::open(&self.data_dir).expect("open data root"))
    }
}

fn write_file(path: &Path, contents: &[u8]) -> PathBuf {
    let mut file = File::create(path).expect("create temp file");
    file.write_all(contents).expect("write temp file contents");
    path.to_path_buf()
}
