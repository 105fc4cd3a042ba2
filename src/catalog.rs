//! The data directory: listing its CSV files and confining lookups to it.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Serialize;

use crate::error::{AnalystError, AnalystResult};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RootDiagnostics {
    pub data_dir: PathBuf,
    pub exists: bool,
    pub csv_found: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    /// Canonicalizes `root` when it exists; a missing root is kept as given so
    /// that diagnostics can still report it.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let root = fs::canonicalize(root).unwrap_or_else(|_| absolute(root));
        Self { root }
    }

    /// Like [`DataRoot::new`] but fails unless the root is an existing directory.
    pub fn open(root: impl AsRef<Path>) -> AnalystResult<Self> {
        let data_root = Self::new(root);
        if !data_root.root.is_dir() {
            return Err(AnalystError::NotFound(data_root.root));
        }
        Ok(data_root)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Names of the `.csv` files directly under the root, sorted.
    pub fn list_csvs(&self) -> AnalystResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') || !name.ends_with(".csv") {
                continue;
            }
            if entry.path().is_file() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolves `filename` against the root.
    ///
    /// The result is canonical, an existing regular file, and strictly inside
    /// the root. Existence is checked before containment.
    pub fn resolve(&self, filename: &str) -> AnalystResult<PathBuf> {
        let joined = self.root.join(filename);
        let resolved = match fs::canonicalize(&joined) {
            Ok(path) if path.is_file() => path,
            Ok(path) => return Err(AnalystError::NotFound(path)),
            Err(_) => return Err(AnalystError::NotFound(joined)),
        };
        if resolved == self.root || !resolved.starts_with(&self.root) {
            return Err(AnalystError::AccessDenied(resolved));
        }
        debug!("Resolved '{}' to {:?}", filename, resolved);
        Ok(resolved)
    }

    pub fn diagnostics(&self) -> RootDiagnostics {
        let exists = self.root.exists();
        let csv_found = if exists {
            self.list_csvs().unwrap_or_default()
        } else {
            Vec::new()
        };
        RootDiagnostics {
            data_dir: self.root.clone(),
            exists,
            csv_found,
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
