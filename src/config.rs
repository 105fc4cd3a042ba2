//! Runtime settings: defaults, optionally overridden by a YAML file and then
//! by command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::DataRoot, describe::DEFAULT_SAMPLE_ROWS, error::AnalystResult,
    filter::DEFAULT_FILTER_LIMIT, io_utils, preview::DEFAULT_PREVIEW_ROWS,
};

pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub preview_rows: usize,
    pub sample_rows: usize,
    pub filter_limit: usize,
    pub input_encoding: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            filter_limit: DEFAULT_FILTER_LIMIT,
            input_encoding: "utf-8".to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Opening config file {path:?}"))?;
        Self::from_yaml(&raw).with_context(|| format!("Parsing config file {path:?}"))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Loads `config` when given, then applies the data directory override.
    pub fn resolve(config: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
        let mut settings = match config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(dir) = data_dir {
            settings.data_dir = dir.to_path_buf();
        }
        Ok(settings)
    }

    pub fn data_root(&self) -> DataRoot {
        DataRoot::new(&self.data_dir)
    }

    pub fn encoding(&self) -> AnalystResult<&'static Encoding> {
        io_utils::resolve_encoding(Some(&self.input_encoding))
    }
}
