use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Preview, profile, and filter the CSV files in a data directory",
    long_about = None
)]
pub struct Cli {
    /// Directory holding the CSV files (overrides the config file)
    #[arg(long = "data-dir", env = "CSV_ANALYST_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
    /// YAML settings file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the CSV files available in the data directory
    List,
    /// Report the resolved data directory and what it contains
    Paths,
    /// Show the header and first rows of a CSV file
    Preview(PreviewArgs),
    /// Infer column types, null counts, and numeric ranges from a prefix of a CSV file
    Describe(DescribeArgs),
    /// Return rows whose column equals a value (numeric-aware)
    Filter(FilterArgs),
    /// Render one of the analysis prompt templates
    Prompt(PromptArgs),
    /// Serve tools, prompts, and the CSV index over stdio (JSON-RPC)
    Serve,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// CSV file name inside the data directory
    pub file: String,
    /// Number of rows to show
    #[arg(short = 'n', long = "rows", allow_negative_numbers = true)]
    pub rows: Option<i64>,
    /// Render an aligned table instead of JSON
    #[arg(long)]
    pub table: bool,
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// CSV file name inside the data directory
    pub file: String,
    /// Number of leading rows to scan
    #[arg(long = "sample-rows", allow_negative_numbers = true)]
    pub sample_rows: Option<i64>,
    /// Render an aligned table instead of JSON
    #[arg(long)]
    pub table: bool,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// CSV file name inside the data directory
    pub file: String,
    /// Column to compare
    pub column: String,
    /// Value the column must equal
    #[arg(allow_hyphen_values = true)]
    pub value: String,
    /// Maximum number of matching rows to return
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
    /// Render an aligned table instead of JSON
    #[arg(long)]
    pub table: bool,
}

#[derive(Debug, Args)]
pub struct PromptArgs {
    #[command(subcommand)]
    pub template: PromptTemplate,
}

#[derive(Debug, Subcommand)]
pub enum PromptTemplate {
    /// Explain the columns of a CSV file and suggest analyses
    ExplainColumns {
        filename: String,
        /// Column names as a JSON list or comma-separated string
        columns: String,
    },
    /// Point out likely anomalies from a describe summary (JSON)
    DetectAnomalies { filename: String, summary: String },
    /// Draft a natural-language query for an objective
    GenerateQuery { filename: String, objective: String },
}
