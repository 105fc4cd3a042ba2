pub mod analyst;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod data;
pub mod describe;
pub mod error;
pub mod filter;
pub mod io_utils;
pub mod preview;
pub mod prompts;
pub mod record;
pub mod server;
pub mod table;

use std::{env, io, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};
use serde::Serialize;
use serde_json::Value;

pub use crate::analyst::CsvAnalyst;
pub use crate::error::{AnalystError, AnalystResult};

use crate::{
    cli::{Cli, Commands, PromptTemplate},
    config::Settings,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_analyst", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let settings = Settings::resolve(cli.config.as_deref(), cli.data_dir.as_deref())?;
    debug!("Settings: {:?}", settings);
    match cli.command {
        Commands::Paths => print_json(&settings.data_root().diagnostics()),
        Commands::Prompt(args) => handle_prompt(args.template),
        Commands::List => {
            let analyst = open_analyst(&settings)?;
            let files = analyst.list_csvs()?;
            info!(
                "Found {} CSV file(s) in {:?}",
                files.len(),
                analyst.root().path()
            );
            print_json(&files)
        }
        Commands::Preview(args) => {
            let analyst = open_analyst(&settings)?;
            let preview = analyst
                .preview_csv(&args.file, args.rows)
                .with_context(|| format!("Previewing '{}'", args.file))?;
            info!(
                "Previewed {} row(s) from '{}'",
                preview.count_returned, args.file
            );
            if args.table {
                print!("{}", table::render_records(&preview.columns, &preview.rows));
                Ok(())
            } else {
                print_json(&preview)
            }
        }
        Commands::Describe(args) => {
            let analyst = open_analyst(&settings)?;
            let description = analyst
                .describe_csv(&args.file, args.sample_rows)
                .with_context(|| format!("Describing '{}'", args.file))?;
            info!(
                "Summarized {} column(s) over {} row(s) of '{}'",
                description.columns.len(),
                description.sampled_rows,
                args.file
            );
            if args.table {
                print!("{}", table::render_summary(&description));
                Ok(())
            } else {
                print_json(&description)
            }
        }
        Commands::Filter(args) => {
            let analyst = open_analyst(&settings)?;
            let result = analyst
                .filter_equals(&args.file, &args.column, &args.value, args.limit)
                .with_context(|| {
                    format!("Filtering '{}' on column '{}'", args.file, args.column)
                })?;
            info!(
                "Matched {} row(s) where '{}' = '{}'",
                result.count_returned, args.column, args.value
            );
            if args.table {
                print!("{}", table::render_records(&result.columns, &result.rows));
                Ok(())
            } else {
                print_json(&result)
            }
        }
        Commands::Serve => {
            let analyst = open_analyst(&settings)?;
            server::serve(&analyst, io::stdin().lock(), io::stdout().lock())
        }
    }
}

fn open_analyst(settings: &Settings) -> Result<CsvAnalyst> {
    CsvAnalyst::from_settings(settings)
        .with_context(|| format!("Opening data directory {:?}", settings.data_dir))
}

fn handle_prompt(template: PromptTemplate) -> Result<()> {
    let text = match template {
        PromptTemplate::ExplainColumns { filename, columns } => {
            let columns = prompts::parse_columns(&Value::String(columns));
            prompts::explain_columns(&filename, &columns)
        }
        PromptTemplate::DetectAnomalies { filename, summary } => {
            prompts::detect_anomalies(&filename, &Value::String(summary))
        }
        PromptTemplate::GenerateQuery {
            filename,
            objective,
        } => prompts::generate_query(&filename, &objective),
    };
    println!("{text}");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Serializing result")?;
    println!("{rendered}");
    Ok(())
}
