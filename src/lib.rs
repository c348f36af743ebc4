pub mod cli;
pub mod consolidate;
pub mod emit;
pub mod files;
pub mod header;
pub mod inference;
pub mod io_utils;
pub mod level;
pub mod partition;
pub mod pipeline;
pub mod report;
pub mod sentinel;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::Cli,
    files::WaveFiles,
    pipeline::GenerateOptions,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("waas_codegen", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => WaveFiles::default_data_dir()?,
    };
    let options = GenerateOptions {
        encoding: io_utils::resolve_encoding(cli.input_encoding.as_deref())?,
        write_report: !cli.no_report,
    };
    debug!("Data directory: {data_dir:?}, record types: {:?}", cli.record_types);
    let files = WaveFiles::new(data_dir);
    for record_type in &cli.record_types {
        let outcome = pipeline::generate(&files, *record_type, &options)?;
        info!(
            "Generated code was written to {:?} ({} file(s))",
            outcome.source_dir,
            outcome.written.len()
        );
    }
    Ok(())
}
