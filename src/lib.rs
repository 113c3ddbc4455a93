pub mod board;
pub mod check;
pub mod cli;
pub mod data;
pub mod dataset;
pub mod facets;
pub mod io_utils;
pub mod mask;
pub mod project;
pub mod sample;
pub mod selection;
pub mod table;
pub mod view;
pub mod warnings;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("facet_board", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Show(args) => view::execute(&args),
        Commands::Facets(args) => facets::execute(&args),
        Commands::Check(args) => check::execute(&args),
        Commands::Sample(args) => sample::execute(&args),
    }
}
