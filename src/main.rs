use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use daylog::{cli, config, logging, store};

fn main() -> Result<()> {
    logging::init();
    let cli_opts = cli::Cli::parse();
    let config = match cli_opts.config.clone().or_else(config::default_config_path) {
        Some(path) => config::load(&path)?,
        None => config::Config::default(),
    };
    let db_path = config.database_path();
    tracing::debug!(path = %db_path.display(), "opening database");
    let store = Arc::new(store::Store::open(&db_path)?);
    cli::run(cli_opts.command, store, &config)
}
