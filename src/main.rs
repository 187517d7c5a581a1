//! CLI entry point for searching pi for a target image

use clap::Parser;
use pifind::io::cli::{Cli, SearchRunner};

fn main() -> pifind::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let runner = SearchRunner::new(cli);
    runner.process()
}
