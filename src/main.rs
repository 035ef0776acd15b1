mod cli;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    ensemble::logger::init_logger();

    let cli = Cli::parse();
    cli::run(cli).await
}
