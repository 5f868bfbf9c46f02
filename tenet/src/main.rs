// tenet/src/main.rs

mod cli;
mod commands;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug tenet execute ... to see the details
    tracing_subscriber::fmt::init();

    let args = cli::Cli::parse();
    match args.command {
        cli::Commands::Execute(execute_args) => commands::execute::run(execute_args).await,
        cli::Commands::Profile(profile_args) => commands::profile::run(profile_args),
    }
}
