use agent_memory_gateway::{cli, infra};
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    infra::logging::init();

    let args = cli::Cli::parse();
    cli::run_commands(args.command.unwrap_or(cli::Commands::Serve)).await
}
