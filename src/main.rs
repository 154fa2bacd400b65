use clap::Parser;
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use swaylink::SwayClient;
use swaylink::cli::args::{Cli, Commands};
use swaylink::cli::{query, run, watch};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    let client = match &cli.socket {
        Some(path) => SwayClient::connect_to(path.clone()).await,
        None => SwayClient::connect().await,
    }
    .context("failed to connect to the compositor")?;

    let result = match cli.command {
        Commands::Workspaces => query::workspaces(&client, cli.json).await,
        Commands::Outputs => query::outputs(&client, cli.json).await,
        Commands::Version => query::version(&client, cli.json).await,
        Commands::Run { command } => run::run(&client, &command, cli.json).await,
        Commands::Watch { events } => watch::watch(&client, &events).await,
    };

    client.shutdown().await;
    result.map_err(Into::into)
}
