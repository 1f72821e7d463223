mod cli;
mod commands;
mod config;
mod mcp;
mod page_range;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout belongs to command output and the MCP transport
    let default_filter = if cli.verbose {
        "pdfsplit=debug"
    } else {
        "pdfsplit=warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server(cli.config).await?;
        }
        Commands::Parse {
            ranges,
            total,
            json,
        } => {
            commands::parse::run(&ranges, total, json)?;
        }
        Commands::Format { pages } => {
            commands::format::run(&pages);
        }
        Commands::Examples => {
            commands::examples::run();
        }
        Commands::Split {
            path,
            ranges,
            output,
        } => {
            commands::split::run(&path, &ranges, output.as_deref(), &cli.config)?;
        }
    }

    Ok(())
}
