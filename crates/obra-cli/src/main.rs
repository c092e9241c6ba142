//! Obra CLI - Construction budget analyzer
//!
//! Usage:
//!   obra analyze --budget orcamento.json   Analyze a budget (table + advisory)
//!   obra lookup Cimento                   Show the reference entry for an item
//!   obra export --budget orcamento.csv    Write XLSX/CSV/JSON export files
//!   obra shell --budget orcamento.json    Interactive consultation session

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so stdout stays machine-readable (`analyze --json`)
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let config = commands::load_config(cli.config.as_deref(), cli.catalog.as_deref())?;

    match cli.command {
        Commands::Analyze {
            budget,
            no_advice,
            save,
            format,
            out,
            json,
        } => {
            let opts = commands::AnalyzeOptions {
                advice: !no_advice,
                save,
                format,
                out,
                json,
            };
            commands::cmd_analyze(&config, &budget, &opts, &mut std::io::stdout()).await
        }
        Commands::Lookup { item } => commands::cmd_lookup(&config, &item),
        Commands::Consult { item } => commands::cmd_consult(&config, &item).await,
        Commands::Catalog => commands::cmd_catalog(&config),
        Commands::Export {
            budget,
            simple,
            no_advice,
            format,
            out,
            name,
        } => {
            let opts = commands::ExportOptions {
                simple,
                advice: !no_advice,
                format,
                out,
                name,
            };
            commands::cmd_export(&config, &budget, &opts).await
        }
        Commands::Shell { budget, out } => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            commands::cmd_shell(&config, &budget, out.as_deref(), stdin)
                .await
                .map(|_| ())
        }
        Commands::Ai => commands::cmd_ai(&config).await,
    }
}
