//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use obra_core::ExportFormat;

/// Obra - Compare construction budgets against reference prices
#[derive(Parser)]
#[command(name = "obra")]
#[command(about = "Construction budget analyzer with reference prices and savings advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.local/share/obra/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Reference catalog JSON (overrides config and OBRA_CATALOG)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a budget against the reference catalog
    Analyze {
        /// Budget file (.json or .csv)
        #[arg(short, long)]
        budget: PathBuf,

        /// Skip the AI advisory text
        #[arg(long)]
        no_advice: bool,

        /// Also export the analysis (table, advisory, references)
        #[arg(long)]
        save: bool,

        /// Export format: xlsx, csv, json
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Output directory for --save (defaults to config output_dir)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the analysis as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Look up the reference entry for an item (offline)
    Lookup {
        /// Item name, e.g. "Cimento"
        item: String,
    },

    /// Ask the AI backend about a single item
    Consult {
        /// Item name or question
        item: String,
    },

    /// List the reference catalog
    Catalog,

    /// Export a budget to XLSX, CSV or JSON files
    Export {
        /// Budget file (.json or .csv)
        #[arg(short, long)]
        budget: PathBuf,

        /// Export the budget lines only, without reference analysis
        #[arg(long)]
        simple: bool,

        /// Skip the AI advisory text
        #[arg(long)]
        no_advice: bool,

        /// Export format: xlsx, csv, json
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Output directory (defaults to config output_dir)
        #[arg(long)]
        out: Option<PathBuf>,

        /// File name stem (defaults to a timestamped name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Interactive session: consult items and save the budget
    ///
    /// Commands: "save simple", "save full", "quit". Anything else is sent
    /// to the AI backend as an item consultation.
    Shell {
        /// Budget file (.json or .csv)
        #[arg(short, long)]
        budget: PathBuf,

        /// Output directory for saves (defaults to config output_dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show the configured AI backend and check its availability
    Ai,
}
