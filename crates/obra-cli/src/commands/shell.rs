//! Interactive session command
//!
//! The budget is analyzed once at startup; each input line is then either a
//! save command, a quit command, or an item consultation. A failing command is
//! reported and the loop continues.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use obra_core::{AnalysisResult, Analyzer, AppConfig, ExportFormat};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use super::analyze::print_analysis;
use super::core::{exporter, open_advisor, open_budget, open_catalog};

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Export the budget lines only
    SaveSimple,
    /// Export analysis, advisory and references as one workbook
    SaveFull,
    Quit,
    Empty,
    /// Anything else: ask about an item
    Consult(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Self::Empty,
            "quit" | "exit" | "sair" => Self::Quit,
            "save simple" | "salvar simples" => Self::SaveSimple,
            "save full" | "salvar completo" => Self::SaveFull,
            _ => Self::Consult(trimmed.to_string()),
        }
    }
}

/// What happened during a session
#[derive(Debug, Default)]
pub struct ShellSummary {
    pub consultations: usize,
    pub saved: Vec<PathBuf>,
    pub errors: usize,
}

/// Run the interactive loop over `input` until quit or end of input
pub async fn cmd_shell<R>(
    config: &AppConfig,
    budget: &Path,
    out: Option<&Path>,
    input: R,
) -> Result<ShellSummary>
where
    R: AsyncBufRead + Unpin,
{
    let catalog = open_catalog(config)?;
    let items = open_budget(budget)?;
    let analyzer = Analyzer::new(&catalog);
    let exporter = exporter(config, out);
    let advisor = open_advisor(config);

    // An invalid budget still allows consultations and simple saves
    let result: Option<AnalysisResult> = match analyzer.analyze(&items) {
        Ok(result) => {
            print_analysis(&mut std::io::stdout(), &result)?;
            Some(result)
        }
        Err(e) => {
            println!("❌ {}", e);
            None
        }
    };

    println!("\nCommands: 'save simple', 'save full', 'quit', or ask about an item");

    let mut summary = ShellSummary::default();
    let mut lines = input.lines();

    loop {
        print!("\n> ");
        let _ = std::io::stdout().flush();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ShellCommand::parse(&line) {
            ShellCommand::Empty => continue,
            ShellCommand::Quit => break,
            ShellCommand::SaveSimple => {
                match exporter.export_simple(&items, ExportFormat::Csv, None) {
                    Ok(path) => {
                        println!("💾 Saved {}", path.display());
                        summary.saved.push(path);
                    }
                    Err(e) => {
                        println!("❌ {}", e);
                        summary.errors += 1;
                    }
                }
            }
            ShellCommand::SaveFull => {
                let Some(ref result) = result else {
                    println!("❌ The budget has invalid lines; only 'save simple' is available");
                    summary.errors += 1;
                    continue;
                };

                let advisory = match advisor {
                    Some(ref advisor) => advisor
                        .advise_budget(&catalog, &items, result)
                        .await
                        .map_err(|e| warn!(error = %e, "Saving without advisory"))
                        .ok(),
                    None => None,
                };

                let saved = exporter.export_full(
                    result,
                    advisory.as_deref(),
                    &catalog,
                    ExportFormat::Xlsx,
                    None,
                );
                match saved {
                    Ok(paths) => {
                        for path in paths {
                            println!("💾 Saved {}", path.display());
                            summary.saved.push(path);
                        }
                    }
                    Err(e) => {
                        println!("❌ {}", e);
                        summary.errors += 1;
                    }
                }
            }
            ShellCommand::Consult(question) => {
                let Some(ref advisor) = advisor else {
                    println!("❌ No AI backend configured");
                    summary.errors += 1;
                    continue;
                };
                match advisor.consult_item(&catalog, &question).await {
                    Ok(text) => {
                        println!("{}", text);
                        summary.consultations += 1;
                    }
                    Err(e) => {
                        println!("❌ {}", e);
                        summary.errors += 1;
                    }
                }
            }
        }
    }

    Ok(summary)
}
