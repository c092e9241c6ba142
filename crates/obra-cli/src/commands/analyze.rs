//! Budget analysis command

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use obra_core::report::{format_currency_grouped, to_table};
use obra_core::{AnalysisResult, Analyzer, AppConfig, ExportFormat};
use serde_json::{json, Value};

use super::core::{exporter, open_advisor, open_budget, open_catalog};

/// Options for `obra analyze`
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Request advisory text from the AI backend
    pub advice: bool,
    /// Export the analysis after printing it
    pub save: bool,
    pub format: ExportFormat,
    pub out: Option<PathBuf>,
    /// Print JSON instead of the table
    pub json: bool,
}

/// Analyze a budget, writing the report to `out`
///
/// Hints, warnings and saved paths go to stderr, so with `json` set `out`
/// receives exactly one JSON document.
pub async fn cmd_analyze<W: Write>(
    config: &AppConfig,
    budget: &Path,
    opts: &AnalyzeOptions,
    out: &mut W,
) -> Result<()> {
    let catalog = open_catalog(config)?;
    let items = open_budget(budget)?;
    let result = Analyzer::new(&catalog).analyze(&items)?;

    if !opts.json {
        print_analysis(out, &result)?;
    }

    // The analysis stands on its own; a failed advisory only loses the text
    let advisory = if opts.advice {
        match open_advisor(config) {
            Some(advisor) => match advisor.advise_budget(&catalog, &items, &result).await {
                Ok(text) => Some(text),
                Err(e) => {
                    eprintln!("⚠️  {}", e);
                    None
                }
            },
            None => None,
        }
    } else {
        None
    };

    if opts.json {
        let doc = analysis_json(&result, advisory.as_deref());
        writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
    } else if let Some(ref text) = advisory {
        writeln!(out)?;
        writeln!(out, "🤖 Advisory")?;
        writeln!(out, "{}", "-".repeat(60))?;
        writeln!(out, "{}", text)?;
    }

    if opts.save {
        let paths = exporter(config, opts.out.as_deref()).export_full(
            &result,
            advisory.as_deref(),
            &catalog,
            opts.format,
            None,
        )?;
        for path in paths {
            eprintln!("💾 Saved {}", path.display());
        }
    }

    Ok(())
}

/// JSON document printed by `obra analyze --json`
pub fn analysis_json(result: &AnalysisResult, advisory: Option<&str>) -> Value {
    json!({
        "analysis": result,
        "table": to_table(result),
        "advisory": advisory,
    })
}

/// Print the analysis table with totals and above-market alerts
pub fn print_analysis<W: Write>(out: &mut W, result: &AnalysisResult) -> std::io::Result<()> {
    writeln!(
        out,
        "📊 Budget analysis ({} items, {} with reference prices)\n",
        result.lines.len(),
        result.matched_count()
    )?;
    write!(out, "{}", to_table(result).render_text())?;
    writeln!(out)?;
    writeln!(out, "Total: {}", format_currency_grouped(result.total_subtotal))?;
    writeln!(
        out,
        "Potential saving: {}",
        format_currency_grouped(result.total_potential_saving)
    )?;

    let above: Vec<&str> = result.above_market().map(|l| l.item_name.as_str()).collect();
    if !above.is_empty() {
        writeln!(out, "⚠️  Above market: {}", above.join(", "))?;
    }
    Ok(())
}
