//! Export command

use std::path::{Path, PathBuf};

use anyhow::Result;
use obra_core::{Analyzer, AppConfig, ExportFormat};

use super::core::{exporter, open_advisor, open_budget, open_catalog};

/// Options for `obra export`
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Budget lines only, no reference analysis
    pub simple: bool,
    /// Include advisory text in a full export
    pub advice: bool,
    pub format: ExportFormat,
    pub out: Option<PathBuf>,
    /// File name stem
    pub name: Option<String>,
}

/// Export a budget and list the written files
pub async fn cmd_export(config: &AppConfig, budget: &Path, opts: &ExportOptions) -> Result<()> {
    let items = open_budget(budget)?;
    let exporter = exporter(config, opts.out.as_deref());

    let paths = if opts.simple {
        vec![exporter.export_simple(&items, opts.format, opts.name.as_deref())?]
    } else {
        let catalog = open_catalog(config)?;
        let result = Analyzer::new(&catalog).analyze(&items)?;

        let advisory = match opts.advice.then(|| open_advisor(config)).flatten() {
            Some(advisor) => match advisor.advise_budget(&catalog, &items, &result).await {
                Ok(text) => Some(text),
                Err(e) => {
                    eprintln!("⚠️  {} (exporting without advisory)", e);
                    None
                }
            },
            None => None,
        };

        exporter.export_full(
            &result,
            advisory.as_deref(),
            &catalog,
            opts.format,
            opts.name.as_deref(),
        )?
    };

    for path in &paths {
        println!("💾 Saved {}", path.display());
    }
    Ok(())
}
