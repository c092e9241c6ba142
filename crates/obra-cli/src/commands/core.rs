//! Shared utilities for command implementations
//!
//! This module contains:
//! - `load_config` - Resolve config file, environment and CLI overrides
//! - `open_catalog` - Load the reference catalog
//! - `open_budget` - Load a budget file
//! - `open_advisor` - Build the advisory backend when one is configured
//! - `exporter` - Exporter for the chosen output directory

use std::path::Path;

use anyhow::{Context, Result};
use obra_core::{load_budget, Advisor, AppConfig, Catalog, Exporter, LineItem};
use tracing::debug;

/// Load config, then apply the global `--catalog` override
pub fn load_config(config_path: Option<&Path>, catalog: Option<&Path>) -> Result<AppConfig> {
    let mut config = AppConfig::load(config_path).context("Failed to load config")?;
    if let Some(path) = catalog {
        config.catalog = path.to_path_buf();
    }
    debug!(
        catalog = %config.catalog.display(),
        backend = %config.ai.backend,
        "Configuration resolved"
    );
    Ok(config)
}

pub fn open_catalog(config: &AppConfig) -> Result<Catalog> {
    Catalog::load(&config.catalog)
        .with_context(|| format!("Failed to load catalog {}", config.catalog.display()))
}

pub fn open_budget(path: &Path) -> Result<Vec<LineItem>> {
    load_budget(path).with_context(|| format!("Failed to read budget {}", path.display()))
}

/// Advisory backend, or None (with a hint) when nothing is configured
pub fn open_advisor(config: &AppConfig) -> Option<Advisor> {
    match Advisor::from_config(&config.ai) {
        Ok(advisor) => Some(advisor),
        Err(e) => {
            eprintln!("   💡 {}", e);
            eprintln!("   💡 Tip: Set OPENAI_API_KEY, OPENAI_COMPATIBLE_HOST or OLLAMA_HOST for AI advice");
            None
        }
    }
}

/// Exporter writing to `out`, or to the configured output directory
pub fn exporter(config: &AppConfig, out: Option<&Path>) -> Exporter {
    Exporter::new(out.unwrap_or(&config.output_dir))
}
