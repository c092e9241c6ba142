//! Catalog listing and lookup commands

use anyhow::Result;
use obra_core::report::format_currency;
use obra_core::{AppConfig, Matcher};

use super::core::open_catalog;
use super::truncate;

/// List every catalog entry
pub fn cmd_catalog(config: &AppConfig) -> Result<()> {
    let catalog = open_catalog(config)?;

    if catalog.is_empty() {
        println!("Catalog {} is empty.", config.catalog.display());
        return Ok(());
    }

    println!("Reference catalog ({} entries):\n", catalog.len());
    println!("{:<36} {:>12}  {}", "NAME", "REFERENCE", "TAGS");
    println!("{}", "-".repeat(80));

    for entry in &catalog {
        println!(
            "{:<36} {:>12}  {}",
            truncate(&entry.name, 36),
            format_currency(entry.reference_price),
            truncate(&entry.tags.join(", "), 28)
        );
    }

    Ok(())
}

/// Show the first catalog entry matching an item name
pub fn cmd_lookup(config: &AppConfig, item: &str) -> Result<()> {
    let catalog = open_catalog(config)?;

    match Matcher::new(&catalog).find(item) {
        Some(entry) => {
            println!("🔎 {} → {}", item.trim(), entry.name);
            println!("   Reference price: {}", format_currency(entry.reference_price));
            println!("   Tags: {}", entry.tags.join(", "));
            if !entry.savings_tips.is_empty() {
                println!("   Savings tips:");
                for tip in &entry.savings_tips {
                    println!("   • {}", tip);
                }
            }
        }
        None => println!("No reference data found for \"{}\".", item.trim()),
    }

    Ok(())
}
