//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, catalog, budget, advisor, exporter)
//! - `analyze` - Budget analysis and its terminal output
//! - `catalog` - Catalog listing and offline lookup
//! - `advice` - AI consultation and backend status
//! - `export` - XLSX / CSV / JSON export
//! - `shell` - Interactive session

pub mod advice;
pub mod analyze;
pub mod catalog;
pub mod core;
pub mod export;
pub mod shell;

// Re-export command functions for main.rs
pub use advice::*;
pub use analyze::*;
pub use catalog::*;
pub use core::*;
pub use export::*;
pub use shell::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
