//! Obra Core Library
//!
//! Shared functionality for the Obra construction budget analyzer:
//! - Reference price catalog loading
//! - Tag matching of budget items against the catalog
//! - Budget analysis (subtotals, potential savings, above-market flags)
//! - Report tables and money formatting
//! - Budget file parsers (JSON, CSV)
//! - Pluggable AI backends for advisory text (OpenAI-compatible, Ollama)
//! - Prompt library for customizable AI prompts
//! - XLSX / CSV / JSON export

pub mod advisor;
pub mod ai;
pub mod analyzer;
pub mod budget;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod matcher;
pub mod models;
pub mod prompts;
pub mod report;

/// Test utilities including a mock chat server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::Advisor;
pub use ai::{AIBackend, AIClient, BackendInfo, ChatRequest, MockBackend, OllamaBackend, OpenAICompatibleBackend};
pub use analyzer::Analyzer;
pub use budget::load_budget;
pub use catalog::Catalog;
pub use config::{AiConfig, AppConfig};
pub use context::{BudgetContext, ContextAssembler};
pub use error::{Error, Result};
pub use export::{ExportFormat, Exporter};
pub use matcher::Matcher;
pub use models::{AnalysisResult, AnalyzedLine, CatalogEntry, LineItem, LineStatus};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use report::{budget_total, to_simple_table, to_table, Column, Row, Table};
