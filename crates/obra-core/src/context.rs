//! Context Assembler
//!
//! Gathers the catalog data an advisory prompt needs: for every budget item,
//! the first matching reference entry with its price and first savings tip.

use crate::catalog::Catalog;
use crate::matcher::Matcher;
use crate::models::{AnalysisResult, CatalogEntry, LineItem};
use crate::report::{format_budget_lines, format_currency, format_currency_grouped};

/// Text used when no item matched the catalog
pub const NO_REFERENCE_DATA: &str = "No specific reference data found.";

/// Assembled context for advisory prompts
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetContext {
    /// Budget lines, one per item
    pub budget: String,
    /// Grouped grand total
    pub total: String,
    /// Reference snippets, or [`NO_REFERENCE_DATA`]
    pub reference: String,
    /// Comma-separated names of above-market items (may be empty)
    pub above_market: String,
}

/// Builds prompt context from the catalog
#[derive(Debug, Clone, Copy)]
pub struct ContextAssembler<'a> {
    matcher: Matcher<'a>,
}

impl<'a> ContextAssembler<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            matcher: Matcher::new(catalog),
        }
    }

    /// Reference snippets for a list of item names
    ///
    /// One `• name: R$ price - tip` line per matched item, in item order.
    pub fn reference_context<S: AsRef<str>>(&self, item_names: &[S]) -> String {
        let mut text = String::new();
        for name in item_names {
            if let Some(entry) = self.matcher.find(name.as_ref()) {
                text.push_str(&reference_snippet(entry));
                text.push('\n');
            }
        }

        if text.is_empty() {
            NO_REFERENCE_DATA.to_string()
        } else {
            text.trim_end().to_string()
        }
    }

    /// Full context for a budget analysis prompt
    pub fn budget_context(&self, items: &[LineItem], result: &AnalysisResult) -> BudgetContext {
        let names: Vec<&str> = items.iter().map(|i| i.item_name.as_str()).collect();
        let above_market: Vec<&str> = result.above_market().map(|l| l.item_name.as_str()).collect();

        BudgetContext {
            budget: format_budget_lines(&result.lines),
            total: format_currency_grouped(result.total_subtotal),
            reference: self.reference_context(&names),
            above_market: above_market.join(", "),
        }
    }
}

/// `• Cimento CPII: R$ 30.00 - Buy by the pallet`
pub fn reference_snippet(entry: &CatalogEntry) -> String {
    let mut snippet = format!("• {}: {}", entry.name, format_currency(entry.reference_price));
    if let Some(tip) = entry.first_tip() {
        snippet.push_str(" - ");
        snippet.push_str(tip);
    }
    snippet
}
