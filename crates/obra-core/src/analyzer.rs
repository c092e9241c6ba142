//! Budget analyzer
//!
//! Compares each budget line with its catalog reference and aggregates the
//! results. Lines are independent of each other; the output keeps input order.
//!
//! Savings are only computed for lines with a positive reference price. A
//! line without a catalog match never contributes to the savings total and is
//! never flagged, however high its price.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::matcher::Matcher;
use crate::models::{AnalysisResult, AnalyzedLine, LineItem, LineStatus};

/// Analyzes budgets against a borrowed catalog
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    matcher: Matcher<'a>,
}

impl<'a> Analyzer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            matcher: Matcher::new(catalog),
        }
    }

    /// Analyze a budget
    ///
    /// Every line is validated before any result is built, so an invalid
    /// line yields an error and no partial result. Amounts that do not fit a
    /// `Decimal` are invalid lines too.
    pub fn analyze(&self, items: &[LineItem]) -> Result<AnalysisResult> {
        for (index, item) in items.iter().enumerate() {
            validate_line(index, item)?;
        }

        let lines = items
            .iter()
            .enumerate()
            .map(|(index, item)| self.analyze_line(index, item))
            .collect::<Result<Vec<AnalyzedLine>>>()?;

        let total_subtotal = checked_total(&lines, |l| l.subtotal)?;
        let total_potential_saving = checked_total(&lines, |l| l.potential_saving)?;

        let result = AnalysisResult {
            lines,
            total_subtotal,
            total_potential_saving,
        };

        info!(
            lines = result.lines.len(),
            matched = result.matched_count(),
            total = %result.total_subtotal,
            saving = %result.total_potential_saving,
            "Budget analyzed"
        );

        Ok(result)
    }

    fn analyze_line(&self, index: usize, item: &LineItem) -> Result<AnalyzedLine> {
        let out_of_range = || Error::amount_out_of_range(index, &item.item_name);

        let subtotal = item.subtotal().ok_or_else(out_of_range)?;
        let matched = self.matcher.find(&item.item_name);
        let reference_price = matched.map(|e| e.reference_price).unwrap_or(Decimal::ZERO);
        let has_reference = reference_price > Decimal::ZERO;

        let potential_saving = if has_reference {
            item.unit_price
                .checked_sub(reference_price)
                .and_then(|diff| diff.checked_mul(item.quantity))
                .ok_or_else(out_of_range)?
        } else {
            Decimal::ZERO
        };

        let status = if has_reference && item.unit_price > reference_price {
            LineStatus::AboveMarket
        } else {
            LineStatus::Normal
        };

        debug!(
            item = %item.item_name,
            reference = %reference_price,
            saving = %potential_saving,
            status = status.as_str(),
            "Analyzed line"
        );

        Ok(AnalyzedLine {
            item_name: item.item_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal,
            reference_price,
            potential_saving,
            status,
            matched_entry: matched.map(|e| e.name.clone()),
        })
    }
}

/// Exact sum of one amount over all lines; overflow names the line that tipped it
fn checked_total(
    lines: &[AnalyzedLine],
    amount: impl Fn(&AnalyzedLine) -> Decimal,
) -> Result<Decimal> {
    lines
        .iter()
        .enumerate()
        .try_fold(Decimal::ZERO, |total, (index, line)| {
            total
                .checked_add(amount(line))
                .ok_or_else(|| Error::amount_out_of_range(index, &line.item_name))
        })
}

fn validate_line(index: usize, item: &LineItem) -> Result<()> {
    let reason = if item.quantity <= Decimal::ZERO {
        format!("quantity must be greater than zero, got {}", item.quantity)
    } else if item.unit_price < Decimal::ZERO {
        format!("unit price must not be negative, got {}", item.unit_price)
    } else {
        return Ok(());
    };

    Err(Error::InvalidLineItem {
        index,
        item: item.item_name.clone(),
        reason,
    })
}
