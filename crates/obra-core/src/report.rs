//! Tabular budget reports
//!
//! Projects analysis results into rows of formatted cells, ready for console
//! output, CSV/JSON export, or inclusion in an advisory prompt. Nothing here
//! recomputes an `AnalysisResult`'s totals; the TOTAL row copies them.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, Result};
use crate::models::{AnalysisResult, AnalyzedLine, LineItem};

/// Label of the synthetic aggregate row
pub const TOTAL_LABEL: &str = "TOTAL";

/// Currency prefix used for formatted money values
pub const CURRENCY_SYMBOL: &str = "R$";

/// Report columns, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Item,
    Quantity,
    UnitPrice,
    ReferencePrice,
    Subtotal,
    PotentialSaving,
    Status,
}

impl Column {
    /// Column header as written to exports
    pub fn header(&self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::Quantity => "Quantity",
            Self::UnitPrice => "Unit Price",
            Self::ReferencePrice => "Reference Price",
            Self::Subtotal => "Subtotal",
            Self::PotentialSaving => "Potential Saving",
            Self::Status => "Status",
        }
    }

    /// Columns of the full analysis table
    pub fn full() -> &'static [Column] {
        &[
            Self::Item,
            Self::Quantity,
            Self::UnitPrice,
            Self::ReferencePrice,
            Self::Subtotal,
            Self::PotentialSaving,
            Self::Status,
        ]
    }

    /// Columns of the simple table (no reference comparison)
    pub fn simple() -> &'static [Column] {
        &[Self::Item, Self::Quantity, Self::UnitPrice, Self::Subtotal]
    }

    fn is_left_aligned(&self) -> bool {
        matches!(self, Self::Item | Self::Status)
    }
}

/// One report row: a column → formatted value mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: BTreeMap<Column, String>,
}

impl Row {
    fn with(mut self, column: Column, value: impl Into<String>) -> Self {
        self.cells.insert(column, value.into());
        self
    }

    /// Formatted value of a column; empty when the row leaves it blank
    pub fn get(&self, column: Column) -> &str {
        self.cells.get(&column).map(String::as_str).unwrap_or("")
    }

    pub fn is_total(&self) -> bool {
        self.get(Column::Item) == TOTAL_LABEL
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column.header(), value)?;
        }
        map.end()
    }
}

/// A rendered table: ordered columns plus rows, the last one being TOTAL
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(Column::header).collect()
    }

    /// All rows including the TOTAL row
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_row(&self) -> Option<&Row> {
        self.rows.last().filter(|r| r.is_total())
    }

    /// Each row as a list of cells in column order
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| self.columns.iter().map(|c| row.get(*c)).collect())
    }

    /// Render as aligned plain text
    pub fn render_text(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|c| {
                self.rows
                    .iter()
                    .map(|r| r.get(*c).chars().count())
                    .chain(std::iter::once(c.header().chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c.header(), *w, c.is_left_aligned()))
            .collect();
        out.push_str(&header.join(" │ "));
        out.push('\n');

        let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        let rule = format!("{}\n", rule.join("─┼─"));
        out.push_str(&rule);

        for row in &self.rows {
            if row.is_total() {
                out.push_str(&rule);
            }
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| pad(row.get(*c), *w, c.is_left_aligned()))
                .collect();
            out.push_str(cells.join(" │ ").trim_end());
            out.push('\n');
        }

        out
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

fn pad(value: &str, width: usize, left: bool) -> String {
    if left {
        format!("{:<width$}", value, width = width)
    } else {
        format!("{:>width$}", value, width = width)
    }
}

/// Full analysis table: one row per line plus the TOTAL row
pub fn to_table(result: &AnalysisResult) -> Table {
    let mut rows: Vec<Row> = result
        .lines
        .iter()
        .map(|line| {
            Row::default()
                .with(Column::Item, line.item_name.clone())
                .with(Column::Quantity, format_quantity(line.quantity))
                .with(Column::UnitPrice, format_amount(line.unit_price))
                .with(Column::ReferencePrice, format_amount(line.reference_price))
                .with(Column::Subtotal, format_amount(line.subtotal))
                .with(Column::PotentialSaving, format_amount(line.potential_saving))
                .with(Column::Status, line.status.label())
        })
        .collect();

    rows.push(
        Row::default()
            .with(Column::Item, TOTAL_LABEL)
            .with(Column::Quantity, "")
            .with(Column::UnitPrice, "")
            .with(Column::ReferencePrice, "")
            .with(Column::Subtotal, format_amount(result.total_subtotal))
            .with(
                Column::PotentialSaving,
                format_amount(result.total_potential_saving),
            )
            .with(Column::Status, ""),
    );

    Table {
        columns: Column::full().to_vec(),
        rows,
    }
}

/// Simple table for budgets saved without reference analysis
///
/// Prices are rendered as currency strings. There is no `AnalysisResult`
/// here, so subtotals and the total are computed from the lines, with the
/// same range checks the analyzer applies.
pub fn to_simple_table(items: &[LineItem]) -> Result<Table> {
    let total = budget_total(items)?;
    let mut rows = Vec::with_capacity(items.len() + 1);

    for (index, item) in items.iter().enumerate() {
        let subtotal = item
            .subtotal()
            .ok_or_else(|| Error::amount_out_of_range(index, &item.item_name))?;
        rows.push(
            Row::default()
                .with(Column::Item, item.item_name.clone())
                .with(Column::Quantity, format_quantity(item.quantity))
                .with(Column::UnitPrice, format_currency(item.unit_price))
                .with(Column::Subtotal, format_currency(subtotal)),
        );
    }

    rows.push(
        Row::default()
            .with(Column::Item, TOTAL_LABEL)
            .with(Column::Quantity, "")
            .with(Column::UnitPrice, "")
            .with(Column::Subtotal, format_currency(total)),
    );

    Ok(Table {
        columns: Column::simple().to_vec(),
        rows,
    })
}

/// Exact sum of line subtotals, for budgets without an `AnalysisResult`
pub fn budget_total(items: &[LineItem]) -> Result<Decimal> {
    items
        .iter()
        .enumerate()
        .try_fold(Decimal::ZERO, |total, (index, item)| {
            item.subtotal()
                .and_then(|subtotal| total.checked_add(subtotal))
                .ok_or_else(|| Error::amount_out_of_range(index, &item.item_name))
        })
}

/// Budget lines as prompt text: `- Cimento: 50 x R$ 35.00 = R$ 1750.00`
pub fn format_budget_lines(lines: &[AnalyzedLine]) -> String {
    lines
        .iter()
        .map(|line| {
            format!(
                "- {}: {} x {} = {}\n",
                line.item_name,
                format_quantity(line.quantity),
                format_currency(line.unit_price),
                format_currency(line.subtotal)
            )
        })
        .collect()
}

/// Round to two decimal places: `1750` → `1750.00`
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}

/// Money with currency symbol: `R$ 35.00`
pub fn format_currency(value: Decimal) -> String {
    format!("{} {}", CURRENCY_SYMBOL, format_amount(value))
}

/// Money with thousands separators: `R$ 2,250.00`
pub fn format_currency_grouped(value: Decimal) -> String {
    let amount = format_amount(value);
    let (sign, unsigned) = match amount.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", amount.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{} {}{}.{}", CURRENCY_SYMBOL, sign, grouped, frac_part)
}

/// Quantity without trailing zeros: `50.000` → `50`
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}
