//! Budget file parsers
//!
//! A budget is a list of [`LineItem`]s read from JSON or CSV. Only the shape of
//! the file is checked here; the analyzer validates quantities and prices.
//!
//! JSON: an array of `{"itemName", "quantity", "unitPrice"}` objects.
//! CSV: a header row naming `item`, `quantity` and `unit_price` columns
//! (any order, aliases accepted), one line item per row.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::LineItem;

const ITEM_HEADERS: &[&str] = &["item", "item_name", "itemname", "name"];
const QUANTITY_HEADERS: &[&str] = &["quantity", "quantidade", "qty"];
const PRICE_HEADERS: &[&str] = &["unit_price", "unitprice", "price", "preco"];

/// Load a budget from a `.json` or `.csv` file
pub fn load_budget(path: &Path) -> Result<Vec<LineItem>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let file = File::open(path)?;
    let items = match extension.as_str() {
        "json" => parse_budget_json(file)?,
        "csv" => parse_budget_csv(file)?,
        other => {
            return Err(Error::InvalidData(format!(
                "unsupported budget file type '{}' for {} (expected .json or .csv)",
                other,
                path.display()
            )))
        }
    };

    info!(path = %path.display(), items = items.len(), "Loaded budget");
    Ok(items)
}

/// Parse a JSON array of line items
pub fn parse_budget_json<R: Read>(reader: R) -> Result<Vec<LineItem>> {
    serde_json::from_reader(reader)
        .map_err(|e| Error::InvalidData(format!("invalid budget JSON: {}", e)))
}

/// Parse a CSV budget with a header row
pub fn parse_budget_csv<R: Read>(reader: R) -> Result<Vec<LineItem>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let item_col = find_column(&headers, ITEM_HEADERS)?;
    let quantity_col = find_column(&headers, QUANTITY_HEADERS)?;
    let price_col = find_column(&headers, PRICE_HEADERS)?;

    let mut items = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        // row numbers are 1-based and skip the header
        let line = row + 2;
        let name = record.get(item_col).unwrap_or("").to_string();
        let quantity = parse_decimal(record.get(quantity_col), "quantity", line)?;
        let unit_price = parse_decimal(record.get(price_col), "unit_price", line)?;
        items.push(LineItem::new(name, quantity, unit_price));
    }

    debug!(items = items.len(), "Parsed CSV budget");
    Ok(items)
}

fn find_column(headers: &StringRecord, candidates: &[&str]) -> Result<usize> {
    headers
        .iter()
        .position(|h| candidates.contains(&h.trim().to_lowercase().as_str()))
        .ok_or_else(|| {
            Error::InvalidData(format!(
                "budget CSV is missing a '{}' column",
                candidates[0]
            ))
        })
}

fn parse_decimal(value: Option<&str>, field: &str, line: usize) -> Result<Decimal> {
    let raw = value.unwrap_or("").trim();
    Decimal::from_str(raw).map_err(|_| {
        Error::InvalidData(format!("line {}: invalid {} '{}'", line, field, raw))
    })
}
