//! Data models for Obra

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A reference price record from the catalog
///
/// Tags are stored lower-cased; the catalog normalizes them at load time so the
/// matcher only has to lower-case the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: String,
    pub reference_price: Decimal,
    pub tags: Vec<String>,
    pub savings_tips: Vec<String>,
}

impl CatalogEntry {
    /// First savings tip, used in reference snippets
    pub fn first_tip(&self) -> Option<&str> {
        self.savings_tips.first().map(String::as_str)
    }
}

/// A budget line as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(alias = "item", alias = "name", alias = "item_name")]
    pub item_name: String,
    #[serde(alias = "quantidade", alias = "qty")]
    pub quantity: Decimal,
    #[serde(alias = "preco", alias = "price", alias = "unit_price")]
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(item_name: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
            unit_price,
        }
    }

    /// quantity × unit price; `None` when the product does not fit a `Decimal`
    pub fn subtotal(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.unit_price)
    }
}

/// Price classification of an analyzed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineStatus {
    Normal,
    AboveMarket,
}

impl LineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::AboveMarket => "above_market",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::AboveMarket => "Above market",
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A budget line after comparison with the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedLine {
    pub item_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    /// Zero when no catalog entry matched
    pub reference_price: Decimal,
    /// Negative when the quote is below the reference price
    pub potential_saving: Decimal,
    pub status: LineStatus,
    /// Name of the matched catalog entry, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_entry: Option<String>,
}

impl AnalyzedLine {
    pub fn is_matched(&self) -> bool {
        self.matched_entry.is_some()
    }
}

/// Result of analyzing a whole budget
///
/// Totals are computed once by the analyzer; consumers read them instead of
/// summing the lines again.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub lines: Vec<AnalyzedLine>,
    pub total_subtotal: Decimal,
    pub total_potential_saving: Decimal,
}

impl AnalysisResult {
    /// Lines flagged as above market
    pub fn above_market(&self) -> impl Iterator<Item = &AnalyzedLine> {
        self.lines
            .iter()
            .filter(|l| l.status == LineStatus::AboveMarket)
    }

    pub fn matched_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_matched()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_line_item_subtotal() {
        let item = LineItem::new("Cimento", d("50"), d("35.00"));
        assert_eq!(item.subtotal(), Some(d("1750.00")));
    }

    #[test]
    fn test_line_item_subtotal_out_of_range() {
        let item = LineItem::new("Cimento", d("100000000000000000000"), d("10000000000"));
        assert_eq!(item.subtotal(), None);
    }

    #[test]
    fn test_line_item_deserialize_aliases() {
        let json = r#"{"item": "Areia", "quantidade": 10, "preco": 50.0}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.item_name, "Areia");
        assert_eq!(item.quantity, d("10"));
        assert_eq!(item.unit_price, d("50"));

        let json = r#"{"itemName": "Brita", "quantity": "8", "unitPrice": "55.00"}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.item_name, "Brita");
        assert_eq!(item.unit_price, d("55.00"));
    }

    #[test]
    fn test_line_status_serialization() {
        assert_eq!(
            serde_json::to_value(LineStatus::AboveMarket).unwrap(),
            "ABOVE_MARKET"
        );
        assert_eq!(serde_json::to_value(LineStatus::Normal).unwrap(), "NORMAL");
        assert_eq!(LineStatus::AboveMarket.to_string(), "Above market");
    }
}
