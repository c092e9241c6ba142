//! Reference price catalog
//!
//! The catalog is a JSON array of records loaded once at startup and never
//! mutated afterwards. Each record needs a `name` and a list of `tags`;
//! `referencePrice` defaults to zero and `savingsTips` to an empty list.
//!
//! Field names from older data files (`item`, `preco_referencia`,
//! `dicas_economia`) are accepted as aliases.
//!
//! A single malformed record aborts the whole load.

use std::fs;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::CatalogEntry;

/// Raw record as it appears in the catalog file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogRecord {
    #[serde(alias = "item")]
    name: String,
    #[serde(default, alias = "preco_referencia", alias = "reference_price")]
    reference_price: Option<Decimal>,
    tags: Vec<String>,
    #[serde(default, alias = "dicas_economia", alias = "savings_tips")]
    savings_tips: Vec<String>,
}

impl CatalogRecord {
    fn into_entry(self, index: usize) -> Result<CatalogEntry> {
        let reference_price = self.reference_price.unwrap_or(Decimal::ZERO);
        if reference_price < Decimal::ZERO {
            return Err(Error::DataLoad(format!(
                "record #{} ({}): referencePrice must not be negative, got {}",
                index, self.name, reference_price
            )));
        }

        Ok(CatalogEntry {
            name: self.name,
            reference_price,
            tags: self.tags.iter().map(|t| t.to_lowercase()).collect(),
            savings_tips: self.savings_tips,
        })
    }
}

/// Immutable, ordered table of reference entries
///
/// Share it by reference (or behind an `Arc`) between analyses. To pick up a
/// changed file, load a new `Catalog` and swap it in.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::DataLoad(format!("failed to read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            entries = catalog.len(),
            "Loaded reference catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog from any reader producing JSON
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| Error::DataLoad(format!("failed to read catalog: {}", e)))?;
        Self::from_json_str(&content)
    }

    /// Parse a catalog from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<CatalogRecord> = serde_json::from_str(json)
            .map_err(|e| Error::DataLoad(format!("malformed catalog: {}", e)))?;

        let entries = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_entry(i))
            .collect::<Result<Vec<_>>>()?;

        debug!(entries = entries.len(), "Parsed catalog records");
        Ok(Self { entries })
    }

    /// Build a catalog from already-constructed entries
    ///
    /// Tags are lower-cased the same way as when loading from JSON.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|mut e| {
                e.tags = e.tags.iter().map(|t| t.to_lowercase()).collect();
                e
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in load order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_records() {
        let json = r#"[
            {"name": "Cimento CPII 50kg", "referencePrice": 30.0,
             "tags": ["Cimento", "CPII"], "savingsTips": ["Buy by the pallet"]},
            {"name": "Areia media", "referencePrice": 120.5, "tags": ["areia"]}
        ]"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 2);

        let cimento = catalog.get(0).unwrap();
        assert_eq!(cimento.name, "Cimento CPII 50kg");
        assert_eq!(cimento.reference_price, "30".parse::<Decimal>().unwrap());
        assert_eq!(cimento.tags, vec!["cimento", "cpii"]);
        assert_eq!(cimento.first_tip(), Some("Buy by the pallet"));

        let areia = catalog.get(1).unwrap();
        assert!(areia.savings_tips.is_empty());
        assert_eq!(areia.first_tip(), None);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"[{"name": "Brita", "tags": ["brita"]}]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let entry = catalog.get(0).unwrap();
        assert_eq!(entry.reference_price, Decimal::ZERO);
        assert!(entry.savings_tips.is_empty());
    }

    #[test]
    fn test_legacy_field_aliases() {
        let json = r#"[{
            "item": "Bloco ceramico",
            "preco_referencia": 0.55,
            "tags": ["bloco", "tijolo"],
            "dicas_economia": ["Compare 9 and 14 cm blocks"]
        }]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let entry = catalog.get(0).unwrap();
        assert_eq!(entry.name, "Bloco ceramico");
        assert_eq!(entry.reference_price, "0.55".parse::<Decimal>().unwrap());
        assert_eq!(entry.savings_tips.len(), 1);
    }

    #[test]
    fn test_missing_name_fails() {
        let json = r#"[{"tags": ["cimento"], "referencePrice": 30}]"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::DataLoad(_)));
    }

    #[test]
    fn test_missing_tags_fails() {
        let json = r#"[{"name": "Cimento"}]"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(Error::DataLoad(_))
        ));
    }

    #[test]
    fn test_not_an_array_fails() {
        let json = r#"{"name": "Cimento", "tags": ["cimento"]}"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(Error::DataLoad(_))
        ));
    }

    #[test]
    fn test_one_bad_record_aborts_load() {
        let json = r#"[
            {"name": "Cimento", "tags": ["cimento"]},
            {"name": "Areia", "tags": "areia"}
        ]"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(Error::DataLoad(_))
        ));
    }

    #[test]
    fn test_negative_price_fails() {
        let json = r#"[{"name": "Cimento", "tags": ["cimento"], "referencePrice": -1}]"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("must not be negative"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, Error::DataLoad(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Cimento", "tags": ["cimento"], "referencePrice": 30}}]"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.iter().next().unwrap().name, "Cimento");
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_json_str("[]").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_from_entries_lowercases_tags() {
        let catalog = Catalog::from_entries(vec![CatalogEntry {
            name: "Cimento".into(),
            reference_price: Decimal::ZERO,
            tags: vec!["CIMENTO".into()],
            savings_tips: vec![],
        }]);
        assert_eq!(catalog.entries()[0].tags, vec!["cimento"]);
    }
}
