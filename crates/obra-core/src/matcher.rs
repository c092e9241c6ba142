//! Tag matcher
//!
//! Finds the catalog entry for a free-text item name. An entry matches when
//! one of its tags is a substring of the lower-cased query, or the query is a
//! substring of the tag. Entries are scanned in catalog order and the first
//! match wins, even when a later entry would be a closer fit.

use tracing::debug;

use crate::catalog::Catalog;
use crate::models::CatalogEntry;

/// Matches item names against a borrowed catalog
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    catalog: &'a Catalog,
}

impl<'a> Matcher<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Find the first catalog entry whose tags overlap the query
    pub fn find(&self, query: &str) -> Option<&'a CatalogEntry> {
        // An empty string is a substring of every tag
        if query.trim().is_empty() {
            return None;
        }
        let query = query.to_lowercase();

        let found = self
            .catalog
            .iter()
            .find(|entry| entry.tags.iter().any(|tag| tag_matches(tag, &query)));

        match found {
            Some(entry) => debug!(query = %query, entry = %entry.name, "Matched catalog entry"),
            None => debug!(query = %query, "No catalog entry matched"),
        }

        found
    }
}

/// Substring test in both directions; blank tags never match
fn tag_matches(tag: &str, query: &str) -> bool {
    if tag.trim().is_empty() {
        return false;
    }
    query.contains(tag) || tag.contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json_str(
            r#"[
                {"name": "Cimento CPII", "referencePrice": 30.0, "tags": ["cimento", "cpii"]},
                {"name": "Cimento branco", "referencePrice": 55.0, "tags": ["cimento", "branco"]},
                {"name": "Areia media", "referencePrice": 120.0, "tags": ["areia"]},
                {"name": "Blank", "referencePrice": 1.0, "tags": ["", "   "]},
                {"name": "Bloco ceramico", "referencePrice": 0.55, "tags": ["bloco ceramico", "tijolo"]}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_query_never_matches() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog);
        assert!(matcher.find("").is_none());
        assert!(matcher.find("   ").is_none());
    }

    #[test]
    fn test_exact_first_tag_matches() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog);
        for entry in catalog.iter().filter(|e| e.name != "Blank") {
            let found = matcher.find(&entry.tags[0]).unwrap();
            // Cimento branco shares its first tag with the earlier Cimento CPII
            if entry.name == "Cimento branco" {
                assert_eq!(found.name, "Cimento CPII");
            } else {
                assert_eq!(found.name, entry.name);
            }
        }
    }

    #[test]
    fn test_first_match_wins() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog);
        for _ in 0..3 {
            assert_eq!(matcher.find("cimento").unwrap().name, "Cimento CPII");
        }
        // "branco" only appears on the second entry, but the query also
        // contains "cimento", which the first entry already matches
        assert_eq!(
            matcher.find("Cimento branco 25kg").unwrap().name,
            "Cimento CPII"
        );
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog);
        assert_eq!(matcher.find("AREIA").unwrap().name, "Areia media");
    }

    #[test]
    fn test_tag_contained_in_query() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog);
        assert_eq!(
            matcher.find("Areia lavada fina").unwrap().name,
            "Areia media"
        );
    }

    #[test]
    fn test_query_contained_in_tag() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog);
        assert_eq!(matcher.find("bloco").unwrap().name, "Bloco ceramico");
    }

    #[test]
    fn test_blank_tags_ignored() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog);
        assert!(matcher.find("telha").is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(Matcher::new(&catalog).find("cimento").is_none());
    }
}
