use std::collections::HashMap;

use crate::models::{Ingredient, Synonym};

/// Case-insensitive alias → canonical mapping, loaded wholesale from the
/// service. Resolution is a single lookup: canonical names are not required
/// to be aliases themselves, so there is nothing to chase and no cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymTable {
    aliases: HashMap<String, String>,
}

impl SynonymTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the service's `{alias, canonical}` entry list.
    /// On case-insensitive alias collisions the last entry wins.
    #[must_use]
    pub fn from_entries(entries: &[Synonym]) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(&entry.alias, &entry.canonical);
        }
        table
    }

    /// Build from the bulk-import shape, a flat `{alias: canonical}` map.
    #[must_use]
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let mut table = Self::new();
        for (alias, canonical) in map {
            table.insert(alias, canonical);
        }
        table
    }

    pub fn insert(&mut self, alias: &str, canonical: &str) {
        self.aliases
            .insert(alias.trim().to_lowercase(), canonical.trim().to_string());
    }

    pub fn remove(&mut self, alias: &str) -> bool {
        self.aliases.remove(&alias.trim().to_lowercase()).is_some()
    }

    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases
            .get(&alias.trim().to_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// All entries, sorted by alias for stable listing.
    #[must_use]
    pub fn entries(&self) -> Vec<Synonym> {
        let mut entries: Vec<Synonym> = self
            .aliases
            .iter()
            .map(|(alias, canonical)| Synonym {
                alias: alias.clone(),
                canonical: canonical.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.alias.cmp(&b.alias));
        entries
    }
}

/// Resolve an ingredient name to its preferred display/grouping form.
///
/// Total: any non-empty input yields a non-empty name (empty in, empty out).
/// A table hit returns the canonical form, a miss the trimmed input, both
/// with the first character capitalized.
#[must_use]
pub fn canonicalize(table: &SynonymTable, name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match table.get(trimmed) {
        Some(canonical) => capitalize_first(canonical),
        None => capitalize_first(trimmed),
    }
}

/// The "also known as" annotation, or `None` when canonicalization changes
/// nothing; no point showing "(Vodka)" next to "Vodka".
#[must_use]
pub fn display_hint(table: &SynonymTable, name: &str) -> Option<String> {
    let canonical = canonicalize(table, name);
    if canonical.to_lowercase() == name.trim().to_lowercase() {
        None
    } else {
        Some(canonical)
    }
}

/// First known ingredient matching any candidate name, in candidate order.
/// Callers pass keyword lists ranked by relevance; the first hit wins.
#[must_use]
pub fn match_ingredient<'a>(
    table: &SynonymTable,
    candidates: &[String],
    known: &'a [Ingredient],
) -> Option<&'a Ingredient> {
    for candidate in candidates {
        let canonical = canonicalize(table, candidate).to_lowercase();
        if canonical.is_empty() {
            continue;
        }
        if let Some(hit) = known.iter().find(|i| i.name.to_lowercase() == canonical) {
            return Some(hit);
        }
    }
    None
}

/// Unit-table flavor of resolution: canonical units stay as stored, misses
/// come back trimmed and lowercased ("Ounces" → "oz", "Cl" → "cl").
#[must_use]
pub fn canonical_unit(table: &SynonymTable, name: &str) -> String {
    let trimmed = name.trim();
    match table.get(trimmed) {
        Some(canonical) => canonical.to_string(),
        None => trimmed.to_lowercase(),
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SynonymTable {
        SynonymTable::from_entries(&[
            Synonym {
                alias: "white rum".to_string(),
                canonical: "Rum".to_string(),
            },
            Synonym {
                alias: "dark rum".to_string(),
                canonical: "Rum".to_string(),
            },
            Synonym {
                alias: "fresh lime juice".to_string(),
                canonical: "Lime juice".to_string(),
            },
        ])
    }

    #[test]
    fn test_canonicalize_hit() {
        assert_eq!(canonicalize(&table(), "white rum"), "Rum");
        assert_eq!(canonicalize(&table(), "  White Rum  "), "Rum");
    }

    #[test]
    fn test_canonicalize_miss_capitalizes() {
        assert_eq!(canonicalize(&table(), "vodka"), "Vodka");
        assert_eq!(canonicalize(&table(), "  triple sec "), "Triple sec");
    }

    #[test]
    fn test_canonicalize_case_insensitive() {
        let t = table();
        assert_eq!(canonicalize(&t, "VODKA"), canonicalize(&t, "vodka"));
        assert_eq!(canonicalize(&t, "Vodka"), canonicalize(&t, "vodka"));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert_eq!(canonicalize(&table(), ""), "");
        assert_eq!(canonicalize(&table(), "   "), "");
    }

    #[test]
    fn test_canonicalize_idempotent() {
        let t = table();
        for name in ["white rum", "vodka", "Lime Juice", "DARK RUM"] {
            let once = canonicalize(&t, name);
            assert_eq!(canonicalize(&t, &once), once);
        }
    }

    #[test]
    fn test_last_entry_wins_on_collision() {
        let t = SynonymTable::from_entries(&[
            Synonym {
                alias: "Gold Rum".to_string(),
                canonical: "Rum".to_string(),
            },
            Synonym {
                alias: "gold rum".to_string(),
                canonical: "Dark rum".to_string(),
            },
        ]);
        assert_eq!(t.len(), 1);
        assert_eq!(canonicalize(&t, "gold rum"), "Dark rum");
    }

    #[test]
    fn test_display_hint_on_alias() {
        assert_eq!(
            display_hint(&table(), "white rum"),
            Some("Rum".to_string())
        );
    }

    #[test]
    fn test_display_hint_suppressed_when_unchanged() {
        assert_eq!(display_hint(&table(), "Vodka"), None);
        assert_eq!(display_hint(&table(), "vodka"), None);
        assert_eq!(display_hint(&table(), " Rum "), None);
    }

    #[test]
    fn test_match_ingredient_first_hit_wins() {
        let known = vec![
            Ingredient {
                id: 1,
                name: "Rum".to_string(),
            },
            Ingredient {
                id: 2,
                name: "Lime juice".to_string(),
            },
        ];
        let candidates = vec![
            "unknown brand".to_string(),
            "fresh lime juice".to_string(),
            "white rum".to_string(),
        ];
        let hit = match_ingredient(&table(), &candidates, &known).unwrap();
        assert_eq!(hit.id, 2);
    }

    #[test]
    fn test_match_ingredient_none() {
        let known = vec![Ingredient {
            id: 1,
            name: "Rum".to_string(),
        }];
        let candidates = vec!["aperol".to_string(), String::new()];
        assert!(match_ingredient(&table(), &candidates, &known).is_none());
    }

    #[test]
    fn test_canonical_unit() {
        let units = SynonymTable::from_entries(&[
            Synonym {
                alias: "ounce".to_string(),
                canonical: "oz".to_string(),
            },
            Synonym {
                alias: "ounces".to_string(),
                canonical: "oz".to_string(),
            },
        ]);
        assert_eq!(canonical_unit(&units, "Ounces"), "oz");
        assert_eq!(canonical_unit(&units, " CL "), "cl");
    }

    #[test]
    fn test_remove_and_entries_sorted() {
        let mut t = table();
        assert!(t.remove("Dark Rum"));
        assert!(!t.remove("dark rum"));
        let aliases: Vec<String> = t.entries().into_iter().map(|e| e.alias).collect();
        assert_eq!(aliases, vec!["fresh lime juice", "white rum"]);
    }
}
