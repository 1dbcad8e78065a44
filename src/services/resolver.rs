//! Recipe name to image locator resolution.
//!
//! Three strategies run in sequence and the first hit wins:
//! exact match, substring containment, then word overlap.
//! Within each strategy the catalog order breaks ties.

use std::collections::{HashMap, HashSet};

use crate::models::RecipeCatalog;

/// Strategy that produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Partial,
    WordOverlap,
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Normalized catalog key that matched
    pub key: &'a str,
    pub locator: &'a str,
    pub kind: MatchKind,
}

struct Entry {
    key: String,
    words: HashSet<String>,
    locator: String,
}

/// Resolves free-text recipe names against an injected catalog.
pub struct RecipeResolver {
    entries: Vec<Entry>,
    exact: HashMap<String, usize>,
}

impl RecipeResolver {
    /// Build a resolver over a catalog, keeping its order.
    pub fn new(catalog: &RecipeCatalog) -> Self {
        let entries: Vec<Entry> = catalog
            .recipes
            .iter()
            .filter_map(|r| {
                let key = normalize(&r.name);
                if key.is_empty() {
                    log::warn!("Skipping catalog entry with blank name ({})", r.image);
                    return None;
                }
                Some(Entry {
                    words: words(&key),
                    key,
                    locator: r.image.clone(),
                })
            })
            .collect();

        let mut exact = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            exact.entry(entry.key.clone()).or_insert(i);
        }

        Self { entries, exact }
    }

    /// Map a recipe name to its catalog locator, if any.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.resolve_detailed(name).map(|r| r.locator)
    }

    /// Like [`resolve`](Self::resolve), also reporting how the match was made.
    pub fn resolve_detailed(&self, name: &str) -> Option<Resolution<'_>> {
        let normalized = normalize(name);
        if normalized.is_empty() {
            return None;
        }

        if let Some(&i) = self.exact.get(&normalized) {
            return Some(self.resolution(i, MatchKind::Exact));
        }

        if let Some(i) = self
            .entries
            .iter()
            .position(|e| normalized.contains(&e.key) || e.key.contains(&normalized))
        {
            return Some(self.resolution(i, MatchKind::Partial));
        }

        let input_words = words(&normalized);
        let found = self.entries.iter().position(|e| {
            let common = input_words.intersection(&e.words).count();
            let required = 2.min(input_words.len().min(e.words.len()));
            common >= required
        });
        if let Some(i) = found {
            return Some(self.resolution(i, MatchKind::WordOverlap));
        }

        log::debug!("No catalog image for recipe {:?}", name);
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolution(&self, index: usize, kind: MatchKind) -> Resolution<'_> {
        let entry = &self.entries[index];
        log::debug!("Resolved recipe via {:?} match on {:?}", kind, entry.key);
        Resolution {
            key: &entry.key,
            locator: &entry.locator,
            kind,
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

fn words(normalized: &str) -> HashSet<String> {
    normalized.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> RecipeResolver {
        RecipeResolver::new(&RecipeCatalog::from_pairs([
            ("ALOO GOBI", "aloo-gobi"),
            ("CHICKEN CURRY", "chicken-curry"),
            ("CHICKEN BIRYANI", "chicken-biryani"),
            ("PANEER BUTTER MASALA", "paneer"),
        ]))
    }

    #[test]
    fn test_exact_match() {
        let resolver = fixture();
        assert_eq!(resolver.resolve("ALOO GOBI"), Some("aloo-gobi"));
        assert_eq!(resolver.resolve("  aloo gobi "), Some("aloo-gobi"));
        assert_eq!(
            resolver.resolve_detailed("aloo gobi").unwrap().kind,
            MatchKind::Exact
        );
    }

    #[test]
    fn test_partial_match_wins_before_word_overlap() {
        let resolver = fixture();
        let hit = resolver.resolve_detailed("SPICY CHICKEN CURRY DISH").unwrap();
        assert_eq!(hit.key, "CHICKEN CURRY");
        assert_eq!(hit.kind, MatchKind::Partial);
    }

    #[test]
    fn test_partial_match_key_contains_input() {
        let resolver = fixture();
        let hit = resolver.resolve_detailed("biryani").unwrap();
        assert_eq!(hit.locator, "chicken-biryani");
        assert_eq!(hit.kind, MatchKind::Partial);
    }

    #[test]
    fn test_word_overlap_needs_two_words() {
        let resolver = fixture();
        let hit = resolver.resolve_detailed("masala butter paneer").unwrap();
        assert_eq!(hit.locator, "paneer");
        assert_eq!(hit.kind, MatchKind::WordOverlap);

        // One shared word is not enough when both sides have two or more.
        assert_eq!(resolver.resolve("GOBI MANCHURIAN"), None);
    }

    #[test]
    fn test_one_shared_word_is_not_enough() {
        let resolver = RecipeResolver::new(&RecipeCatalog::from_pairs([
            ("TOMATO RICE", "tomato-rice"),
            ("LEMON RICE", "lemon-rice"),
        ]));
        // "RICE BOWL" shares one word with each key; two words on both sides.
        assert_eq!(resolver.resolve("RICE BOWL"), None);

        let single = RecipeResolver::new(&RecipeCatalog::from_pairs([("UPMA", "upma")]));
        assert_eq!(
            single.resolve_detailed("RAVA UPMA SPECIAL").unwrap().kind,
            MatchKind::Partial
        );
    }

    #[test]
    fn test_first_key_wins() {
        let resolver = fixture();
        assert_eq!(resolver.resolve("chicken"), Some("chicken-curry"));
    }

    #[test]
    fn test_no_match_and_blank_input() {
        let resolver = fixture();
        assert_eq!(resolver.resolve("GULAB JAMUN"), None);
        assert_eq!(resolver.resolve(""), None);
        assert_eq!(resolver.resolve("   "), None);
    }

    #[test]
    fn test_blank_catalog_key_is_ignored() {
        let resolver = RecipeResolver::new(&RecipeCatalog::from_pairs([
            ("ALOO GOBI", "aloo-gobi"),
            ("   ", "blank"),
        ]));
        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.resolve_detailed("GULAB JAMUN"), None);
        assert_eq!(resolver.resolve("aloo gobi"), Some("aloo-gobi"));
    }

    #[test]
    fn test_default_catalog_scenario() {
        let resolver = RecipeResolver::new(&RecipeCatalog::default());
        let hit = resolver.resolve_detailed("andhra chicken curry ").unwrap();
        assert_eq!(hit.key, "ANDHRA CHICKEN CURRY");
        assert_eq!(hit.kind, MatchKind::Exact);
    }
}
