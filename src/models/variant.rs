//! Candidate image URLs and the entity requesting them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Where a candidate URL came from, shown by the provenance indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOrigin {
    /// Derived from the catalog locator the resolver found
    Mapped,
    /// Derived from the locator supplied with the record
    Original,
    /// Static stock photo or the bundled last-resort asset
    Fallback,
}

/// One URL to try, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub url: String,
    pub origin: ImageOrigin,
}

impl Candidate {
    pub fn new(url: impl Into<String>, origin: ImageOrigin) -> Self {
        Self {
            url: url.into(),
            origin,
        }
    }
}

/// Ordered, deduplicated, never-empty list of candidate URLs.
///
/// The last element is always the last-resort asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantList {
    candidates: Vec<Candidate>,
}

impl VariantList {
    /// Build a list from candidates in try order, terminated by `last_resort`.
    ///
    /// Duplicates keep their first position, except copies of `last_resort`,
    /// which only appear at the end.
    pub fn new(candidates: impl IntoIterator<Item = Candidate>, last_resort: &str) -> Self {
        let mut seen = HashSet::new();
        seen.insert(last_resort.to_string());

        let mut list: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| seen.insert(c.url.clone()))
            .collect();
        list.push(Candidate::new(last_resort, ImageOrigin::Fallback));

        Self { candidates: list }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the list has no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    pub fn last_index(&self) -> usize {
        self.candidates.len() - 1
    }

    /// The guaranteed terminal candidate.
    pub fn last(&self) -> &Candidate {
        &self.candidates[self.last_index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn urls(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.url.as_str()).collect()
    }
}

/// Identity of an entity whose image is being displayed.
///
/// A change in either field resets that entity's loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Free-text recipe name from the schedule
    pub recipe_name: String,

    /// Locator stored with the record itself, if any
    #[serde(default)]
    pub original_locator: Option<String>,
}

impl ImageRequest {
    pub fn new(recipe_name: impl Into<String>) -> Self {
        Self {
            recipe_name: recipe_name.into(),
            original_locator: None,
        }
    }

    pub fn with_original(mut self, locator: impl Into<String>) -> Self {
        self.original_locator = Some(locator.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dedups_and_terminates_with_last_resort() {
        let list = VariantList::new(
            [
                Candidate::new("a", ImageOrigin::Mapped),
                Candidate::new("b", ImageOrigin::Mapped),
                Candidate::new("a", ImageOrigin::Original),
                Candidate::new("local.png", ImageOrigin::Fallback),
                Candidate::new("c", ImageOrigin::Fallback),
            ],
            "local.png",
        );

        assert_eq!(list.urls(), ["a", "b", "c", "local.png"]);
        assert_eq!(list.get(0).unwrap().origin, ImageOrigin::Mapped);
        assert_eq!(list.last().url, "local.png");
    }

    #[test]
    fn test_empty_input_still_has_last_resort() {
        let list = VariantList::new(Vec::new(), "local.png");
        assert_eq!(list.len(), 1);
        assert!(!list.is_empty());
        assert_eq!(list.last_index(), 0);
    }

    #[test]
    fn test_request_identity() {
        let a = ImageRequest::new("UPMA");
        let b = ImageRequest::new("UPMA").with_original("https://example.com/u.jpg");
        assert_ne!(a, b);
        assert_eq!(a, ImageRequest::new("UPMA"));
    }
}
