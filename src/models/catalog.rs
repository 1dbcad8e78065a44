// src/models/catalog.rs

//! Recipe image catalog (recipe name to image locator table).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Ordered table of recipe names and their canonical image locators.
///
/// Order matters: the resolver's partial and word-overlap strategies
/// return the first matching entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCatalog {
    #[serde(default)]
    pub recipes: Vec<RecipeImage>,
}

/// One catalog row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeImage {
    /// Recipe name as it appears in the demo schedule (e.g., "ALOO GOBI")
    pub name: String,

    /// Image locator, usually a Google Drive share link
    pub image: String,
}

impl RecipeImage {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }
}

impl RecipeCatalog {
    /// Build a catalog from `(name, locator)` pairs, keeping their order.
    pub fn from_pairs<N, I>(pairs: impl IntoIterator<Item = (N, I)>) -> Self
    where
        N: Into<String>,
        I: Into<String>,
    {
        Self {
            recipes: pairs
                .into_iter()
                .map(|(name, image)| RecipeImage::new(name, image))
                .collect(),
        }
    }

    /// Load the catalog from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the catalog or return the built-in table if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Recipe catalog load failed from {:?}: {}. Using built-in table.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate that the catalog is usable.
    pub fn validate(&self) -> Result<()> {
        if self.recipes.is_empty() {
            return Err(AppError::validation("No recipes defined in catalog"));
        }
        if let Some(pos) = self.recipes.iter().position(|r| r.name.trim().is_empty()) {
            return Err(AppError::validation(format!(
                "Recipe #{} has an empty name",
                pos + 1
            )));
        }
        if let Some(r) = self.recipes.iter().find(|r| r.image.trim().is_empty()) {
            return Err(AppError::validation(format!(
                "Recipe '{}' has an empty image locator",
                r.name
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl Default for RecipeCatalog {
    fn default() -> Self {
        Self::from_pairs([
            (
                "ANDHRA CHICKEN CURRY",
                "https://drive.google.com/file/d/1aX9vQm3Lr7TqKp2WcZ8nBdE4fHjU6yRs/view?usp=sharing",
            ),
            (
                "ALOO GOBI",
                "https://drive.google.com/file/d/1Kd7PqW2xZrT5mNb8VcYh3LsJf9GtE1oA/view?usp=sharing",
            ),
            (
                "CHICKEN BIRYANI",
                "https://drive.google.com/file/d/1Rt4YhN8bVq2LmXc6ZpKs9WdJ3fGe7uTo/view?usp=sharing",
            ),
            (
                "CHICKEN CURRY",
                "https://drive.google.com/file/d/1Pq8ZxL3mWv6NtRb2YcKd5JhF9gSe4uAi/view?usp=sharing",
            ),
            (
                "PANEER BUTTER MASALA",
                "https://drive.google.com/file/d/1Mn2BvC5xZq8LkJh4GfDs7WeR3tYu6iOp/view?usp=sharing",
            ),
            (
                "DAL MAKHANI",
                "https://drive.google.com/file/d/1Hy6TgR4eWq9PlMn3BvCx8ZkJ2fDs5aQw/view?usp=sharing",
            ),
            (
                "VEG PULAO",
                "https://drive.google.com/open?id=1Jk3LpO9iUy7TrEw2QaSd5FgHz8XcVb4n",
            ),
            (
                "MUTTON ROGAN JOSH",
                "https://drive.google.com/uc?export=view&id=1Zx5CvB8nMq2WeRt6YuIo3PaSd9FgHj7k",
            ),
            (
                "GULAB JAMUN",
                "https://drive.google.com/file/d/1Qw4ErT7yUi2OpAs5DfGh8JkLz3XcVb6n/view?usp=sharing",
            ),
            (
                "UPMA",
                "https://drive.google.com/file/d/1Lk9JhG2fDs6ApOi4UyTr8EwQ3zXcVb5m/view?usp=sharing",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = RecipeCatalog::default();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.recipes[0].name, "ANDHRA CHICKEN CURRY");
    }

    #[test]
    fn test_validate_rejects_empty_catalog() {
        let catalog = RecipeCatalog { recipes: vec![] };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let catalog = RecipeCatalog::from_pairs([("  ", "https://example.com/a.jpg")]);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_bundled_catalog_matches_builtin() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/recipes.toml");
        let catalog = RecipeCatalog::load(path).unwrap();
        assert_eq!(catalog.recipes, RecipeCatalog::default().recipes);
    }

    #[test]
    fn test_load_preserves_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[recipes]]\nname = \"UPMA\"\nimage = \"https://example.com/upma.jpg\"\n\n\
             [[recipes]]\nname = \"ALOO GOBI\"\nimage = \"https://example.com/gobi.jpg\""
        )
        .unwrap();

        let catalog = RecipeCatalog::load(file.path()).unwrap();
        let names: Vec<_> = catalog.recipes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["UPMA", "ALOO GOBI"]);
    }
}
