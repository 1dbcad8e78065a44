// src/models/mod.rs

//! Domain models for the media library.
//!
//! This module contains the configuration, the recipe catalog and the
//! candidate types shared by services and the pipeline.

mod catalog;
mod config;
mod variant;

// Re-export all public types
pub use catalog::{RecipeCatalog, RecipeImage};
pub use config::{Config, CsvConfig, FallbackConfig, HttpConfig, LoaderConfig, ProbeConfig};
pub use variant::{Candidate, ImageOrigin, ImageRequest, VariantList};
