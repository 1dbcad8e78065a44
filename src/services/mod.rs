//! Service layer for the media library.
//!
//! This module contains the business logic for:
//! - CSV ingestion (`CsvParser`)
//! - Recipe name resolution (`RecipeResolver`)
//! - Drive URL variant generation (`variants`, `smart_order`)
//! - URL accessibility probing (`UrlProber`)

pub mod csv;
mod probe;
mod resolver;
pub mod variants;

pub use csv::{CsvOptions, CsvParser, CsvRecord, CsvTable, sheet_csv_url, write_csv};
pub use probe::{ProbeResult, UrlProber, first_success};
pub use resolver::{MatchKind, RecipeResolver, Resolution};
pub use variants::{smart_order, smart_variants, variants};
