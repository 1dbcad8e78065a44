// src/lib.rs

//! On2Cook media library
//!
//! Resolves recipe names to images, expands Drive share links into
//! alternative URLs, loads them through a retry/fallback cascade, and
//! parses CSV exports of the demo schedule.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod source;
pub mod utils;
