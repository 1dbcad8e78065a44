// src/services/csv.rs

//! Lenient CSV parsing.
//!
//! The tokenizer never rejects input: unbalanced quotes are resolved by the
//! quote-toggle rule and simply run to the end of the line. Only fetching
//! over HTTP can fail.

use std::collections::HashMap;

use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::CsvConfig;
use crate::utils::http::is_csv_content_type;

/// A header-keyed row produced by [`CsvParser::parse_with_headers`].
pub type CsvRecord = HashMap<String, String>;

/// Parsed rows of cells. Rows may differ in width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CsvTable {
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Project rows after the first onto the first row's field names.
    ///
    /// Missing trailing cells become empty strings; extra cells are dropped.
    pub fn into_records(self) -> Vec<CsvRecord> {
        let mut rows = self.rows.into_iter();
        let Some(headers) = rows.next() else {
            return Vec::new();
        };

        rows.map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), row.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
    }
}

/// Tokenizer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: char,
    pub trim_whitespace: bool,
    pub skip_empty_rows: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            trim_whitespace: true,
            skip_empty_rows: true,
        }
    }
}

impl From<&CsvConfig> for CsvOptions {
    fn from(config: &CsvConfig) -> Self {
        Self {
            delimiter: config.delimiter,
            trim_whitespace: config.trim_whitespace,
            skip_empty_rows: config.skip_empty_rows,
        }
    }
}

/// CSV parser with fixed options.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser {
    options: CsvOptions,
}

impl CsvParser {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Parse text into rows of cells.
    ///
    /// Lines are split on `\n` only; quoted fields cannot span lines.
    pub fn parse(&self, text: &str) -> CsvTable {
        if text.trim().is_empty() {
            return CsvTable::default();
        }

        let mut rows = Vec::new();
        for line in text.split('\n') {
            if self.options.skip_empty_rows && line.trim().is_empty() {
                continue;
            }

            let row = self.parse_line(line);
            if self.options.skip_empty_rows && row.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        CsvTable { rows }
    }

    /// Parse text whose first retained row holds the field names.
    pub fn parse_with_headers(&self, text: &str) -> Vec<CsvRecord> {
        self.parse(text).into_records()
    }

    /// Fetch CSV text over HTTP and parse it.
    ///
    /// Fails with [`AppError::HttpStatus`] on a non-2xx response. A content
    /// type that does not look like CSV is logged and otherwise ignored.
    pub async fn fetch(&self, client: &Client, url: &str) -> Result<CsvTable> {
        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::error!("CSV fetch from {} failed with {}", url, status);
            return Err(AppError::http_status(url, status));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !is_csv_content_type(&content_type) {
            log::warn!(
                "Unexpected content type {:?} from {}, parsing as CSV anyway",
                content_type,
                url
            );
        }

        let text = response.text().await?;
        let table = self.parse(&text);
        log::debug!("Parsed {} CSV rows from {}", table.len(), url);
        Ok(table)
    }

    /// Fetch CSV text over HTTP and project it onto its header row.
    pub async fn fetch_records(&self, client: &Client, url: &str) -> Result<Vec<CsvRecord>> {
        Ok(self.fetch(client, url).await?.into_records())
    }

    fn parse_line(&self, line: &str) -> Vec<String> {
        let mut cells = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '"' {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            } else if c == self.options.delimiter && !in_quotes {
                cells.push(self.finish_cell(std::mem::take(&mut current)));
            } else {
                current.push(c);
            }
        }
        cells.push(self.finish_cell(current));

        cells
    }

    fn finish_cell(&self, cell: String) -> String {
        if self.options.trim_whitespace {
            cell.trim().to_string()
        } else {
            cell
        }
    }
}

/// Serialize rows back to CSV text, quoting cells where needed.
///
/// Rows are joined with `\n` and no trailing newline is written.
pub fn write_csv(rows: &[Vec<String>], delimiter: char) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| quote_cell(cell, delimiter))
                .collect::<Vec<_>>()
                .join(&delimiter.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote_cell(cell: &str, delimiter: char) -> String {
    let needs_quotes = cell.contains(delimiter)
        || cell.contains('"')
        || cell.contains('\n')
        || cell.contains('\r')
        || cell.trim() != cell;

    if needs_quotes {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// CSV export URL of a Google Sheets tab.
pub fn sheet_csv_url(sheet_id: &str, gid: Option<&str>) -> String {
    let base = format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv");
    match gid {
        Some(gid) => format!("{base}&gid={gid}"),
        None => base,
    }
}
