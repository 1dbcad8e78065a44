//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry and timing settings for the image fallback loader
    #[serde(default)]
    pub loader: LoaderConfig,

    /// URL accessibility probing settings
    #[serde(default)]
    pub probe: ProbeConfig,

    /// CSV ingestion settings
    #[serde(default)]
    pub csv: CsvConfig,

    /// Static images used when every remote candidate fails
    #[serde(default)]
    pub fallbacks: FallbackConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.loader.load_timeout_ms == 0 {
            return Err(AppError::validation("loader.load_timeout_ms must be > 0"));
        }
        if self.probe.timeout_ms == 0 {
            return Err(AppError::validation("probe.timeout_ms must be > 0"));
        }
        if self.probe.max_candidates == 0 {
            return Err(AppError::validation("probe.max_candidates must be > 0"));
        }
        if matches!(self.csv.delimiter, '"' | '\n' | '\r') {
            return Err(AppError::validation(format!(
                "csv.delimiter {:?} is not allowed",
                self.csv.delimiter
            )));
        }
        if self.fallbacks.last_resort.trim().is_empty() {
            return Err(AppError::validation("fallbacks.last_resort is empty"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Fallback loader timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Extra attempts on the same candidate before advancing
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Delay before retrying the same candidate
    #[serde(default = "defaults::retry_delay")]
    pub retry_delay_ms: u64,

    /// A load with no outcome after this long counts as a failure
    #[serde(default = "defaults::load_timeout")]
    pub load_timeout_ms: u64,

    /// Delay before upcoming candidates are prefetched
    #[serde(default = "defaults::prefetch_delay")]
    pub prefetch_delay_ms: u64,

    /// Number of upcoming candidates to prefetch (0 disables prefetch)
    #[serde(default = "defaults::prefetch_count")]
    pub prefetch_count: usize,
}

impl LoaderConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn prefetch_delay(&self) -> Duration {
        Duration::from_millis(self.prefetch_delay_ms)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_retries: defaults::max_retries(),
            retry_delay_ms: defaults::retry_delay(),
            load_timeout_ms: defaults::load_timeout(),
            prefetch_delay_ms: defaults::prefetch_delay(),
            prefetch_count: defaults::prefetch_count(),
        }
    }
}

/// URL probing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Per-probe timeout in milliseconds
    #[serde(default = "defaults::probe_timeout")]
    pub timeout_ms: u64,

    /// How many leading variants a bulk probe tests
    #[serde(default = "defaults::probe_candidates")]
    pub max_candidates: usize,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: defaults::probe_timeout(),
            max_candidates: defaults::probe_candidates(),
        }
    }
}

/// CSV parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvConfig {
    /// Field separator
    #[serde(default = "defaults::delimiter")]
    pub delimiter: char,

    /// Trim every cell value
    #[serde(default = "defaults::enabled")]
    pub trim_whitespace: bool,

    /// Drop blank lines and rows whose cells are all empty
    #[serde(default = "defaults::enabled")]
    pub skip_empty_rows: bool,

    /// Default CSV endpoint (e.g. a published Google Sheet)
    #[serde(default)]
    pub source_url: Option<String>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: defaults::delimiter(),
            trim_whitespace: true,
            skip_empty_rows: true,
            source_url: None,
        }
    }
}

/// Static terminal fallbacks of every candidate list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Generic stock photos tried after every recipe-specific candidate
    #[serde(default = "defaults::stock_images")]
    pub stock_images: Vec<String>,

    /// Bundled asset, always the last candidate
    #[serde(default = "defaults::last_resort")]
    pub last_resort: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            stock_images: defaults::stock_images(),
            last_resort: defaults::last_resort(),
        }
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; on2cook-media/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Loader defaults
    pub fn max_retries() -> u32 {
        2
    }
    pub fn retry_delay() -> u64 {
        1000
    }
    pub fn load_timeout() -> u64 {
        10_000
    }
    pub fn prefetch_delay() -> u64 {
        2000
    }
    pub fn prefetch_count() -> usize {
        2
    }

    // Probe defaults
    pub fn probe_timeout() -> u64 {
        5000
    }
    pub fn probe_candidates() -> usize {
        5
    }

    // CSV defaults
    pub fn delimiter() -> char {
        ','
    }
    pub fn enabled() -> bool {
        true
    }

    // Fallback defaults
    pub fn stock_images() -> Vec<String> {
        vec![
            "https://images.unsplash.com/photo-1565299624946-b28f40a0ca4b?w=800&h=600&fit=crop"
                .into(),
            "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?w=800&h=600&fit=crop"
                .into(),
            "https://images.unsplash.com/photo-1504674900247-0877df9cc836?w=800&h=600&fit=crop"
                .into(),
        ]
    }
    pub fn last_resort() -> String {
        "assets/on2cook-placeholder.png".into()
    }
}
