// src/pipeline/fallback.rs

//! Retry/fallback state machine for one displayed image.
//!
//! The machine holds no timers. Callers obtain a [`LoadTicket`] for the
//! attempt in progress and report its outcome; the returned [`Transition`]
//! tells them what to schedule next. Tickets from an earlier generation,
//! candidate or attempt are rejected as [`Transition::Stale`], so a late
//! timeout or callback can never move the machine.
//!
//! ```text
//! Loading{i, r} --failure, r < max--> Loading{i, r+1}   (after retry delay)
//! Loading{i, r} --failure, r = max--> Loading{i+1, 0}   (i is not last)
//! Loading{i, r} --failure, r = max--> Exhausted         (i is last)
//! Loading{i, r} --success----------> Loaded{i}
//! ```

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Candidate, ImageOrigin, LoaderConfig, VariantList};
use crate::utils::url::truncate_for_display;

/// Graphemes of a URL kept in failure log entries.
const LOG_URL_LEN: usize = 50;

/// Current phase of the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum LoadState {
    Loading { index: usize, retry: u32 },
    Loaded { index: usize },
    Exhausted,
}

/// Identifies one attempt; outcomes must be reported with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub index: usize,
    pub retry: u32,
}

/// Why an attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    Timeout,
    Error(String),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Timeout => write!(f, "Timeout"),
            FailureCause::Error(message) => write!(f, "{message}"),
        }
    }
}

/// Diagnostic record of a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEntry {
    pub index: usize,
    /// Truncated for display
    pub url: String,
    /// 1-based attempt number on this candidate
    pub attempt: u32,
    pub cause: String,
    pub at: DateTime<Utc>,
}

/// What the caller should do after reporting an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Try the same candidate again after `delay`
    Retry {
        index: usize,
        retry: u32,
        delay: Duration,
    },
    /// Start the next candidate immediately
    Advance { index: usize },
    /// Terminal: the candidate rendered
    Loaded { index: usize },
    /// Terminal: every candidate failed, including the last resort
    Exhausted,
    /// The ticket is outdated; nothing changed
    Stale,
}

/// Summary handed to the display layer.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    /// URL to render. Always present, even when exhausted.
    pub url: String,
    pub origin: ImageOrigin,
    pub state: LoadState,
    pub exhausted: bool,
    pub cancelled: bool,
    pub attempts: usize,
    pub failures: Vec<FailureEntry>,
}

/// Explicit retry/fallback state machine over a [`VariantList`].
#[derive(Debug, Clone)]
pub struct FallbackLoader {
    config: LoaderConfig,
    variants: VariantList,
    state: LoadState,
    generation: u64,
    attempts: usize,
    failures: Vec<FailureEntry>,
}

impl FallbackLoader {
    pub fn new(config: LoaderConfig, variants: VariantList) -> Self {
        Self {
            config,
            variants,
            state: LoadState::Loading { index: 0, retry: 0 },
            generation: 1,
            attempts: 0,
            failures: Vec::new(),
        }
    }

    /// Start over with a new candidate list. Outstanding tickets become stale.
    pub fn reset(&mut self, variants: VariantList) {
        self.variants = variants;
        self.state = LoadState::Loading { index: 0, retry: 0 };
        self.generation += 1;
        self.attempts = 0;
        self.failures.clear();
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn variants(&self) -> &VariantList {
        &self.variants
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn failures(&self) -> &[FailureEntry] {
        &self.failures
    }

    /// Upper bound on attempts for the current list.
    pub fn max_attempts(&self) -> usize {
        (self.config.max_retries as usize + 1) * self.variants.len()
    }

    /// Ticket for the attempt currently due, if still loading.
    pub fn ticket(&self) -> Option<LoadTicket> {
        match self.state {
            LoadState::Loading { index, retry } => Some(LoadTicket {
                generation: self.generation,
                index,
                retry,
            }),
            _ => None,
        }
    }

    /// Record the start of the due attempt and return its ticket and URL.
    pub fn begin_attempt(&mut self) -> Option<(LoadTicket, String)> {
        let ticket = self.ticket()?;
        self.attempts += 1;
        let url = self.variants.get(ticket.index)?.url.clone();
        Some((ticket, url))
    }

    /// Candidate to display: the one loading or loaded, else the last resort.
    pub fn current(&self) -> &Candidate {
        match self.state {
            LoadState::Loading { index, .. } | LoadState::Loaded { index } => self
                .variants
                .get(index)
                .unwrap_or_else(|| self.variants.last()),
            LoadState::Exhausted => self.variants.last(),
        }
    }

    pub fn on_success(&mut self, ticket: LoadTicket) -> Transition {
        if !self.accepts(ticket) {
            return Transition::Stale;
        }

        self.state = LoadState::Loaded {
            index: ticket.index,
        };
        let candidate = self.current();
        log::info!(
            "Image loaded from {:?} candidate #{}: {}",
            candidate.origin,
            ticket.index,
            truncate_for_display(&candidate.url, LOG_URL_LEN)
        );
        Transition::Loaded {
            index: ticket.index,
        }
    }

    pub fn on_failure(&mut self, ticket: LoadTicket, cause: FailureCause) -> Transition {
        if !self.accepts(ticket) {
            return Transition::Stale;
        }

        let LoadTicket { index, retry, .. } = ticket;
        let url = self
            .variants
            .get(index)
            .map(|c| truncate_for_display(&c.url, LOG_URL_LEN))
            .unwrap_or_default();
        log::warn!(
            "Image candidate #{} failed (attempt {}): {} - {}",
            index,
            retry + 1,
            url,
            cause
        );
        self.failures.push(FailureEntry {
            index,
            url,
            attempt: retry + 1,
            cause: cause.to_string(),
            at: Utc::now(),
        });

        if retry < self.config.max_retries {
            let retry = retry + 1;
            self.state = LoadState::Loading { index, retry };
            return Transition::Retry {
                index,
                retry,
                delay: self.config.retry_delay(),
            };
        }

        if index < self.variants.last_index() {
            let index = index + 1;
            self.state = LoadState::Loading { index, retry: 0 };
            return Transition::Advance { index };
        }

        self.state = LoadState::Exhausted;
        log::error!(
            "All {} image candidates failed; showing last-resort asset",
            self.variants.len()
        );
        Transition::Exhausted
    }

    /// Upcoming candidates worth loading in the background.
    ///
    /// Empty unless loading with more than one candidate and the current
    /// index is outside the last two positions.
    pub fn prefetch_targets(&self) -> Vec<String> {
        let LoadState::Loading { index, .. } = self.state else {
            return Vec::new();
        };
        let len = self.variants.len();
        if len <= 1 || index + 2 >= len {
            return Vec::new();
        }

        (index + 1..len)
            .take(self.config.prefetch_count)
            .filter_map(|i| self.variants.get(i).map(|c| c.url.clone()))
            .collect()
    }

    pub fn report(&self, cancelled: bool) -> LoadReport {
        let candidate = self.current();
        LoadReport {
            url: candidate.url.clone(),
            origin: candidate.origin,
            state: self.state,
            exhausted: self.state == LoadState::Exhausted,
            cancelled,
            attempts: self.attempts,
            failures: self.failures.clone(),
        }
    }

    fn accepts(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
            && self.state
                == LoadState::Loading {
                    index: ticket.index,
                    retry: ticket.retry,
                }
    }
}
