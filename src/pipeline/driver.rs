//! Async execution of the fallback state machine.
//!
//! Attempts run strictly one after another. Each attempt races the load
//! against its timeout; whichever loses is dropped, so at most one timer is
//! armed per loader. Prefetching runs as a detached task that only ever sees
//! cloned URLs and cannot reach the loader's state.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::pipeline::fallback::{FailureCause, FallbackLoader, LoadReport, Transition};
use crate::source::ImageSource;

/// Run the loader until an image loads, every candidate fails, or `cancel` fires.
///
/// Never returns an error: the report always names a renderable URL.
pub async fn drive(
    loader: &mut FallbackLoader,
    source: Arc<dyn ImageSource>,
    cancel: &CancellationToken,
) -> LoadReport {
    let mut prefetch: Option<JoinHandle<()>> = None;
    let mut prefetched_for: Option<usize> = None;
    let mut cancelled = false;

    while let Some((ticket, url)) = loader.begin_attempt() {
        if prefetched_for != Some(ticket.index) {
            if let Some(handle) = prefetch.take() {
                handle.abort();
            }
            prefetch = spawn_prefetch(
                loader.prefetch_targets(),
                loader.config().prefetch_delay(),
                Arc::clone(&source),
            );
            prefetched_for = Some(ticket.index);
        }

        let timeout = loader.config().load_timeout();
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                cancelled = true;
                break;
            }
            result = tokio::time::timeout(timeout, source.load(&url)) => result,
        };

        let transition = match outcome {
            Ok(Ok(())) => loader.on_success(ticket),
            Ok(Err(e)) => loader.on_failure(ticket, FailureCause::Error(e.to_string())),
            Err(_) => loader.on_failure(ticket, FailureCause::Timeout),
        };

        if let Transition::Retry { delay, .. } = transition {
            tokio::select! {
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    if let Some(handle) = prefetch.take() {
        handle.abort();
    }
    if cancelled {
        log::debug!("Image load cancelled at {:?}", loader.state());
    }

    loader.report(cancelled)
}

fn spawn_prefetch(
    targets: Vec<String>,
    delay: Duration,
    source: Arc<dyn ImageSource>,
) -> Option<JoinHandle<()>> {
    if targets.is_empty() {
        return None;
    }

    Some(tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let source = &source;
        join_all(targets.iter().map(|url| async move {
            if source.load(url).await.is_ok() {
                log::debug!("Prefetched {}", url);
            }
        }))
        .await;
    }))
}
