//! Image URL accessibility probing.

use std::time::{Duration, Instant};

use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;

use crate::models::ProbeConfig;

/// Outcome of a single probe. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub url: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

/// Issues one-shot HEAD requests against candidate URLs.
pub struct UrlProber {
    client: Client,
    config: ProbeConfig,
}

impl UrlProber {
    pub fn new(client: Client, config: ProbeConfig) -> Self {
        Self { client, config }
    }

    /// Probe with the configured timeout.
    pub async fn test_url(&self, url: &str) -> ProbeResult {
        self.test_url_with_timeout(url, self.config.timeout()).await
    }

    /// Probe once with a caller-supplied timeout. Never retries.
    pub async fn test_url_with_timeout(&self, url: &str, timeout: Duration) -> ProbeResult {
        let start = Instant::now();
        let outcome = tokio::time::timeout(timeout, self.client.head(url).send()).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let (success, status, error) = match outcome {
            Err(_) => (false, None, Some("Timeout".to_string())),
            Ok(Err(e)) => (false, None, Some(e.to_string())),
            Ok(Ok(response)) => {
                let status = response.status();
                if status.is_success() {
                    (true, Some(status.as_u16()), None)
                } else {
                    let reason = status.canonical_reason().unwrap_or("Unknown");
                    (
                        false,
                        Some(status.as_u16()),
                        Some(format!("HTTP {} {}", status.as_u16(), reason)),
                    )
                }
            }
        };

        if let Some(error) = &error {
            log::debug!("Probe failed for {}: {}", url, error);
        }

        ProbeResult {
            url: url.to_string(),
            success,
            status,
            error,
            elapsed_ms,
        }
    }

    /// Probe the leading variants concurrently.
    ///
    /// Waits for every probe, then returns the first success in input order.
    pub async fn find_first_working(&self, variants: &[String]) -> Option<String> {
        let results = self.probe_all(variants).await;
        first_success(&results).map(str::to_string)
    }

    /// Probe the leading variants concurrently and return every result in input order.
    pub async fn probe_all(&self, variants: &[String]) -> Vec<ProbeResult> {
        let probes = variants
            .iter()
            .take(self.config.max_candidates)
            .map(|url| self.test_url(url));
        join_all(probes).await
    }
}

/// URL of the first successful result, in input order.
pub fn first_success(results: &[ProbeResult]) -> Option<&str> {
    results.iter().find(|r| r.success).map(|r| r.url.as_str())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn prober(timeout_ms: u64) -> UrlProber {
        UrlProber::new(
            Client::new(),
            ProbeConfig {
                timeout_ms,
                max_candidates: 5,
            },
        )
    }

    async fn server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok.jpg"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/slow.jpg"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_url_success() {
        let server = server().await;
        let result = prober(5000)
            .test_url(&format!("{}/ok.jpg", server.uri()))
            .await;
        assert!(result.success);
        assert_eq!(result.status, Some(200));
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_url_non_success_status() {
        let server = server().await;
        let result = prober(5000)
            .test_url(&format!("{}/missing.jpg", server.uri()))
            .await;
        assert!(!result.success);
        assert_eq!(result.status, Some(404));
        assert_eq!(result.error.as_deref(), Some("HTTP 404 Not Found"));
    }

    #[tokio::test]
    async fn test_url_timeout() {
        let server = server().await;
        let result = prober(100)
            .test_url(&format!("{}/slow.jpg", server.uri()))
            .await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Timeout"));
    }

    #[tokio::test]
    async fn test_url_connection_error() {
        let result = prober(5000).test_url("http://127.0.0.1:1/none.jpg").await;
        assert!(!result.success);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_find_first_working_respects_input_order() {
        let server = server().await;
        let base = server.uri();
        let variants = vec![
            format!("{base}/missing.jpg"),
            format!("{base}/slow.jpg"),
            format!("{base}/ok.jpg"),
        ];

        let found = prober(5000).find_first_working(&variants).await;
        assert_eq!(found, Some(format!("{base}/slow.jpg")));
    }

    #[tokio::test]
    async fn test_find_first_working_only_tests_leading_candidates() {
        let server = server().await;
        let base = server.uri();
        let mut variants: Vec<String> = (0..5).map(|_| format!("{base}/missing.jpg")).collect();
        variants.push(format!("{base}/ok.jpg"));

        assert_eq!(prober(5000).find_first_working(&variants).await, None);
    }

    #[tokio::test]
    async fn test_probe_all_results_pick_first_working_without_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/ok.jpg"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let base = server.uri();
        let variants = vec![format!("{base}/missing.jpg"), format!("{base}/ok.jpg")];
        let results = prober(5000).probe_all(&variants).await;

        assert_eq!(results.len(), 2);
        assert_eq!(first_success(&results), Some(variants[1].as_str()));
        server.verify().await;
    }
}
