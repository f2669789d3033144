//! HTTP client for the record source endpoint.
//!
//! The record source is an opaque collaborator: a single unauthenticated
//! GET returning a JSON array of records. Transport failures are retried a
//! bounded number of times; status and decode failures are not.

use crate::models::Record;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Delay between transport-level retry attempts.
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Errors from fetching the record collection.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: connect, timeout, TLS.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    /// The response body was not a JSON array of records.
    #[error("failed to decode records from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Transport errors are the only retryable kind.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }
}

/// Options for the record client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Record source endpoint URL.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Retry attempts after a transport failure.
    pub retries: usize,
    /// Whether to show a fetch spinner.
    pub show_progress: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: crate::config::default_endpoint(),
            timeout_seconds: 30,
            retries: 3,
            show_progress: true,
        }
    }
}

/// Client for the record source endpoint.
pub struct RecordClient {
    options: ClientOptions,
    http_client: reqwest::Client,
}

impl RecordClient {
    /// Create a new client with the configured timeout.
    pub fn new(options: ClientOptions) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            options,
            http_client,
        }
    }

    /// The endpoint this client fetches from.
    pub fn endpoint(&self) -> &str {
        &self.options.endpoint
    }

    /// Fetch the record collection.
    ///
    /// Transport failures are retried up to the configured count with a
    /// short fixed delay. Non-2xx responses and malformed bodies are
    /// returned immediately.
    pub async fn fetch_records(&self) -> Result<Vec<Record>, FetchError> {
        let spinner = if self.options.show_progress {
            Some(fetch_spinner())
        } else {
            None
        };

        let mut attempt = 0;
        let result = loop {
            attempt += 1;
            match self.fetch_once().await {
                Ok(records) => break Ok(records),
                Err(err) if err.is_transport() && attempt <= self.options.retries => {
                    warn!(
                        "Fetch attempt {}/{} failed: {}",
                        attempt,
                        self.options.retries + 1,
                        err
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(err) => break Err(err),
            }
        };

        if let Some(spinner) = spinner {
            match &result {
                Ok(records) => {
                    spinner.finish_with_message(format!("Fetched {} records", records.len()))
                }
                Err(_) => spinner.finish_and_clear(),
            }
        }

        result
    }

    async fn fetch_once(&self) -> Result<Vec<Record>, FetchError> {
        let url = &self.options.endpoint;
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status,
            });
        }

        let records: Vec<Record> = response.json().await.map_err(|e| FetchError::Decode {
            url: url.clone(),
            source: e,
        })?;

        info!("Fetched {} records from {}", records.len(), url);
        Ok(records)
    }
}

/// Spinner shown while the fetch is in flight.
fn fetch_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Fetching records...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = FetchError::Status {
            url: "http://example.test/api/data".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };

        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("http://example.test/api/data"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_error_after_retries() {
        // Nothing listens on the discard port; the connect fails fast.
        let client = RecordClient::new(ClientOptions {
            endpoint: "http://127.0.0.1:9/api/data".to_string(),
            timeout_seconds: 1,
            retries: 0,
            show_progress: false,
        });

        let result = tokio_test::block_on(client.fetch_records());
        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }
}
