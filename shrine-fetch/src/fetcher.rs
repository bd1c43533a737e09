//! Endpoint fallback fetching.
//!
//! A family configures an ordered list of candidate endpoints. They are
//! tried one at a time; a candidate that fails for any reason (transport,
//! status, JSON, envelope) is recorded and the next one is tried. The first
//! candidate that normalizes cleanly wins and the rest are never contacted.
//! If every candidate fails, the last failure is reported, since the later
//! routes are the current public ones and their errors say more.

use serde_json::Value;
use shrine_catalog::normalize;
use shrine_core::CatalogRecord;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::transport::{RawResponse, Transport};

/// Result of one fetch across all candidates.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success {
        records: Vec<CatalogRecord>,
        endpoint: String,
    },
    Failure(FetchError),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// What happened at one candidate endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchAttempt {
    pub endpoint: String,
    /// Number of records accepted, or why the candidate was rejected.
    pub result: Result<usize, FetchError>,
}

/// Outcome plus the ordered trace of candidates actually contacted.
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub outcome: FetchOutcome,
    pub attempts: Vec<FetchAttempt>,
}

/// Tries candidate endpoints in order until one yields a catalog.
#[derive(Debug, Clone)]
pub struct EndpointFetcher<T> {
    transport: T,
    collection_keys: Vec<String>,
    timeout: Duration,
}

impl<T: Transport> EndpointFetcher<T> {
    pub fn new(transport: T, collection_keys: Vec<String>, timeout: Duration) -> Self {
        Self {
            transport,
            collection_keys,
            timeout,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Walk `endpoints` in order and return the first successful catalog.
    ///
    /// Cancelling `cancel` abandons the in-flight request and returns
    /// [`FetchError::Cancelled`] without trying further candidates.
    pub async fn fetch(&self, endpoints: &[String], cancel: &CancellationToken) -> FetchReport {
        let mut attempts = Vec::with_capacity(endpoints.len());
        let mut last_error = FetchError::NoEndpoints;

        for endpoint in endpoints {
            if cancel.is_cancelled() {
                return cancelled(attempts);
            }

            log::debug!("Fetching catalog from {}", endpoint);
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::debug!("Fetch from {} cancelled", endpoint);
                    attempts.push(FetchAttempt {
                        endpoint: endpoint.clone(),
                        result: Err(FetchError::Cancelled),
                    });
                    return cancelled(attempts);
                }
                r = tokio::time::timeout(self.timeout, self.try_candidate(endpoint)) => match r {
                    Ok(r) => r,
                    Err(_) => Err(FetchError::network(format!(
                        "request timed out after {}ms",
                        self.timeout.as_millis()
                    ))),
                },
            };

            match result {
                Ok(records) => {
                    log::debug!("Accepted {} record(s) from {}", records.len(), endpoint);
                    attempts.push(FetchAttempt {
                        endpoint: endpoint.clone(),
                        result: Ok(records.len()),
                    });
                    return FetchReport {
                        outcome: FetchOutcome::Success {
                            records,
                            endpoint: endpoint.clone(),
                        },
                        attempts,
                    };
                }
                Err(e) => {
                    log::warn!("Candidate {} failed: {}", endpoint, e);
                    attempts.push(FetchAttempt {
                        endpoint: endpoint.clone(),
                        result: Err(e.clone()),
                    });
                    last_error = e;
                }
            }
        }

        FetchReport {
            outcome: FetchOutcome::Failure(last_error),
            attempts,
        }
    }

    async fn try_candidate(&self, endpoint: &str) -> Result<Vec<CatalogRecord>, FetchError> {
        let resp = self.transport.get(endpoint).await?;
        interpret(endpoint, resp, &self.collection_keys)
    }
}

/// Classify a raw response: status, then JSON, then envelope.
fn interpret(
    endpoint: &str,
    resp: RawResponse,
    collection_keys: &[String],
) -> Result<Vec<CatalogRecord>, FetchError> {
    if !resp.is_success() {
        return Err(FetchError::Http {
            status: resp.status,
            url: endpoint.to_string(),
        });
    }
    let body: Value =
        serde_json::from_slice(&resp.body).map_err(|e| FetchError::Parse(e.to_string()))?;
    let normalized = normalize(&body, collection_keys)?;
    Ok(normalized.records)
}

fn cancelled(attempts: Vec<FetchAttempt>) -> FetchReport {
    FetchReport {
        outcome: FetchOutcome::Failure(FetchError::Cancelled),
        attempts,
    }
}
