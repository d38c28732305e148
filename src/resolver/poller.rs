// Endpoint poller - ordered fallback across provider endpoints
//
// States: Trying(i) -> Success | Trying(i + 1) | Fatal | Exhausted
// - Endpoints run strictly one after another, each at most once
// - Each attempt is bounded by a timeout; elapsed counts as retryable
// - HTTP 400/401/403/404 and unclassified errors stop polling
// - A mapping failure moves on, except on the last endpoint

use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{info, warn};

use super::client::ApiResponse;
use super::diagnostics::classify;
use super::errors::{FetchError, MapError, PollError};

pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(15);

/// One upstream operation; nothing runs until the poller awaits it
pub struct Endpoint<'a> {
    label: String,
    fetch: BoxFuture<'a, Result<ApiResponse, FetchError>>,
}

impl<'a> Endpoint<'a> {
    pub fn new<F>(label: impl Into<String>, fetch: F) -> Self
    where
        F: Future<Output = Result<ApiResponse, FetchError>> + Send + 'a,
    {
        Self {
            label: label.into(),
            fetch: Box::pin(fetch),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Successful poll
#[derive(Debug)]
pub struct Polled<T> {
    pub value: T,
    /// Label of the endpoint that produced `value`
    pub label: String,
    /// Attempts that got an answer from the provider
    pub provider_calls: u32,
}

/// Failed poll
#[derive(Debug)]
pub struct PollFailure {
    pub error: PollError,
    pub provider_calls: u32,
}

enum Attempt<T> {
    Success(T),
    Retry(PollError),
    Fatal(PollError),
}

/// Try `endpoints` in order until one yields a payload `mapper` accepts
pub async fn poll<T, M>(
    endpoints: Vec<Endpoint<'_>>,
    mapper: M,
    timeout: Duration,
) -> Result<Polled<T>, PollFailure>
where
    M: Fn(&Value) -> Result<T, MapError>,
{
    let total = endpoints.len();
    let mut provider_calls = 0u32;
    let mut last_error: Option<PollError> = None;

    for (index, endpoint) in endpoints.into_iter().enumerate() {
        let is_last = index + 1 == total;
        let Endpoint { label, fetch } = endpoint;
        info!("[Poller] Trying endpoint {}/{}: {}", index + 1, total, label);

        let outcome = match tokio::time::timeout(timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(Some(timeout))),
        };

        if reached_provider(&outcome) {
            provider_calls += 1;
        }

        match attempt(&label, outcome, &mapper, is_last) {
            Attempt::Success(value) => {
                info!("[Poller] Success with {}", label);
                return Ok(Polled { value, label, provider_calls });
            }
            Attempt::Retry(error) => {
                warn!("[Poller] {} failed, trying next endpoint: {}", label, error);
                last_error = Some(error);
            }
            Attempt::Fatal(error) => {
                warn!("[Poller] {} failed fatally: {}", label, error);
                return Err(PollFailure { error, provider_calls });
            }
        }
    }

    Err(PollFailure {
        error: last_error.unwrap_or(PollError::AllEndpointsFailed),
        provider_calls,
    })
}

fn attempt<T, M>(
    label: &str,
    outcome: Result<ApiResponse, FetchError>,
    mapper: &M,
    is_last: bool,
) -> Attempt<T>
where
    M: Fn(&Value) -> Result<T, MapError>,
{
    let payload = match outcome.and_then(ApiResponse::into_payload) {
        Ok(payload) => payload,
        Err(error) => {
            let reason = classify(&error);
            return if reason.is_retryable() {
                Attempt::Retry(PollError::Exhausted { label: label.to_string(), error, reason })
            } else {
                Attempt::Fatal(PollError::Fatal { label: label.to_string(), error, reason })
            };
        }
    };

    match mapper(&payload) {
        Ok(value) => Attempt::Success(value),
        Err(error) => {
            let failure = PollError::Mapping { label: label.to_string(), error };
            // TODO: stop early when the same mapping error repeats across endpoints of one platform
            if is_last {
                Attempt::Fatal(failure)
            } else {
                Attempt::Retry(failure)
            }
        }
    }
}

/// Whether the provider answered (and will bill) this attempt
fn reached_provider(outcome: &Result<ApiResponse, FetchError>) -> bool {
    matches!(
        outcome,
        Ok(_) | Err(FetchError::Http { .. }) | Err(FetchError::Decode(_))
    )
}
