// Failure diagnostics - classifies upstream errors for the poller
//
// Decides for every failed endpoint call:
// - Whether the next endpoint is worth trying
// - Whether the content itself is the problem (private, deleted, bad id)
// - Which message the user should see

use serde::{Deserialize, Serialize};

use super::errors::FetchError;
use super::platform::Platform;

/// Why an upstream call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// HTTP 400 - the provider rejected the id or URL
    BadRequest,

    /// HTTP 401 - credential missing or rejected
    Unauthorized,

    /// HTTP 403 - content or account is not accessible
    Forbidden,

    /// HTTP 404 - content does not exist (deleted or private)
    NotFound,

    /// HTTP 429
    RateLimited,

    /// HTTP 5xx
    ServerError,

    /// Per-attempt timeout elapsed
    NetworkTimeout,

    /// DNS, connect or transfer failure
    ConnectionFailed,

    /// Provider answered with a non-200 envelope code or null data
    EmptyPayload,

    /// Anything else, including undecodable bodies
    Unknown,
}

impl FailureReason {
    /// Check if the next endpoint should be tried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited
                | Self::ServerError
                | Self::NetworkTimeout
                | Self::ConnectionFailed
                | Self::EmptyPayload
        )
    }

    /// Check if the request or content itself is invalid
    pub fn is_content_problem(&self) -> bool {
        matches!(
            self,
            Self::BadRequest | Self::Unauthorized | Self::Forbidden | Self::NotFound
        )
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::BadRequest => "Request rejected (HTTP 400)",
            Self::Unauthorized => "Credential rejected (HTTP 401)",
            Self::Forbidden => "Access denied (HTTP 403)",
            Self::NotFound => "Content not found (HTTP 404)",
            Self::RateLimited => "Rate limited by provider (HTTP 429)",
            Self::ServerError => "Provider server error (HTTP 5xx)",
            Self::NetworkTimeout => "Network timeout",
            Self::ConnectionFailed => "Connection failed",
            Self::EmptyPayload => "Provider returned no data",
            Self::Unknown => "Unknown failure",
        }
    }

    /// Platform-aware message for display
    pub fn user_explanation(&self, platform: Platform) -> String {
        let name = platform.display_name();
        let noun = platform.content_noun();
        match self {
            Self::NotFound | Self::Forbidden => {
                format!("This {} {} may be private or deleted.", name, noun)
            }
            Self::BadRequest => format!(
                "{} did not accept this link. Check that it points to a single {}.",
                name, noun
            ),
            Self::Unauthorized => {
                "The resolver API token was rejected. Check your configuration.".to_string()
            }
            Self::RateLimited => format!(
                "Too many requests for {} right now. Try again in a minute.",
                name
            ),
            Self::ServerError | Self::EmptyPayload => format!(
                "{} data is temporarily unavailable. Try again later.",
                name
            ),
            Self::NetworkTimeout => "The request timed out. Check your connection and try again.".to_string(),
            Self::ConnectionFailed => "Could not reach the resolver service. Check your connection.".to_string(),
            Self::Unknown => format!("Could not resolve this {} {}.", name, noun),
        }
    }
}

/// Classify a failed call
pub fn classify(error: &FetchError) -> FailureReason {
    match error {
        FetchError::Timeout(_) => FailureReason::NetworkTimeout,
        FetchError::Connection(_) => FailureReason::ConnectionFailed,
        FetchError::Http { status, .. } => classify_status(*status),
        FetchError::Envelope { .. } => FailureReason::EmptyPayload,
        FetchError::Decode(_) | FetchError::Other(_) => FailureReason::Unknown,
    }
}

/// Classify an HTTP status code; unlisted codes are fatal
pub fn classify_status(status: u16) -> FailureReason {
    match status {
        400 => FailureReason::BadRequest,
        401 => FailureReason::Unauthorized,
        403 => FailureReason::Forbidden,
        404 => FailureReason::NotFound,
        429 => FailureReason::RateLimited,
        500..=599 => FailureReason::ServerError,
        _ => FailureReason::Unknown,
    }
}
