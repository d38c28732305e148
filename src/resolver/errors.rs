// Error types for the resolution pipeline

use std::time::Duration;

use thiserror::Error;

use super::diagnostics::FailureReason;
use super::platform::Platform;

/// Failure of a single upstream call
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The call did not finish within the per-attempt budget
    #[error("timed out{}", .0.map(|d| format!(" after {:?}", d)).unwrap_or_default())]
    Timeout(Option<Duration>),

    /// DNS, connect, TLS or body transfer failure
    #[error("connection failed: {0}")]
    Connection(String),

    /// Provider answered with a non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Response body was not a valid envelope
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Provider answered, but without usable data
    #[error("provider returned code {code}: {message}")]
    Envelope { code: i64, message: String },

    /// Anything the classifier does not recognise
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Timeout(None);
        }
        if let Some(status) = e.status() {
            return Self::Http {
                status: status.as_u16(),
                message: e.to_string(),
            };
        }
        if e.is_connect() || e.is_request() || e.is_body() {
            return Self::Connection(e.to_string());
        }
        if e.is_decode() {
            return Self::Decode(e.to_string());
        }
        Self::Other(e.to_string())
    }
}

/// Structural failure while converting a provider payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// Neither a playable stream nor any image was present
    #[error("payload contains neither a video stream nor images")]
    NoMedia,

    /// A required field was absent
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A field was present but unusable
    #[error("invalid payload: {0}")]
    Invalid(String),
}

/// Terminal outcome of a poll that produced no media
#[derive(Debug, Clone, Error)]
pub enum PollError {
    /// A non-retryable upstream error stopped polling early
    #[error("{label}: {error}")]
    Fatal {
        label: String,
        error: FetchError,
        reason: FailureReason,
    },

    /// Every endpoint was tried; this is the last recorded upstream error
    #[error("{label}: {error}")]
    Exhausted {
        label: String,
        error: FetchError,
        reason: FailureReason,
    },

    /// The last endpoint answered but its payload could not be mapped
    #[error("{label}: {error}")]
    Mapping { label: String, error: MapError },

    /// Nothing was recorded (empty endpoint list)
    #[error("all endpoints failed")]
    AllEndpointsFailed,
}

/// Coarse classification surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Transport,
    UpstreamClient,
    UpstreamTransient,
    Mapping,
    Internal,
}

/// The only error type that leaves `MediaResolver::resolve`
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("no link found in the shared text")]
    NoLinkFound,

    #[error("unsupported platform for {0}")]
    UnsupportedPlatform(String),

    #[error("could not extract a {platform} content id")]
    InvalidId { platform: Platform },

    #[error("{platform} content unavailable: {detail}")]
    ContentUnavailable {
        platform: Platform,
        reason: FailureReason,
        detail: String,
    },

    #[error("{platform} upstream failure: {detail}")]
    Upstream {
        platform: Platform,
        reason: FailureReason,
        detail: String,
    },

    #[error("{platform} payload could not be mapped: {detail}")]
    Mapping { platform: Platform, detail: String },

    #[error("client setup failed: {0}")]
    Client(String),
}

impl ResolveError {
    /// Wrap a poll failure with the platform it was polling for
    pub fn from_poll(platform: Platform, error: PollError) -> Self {
        match error {
            PollError::Fatal { label, error, reason } => {
                let detail = format!("{}: {}", label, error);
                if reason.is_content_problem() {
                    Self::ContentUnavailable { platform, reason, detail }
                } else {
                    Self::Upstream { platform, reason, detail }
                }
            }
            PollError::Exhausted { label, error, reason } => Self::Upstream {
                platform,
                reason,
                detail: format!("{}: {}", label, error),
            },
            PollError::Mapping { label, error } => Self::Mapping {
                platform,
                detail: format!("{}: {}", label, error),
            },
            PollError::AllEndpointsFailed => Self::Upstream {
                platform,
                reason: FailureReason::Unknown,
                detail: "all endpoints failed".to_string(),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoLinkFound | Self::UnsupportedPlatform(_) | Self::InvalidId { .. } => {
                ErrorKind::Input
            }
            Self::ContentUnavailable { .. } => ErrorKind::UpstreamClient,
            Self::Upstream { reason, .. } => match reason {
                FailureReason::NetworkTimeout | FailureReason::ConnectionFailed => {
                    ErrorKind::Transport
                }
                FailureReason::BadRequest
                | FailureReason::Unauthorized
                | FailureReason::Forbidden
                | FailureReason::NotFound => ErrorKind::UpstreamClient,
                FailureReason::RateLimited
                | FailureReason::ServerError
                | FailureReason::EmptyPayload => ErrorKind::UpstreamTransient,
                FailureReason::Unknown => ErrorKind::Internal,
            },
            Self::Mapping { .. } => ErrorKind::Mapping,
            Self::Client(_) => ErrorKind::Internal,
        }
    }

    pub fn platform(&self) -> Option<Platform> {
        match self {
            Self::InvalidId { platform }
            | Self::ContentUnavailable { platform, .. }
            | Self::Upstream { platform, .. }
            | Self::Mapping { platform, .. } => Some(*platform),
            _ => None,
        }
    }

    /// Short, platform-aware sentence for display
    pub fn user_message(&self) -> String {
        match self {
            Self::NoLinkFound => "No link was found in the shared text.".to_string(),
            Self::UnsupportedPlatform(_) => "This link is not from a supported platform.".to_string(),
            Self::InvalidId { platform } => format!(
                "Could not read a {} {} id from this link.",
                platform.display_name(),
                platform.content_noun()
            ),
            Self::ContentUnavailable { platform, reason, .. }
            | Self::Upstream { platform, reason, .. } => reason.user_explanation(*platform),
            Self::Mapping { platform, .. } => format!(
                "{} returned data in an unexpected shape. Please try again later.",
                platform.display_name()
            ),
            Self::Client(_) => "The resolver is not configured correctly.".to_string(),
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;
