// Resolver module - shared link to unified media

pub mod client;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod ids;
pub mod links;
pub mod mappers;
pub mod models;
pub mod orchestrator;
pub mod platform;
pub mod poller;
pub mod routes;
pub mod shortlink;
pub mod utils;

pub use client::{ApiClient, ApiResponse, Provider};
pub use config::ResolverConfig;
pub use diagnostics::FailureReason;
pub use errors::{ErrorKind, FetchError, MapError, PollError, ResolveError, ResolveResult};
pub use models::{ImageSize, ResolutionResult, StageTimings, Statistics, UnifiedMedia};
pub use orchestrator::MediaResolver;
pub use platform::Platform;
pub use shortlink::ShortLinkResolver;
