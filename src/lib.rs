pub mod resolver;

pub use resolver::{
    ErrorKind, MediaResolver, Platform, ResolutionResult, ResolveError, ResolverConfig,
    UnifiedMedia,
};
