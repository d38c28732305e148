// Resolver configuration
//
// Loading order: defaults, then `<config dir>/media-resolver/config.json`,
// then MEDIA_RESOLVER_* environment variables.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.tikhub.io";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

/// Configuration for a `MediaResolver`
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Provider base URL, without trailing slash
    pub api_base_url: String,
    /// Bearer token sent to the provider
    pub api_token: Option<String>,
    /// Per-endpoint attempt timeout
    pub timeout: Duration,
    /// Per-hop timeout while expanding shortlinks
    pub redirect_timeout: Duration,
    /// Maximum redirect hops followed for one shortlink
    pub max_redirects: usize,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// User agent for shortlink requests
    pub user_agent: String,
    /// Follow shortlinks before classification
    pub expand_short_links: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            redirect_timeout: Duration::from_secs(10),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            expand_short_links: true,
        }
    }
}

/// On-disk shape; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
struct FileConfig {
    api_base_url: Option<String>,
    api_token: Option<String>,
    timeout_seconds: Option<u64>,
    redirect_timeout_seconds: Option<u64>,
    max_redirects: Option<usize>,
    proxy: Option<String>,
    user_agent: Option<String>,
    expand_short_links: Option<bool>,
}

impl ResolverConfig {
    /// Defaults, then the config file, then the environment
    pub fn load() -> Self {
        let mut config = Self::default();
        if let Some(path) = Self::default_path() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match config.clone().merge_json(&content) {
                    Ok(merged) => {
                        tracing::debug!("[Config] Loaded {}", path.display());
                        config = merged;
                    }
                    Err(e) => tracing::warn!("[Config] Ignoring {}: {}", path.display(), e),
                },
                Err(_) => tracing::debug!("[Config] No config file at {}", path.display()),
            }
        }
        config.merge_env(|key| std::env::var(key).ok())
    }

    /// `<config dir>/media-resolver/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("media-resolver").join("config.json"))
    }

    /// Overlay values from a JSON document
    pub fn merge_json(mut self, content: &str) -> Result<Self, serde_json::Error> {
        let file: FileConfig = serde_json::from_str(content)?;
        if let Some(url) = file.api_base_url {
            self.api_base_url = url;
        }
        if file.api_token.is_some() {
            self.api_token = file.api_token;
        }
        if let Some(secs) = file.timeout_seconds {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.redirect_timeout_seconds {
            self.redirect_timeout = Duration::from_secs(secs);
        }
        if let Some(max) = file.max_redirects {
            self.max_redirects = max;
        }
        if file.proxy.is_some() {
            self.proxy = file.proxy;
        }
        if let Some(ua) = file.user_agent {
            self.user_agent = ua;
        }
        if let Some(expand) = file.expand_short_links {
            self.expand_short_links = expand;
        }
        Ok(self)
    }

    /// Overlay MEDIA_RESOLVER_* variables read through `lookup`
    pub fn merge_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MEDIA_RESOLVER_API_URL") {
            self.api_base_url = url;
        }
        if let Some(token) = lookup("MEDIA_RESOLVER_API_TOKEN") {
            self.api_token = Some(token);
        }
        if let Some(secs) = lookup("MEDIA_RESOLVER_TIMEOUT").and_then(|s| s.parse().ok()) {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(max) = lookup("MEDIA_RESOLVER_MAX_REDIRECTS").and_then(|s| s.parse().ok()) {
            self.max_redirects = max;
        }
        if let Some(proxy) = lookup("MEDIA_RESOLVER_PROXY") {
            self.proxy = Some(proxy);
        }
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_redirect_timeout(mut self, timeout: Duration) -> Self {
        self.redirect_timeout = timeout;
        self
    }

    pub fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_expand_short_links(mut self, enabled: bool) -> Self {
        self.expand_short_links = enabled;
        self
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
