// Helper functions shared by the HTTP-facing components

use std::time::{Duration, Instant};

use reqwest::redirect::Policy;

/// Build a reqwest client with optional proxy support
///
/// An invalid proxy URL is an error, never a direct connection.
pub fn build_http_client(
    proxy: Option<&str>,
    timeout: Duration,
    user_agent: &str,
    follow_redirects: bool,
) -> Result<reqwest::Client, String> {
    let policy = if follow_redirects {
        Policy::limited(10)
    } else {
        Policy::none()
    };

    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .redirect(policy);

    if let Some(proxy_url) = proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| format!("Invalid proxy URL {}: {}", proxy_url, e))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))
}

/// Milliseconds elapsed since `start`, saturating
pub fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_socks_proxy() {
        let client = build_http_client(
            Some("socks5h://127.0.0.1:1080"),
            Duration::from_secs(5),
            "test",
            false,
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_rejects_invalid_proxy() {
        let client = build_http_client(Some("http://[::1"), Duration::from_secs(5), "test", true);
        assert!(client.is_err());
    }
}
