// Shortlink expansion
//
// Redirects are followed by hand (transport-level following is disabled) so
// that every hop is visible and bounded. Failure is never surfaced: the caller
// gets the best URL known so far.

use reqwest::header::LOCATION;
use tracing::{debug, warn};
use url::Url;

use super::config::ResolverConfig;
use super::utils::build_http_client;

/// A shortlink service: a host (subdomains included) and the path prefix its
/// short codes live under
#[derive(Debug, Clone, Copy)]
pub struct ShortLinkRule {
    pub host: &'static str,
    pub path_prefix: &'static str,
}

const fn whole_host(host: &'static str) -> ShortLinkRule {
    ShortLinkRule { host, path_prefix: "/" }
}

const fn under_path(host: &'static str, path_prefix: &'static str) -> ShortLinkRule {
    ShortLinkRule { host, path_prefix }
}

/// Links that only ever serve redirects to canonical content URLs
pub const SHORT_LINK_RULES: &[ShortLinkRule] = &[
    whole_host("v.douyin.com"),
    whole_host("vm.tiktok.com"),
    whole_host("vt.tiktok.com"),
    under_path("tiktok.com", "/t/"),
    whole_host("v.kuaishou.com"),
    whole_host("xhslink.com"),
    whole_host("b23.tv"),
    whole_host("bili2233.cn"),
    whole_host("t.co"),
    whole_host("t.cn"),
    whole_host("v.ixigua.com"),
];

impl ShortLinkRule {
    fn matches(&self, host: &str, path: &str) -> bool {
        let host_matches = host == self.host
            || host
                .strip_suffix(self.host)
                .map_or(false, |sub| sub.ends_with('.'));
        host_matches && path.starts_with(self.path_prefix)
    }
}

/// Check if the URL points at a known shortlink service
pub fn is_short_link(raw: &str) -> bool {
    Url::parse(raw).ok().map_or(false, |parsed| {
        let host = parsed.host_str().unwrap_or_default().to_lowercase();
        SHORT_LINK_RULES
            .iter()
            .any(|rule| rule.matches(&host, parsed.path()))
    })
}

/// Follows redirect chains up to a fixed hop count
pub struct ShortLinkResolver {
    http: reqwest::Client,
    max_redirects: usize,
}

impl ShortLinkResolver {
    pub fn new(config: &ResolverConfig) -> Result<Self, String> {
        let http = build_http_client(
            config.proxy.as_deref(),
            config.redirect_timeout,
            &config.user_agent,
            false,
        )?;

        Ok(Self {
            http,
            max_redirects: config.max_redirects,
        })
    }

    /// Final URL of the redirect chain starting at `url`
    pub async fn resolve(&self, url: &str) -> String {
        let mut current = url.to_string();

        for hop in 0..self.max_redirects {
            let response = match self.http.get(&current).send().await {
                Ok(r) => r,
                Err(e) => {
                    warn!("[ShortLink] Request to {} failed: {}", current, e);
                    return current;
                }
            };

            let status = response.status();
            if !status.is_redirection() {
                debug!("[ShortLink] {} answered {} after {} hop(s)", current, status, hop);
                return current;
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|loc| next_url(&current, loc));

            match location {
                Some(next) => {
                    debug!("[ShortLink] Hop {}: {} -> {}", hop + 1, current, next);
                    current = next;
                }
                None => {
                    warn!("[ShortLink] {} redirected without a usable Location", current);
                    return current;
                }
            }
        }

        warn!(
            "[ShortLink] Stopped after {} redirects at {}",
            self.max_redirects, current
        );
        current
    }
}

/// Resolve a Location header against the current URL; only http(s) targets count
fn next_url(current: &str, location: &str) -> Option<String> {
    let base = Url::parse(current).ok()?;
    let next = base.join(location.trim()).ok()?;
    match next.scheme() {
        "http" | "https" => Some(next.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver(max_redirects: usize) -> ShortLinkResolver {
        ShortLinkResolver::new(&ResolverConfig::default().with_max_redirects(max_redirects)).unwrap()
    }

    fn redirect(to: &str) -> ResponseTemplate {
        ResponseTemplate::new(302).insert_header("Location", to)
    }

    #[test]
    fn test_known_short_hosts() {
        assert!(is_short_link("https://v.douyin.com/iRNBho6u/"));
        assert!(is_short_link("http://XHSLINK.com/a/b"));
        assert!(is_short_link("https://bili2233.cn/AbC123"));
        assert!(!is_short_link("https://www.douyin.com/video/1"));
        assert!(!is_short_link("https://notb23.tv/x"));
        assert!(!is_short_link("not a url"));
    }

    #[test]
    fn test_path_based_short_links() {
        assert!(is_short_link("https://www.tiktok.com/t/ZTRabc123/"));
        assert!(is_short_link("https://tiktok.com/t/ZTRabc123"));
        assert!(!is_short_link("https://www.tiktok.com/@user/video/7356789012345678901"));
        assert!(!is_short_link("https://www.tiktok.com/tag/t"));
    }

    #[test]
    fn test_next_url_handles_relative_and_custom_schemes() {
        assert_eq!(
            next_url("https://b23.tv/abc", "/video/BV1xx411c7mD").as_deref(),
            Some("https://b23.tv/video/BV1xx411c7mD")
        );
        assert_eq!(next_url("https://v.douyin.com/x", "snssdk1128://aweme/detail/1"), None);
    }

    #[tokio::test]
    async fn test_follows_chain_to_final_url() {
        let server = MockServer::start().await;
        let final_url = format!("{}/video/7372484719365098803", server.uri());
        Mock::given(method("GET"))
            .and(path("/abc123"))
            .respond_with(redirect("/share/7372484719365098803"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/share/7372484719365098803"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", final_url.as_str()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/video/7372484719365098803"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let resolved = resolver(10).resolve(&format!("{}/abc123", server.uri())).await;
        assert_eq!(resolved, final_url);
    }

    #[tokio::test]
    async fn test_hop_limit_bounds_redirect_loops() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loop"))
            .respond_with(redirect("/loop"))
            .expect(3)
            .mount(&server)
            .await;

        let start = format!("{}/loop", server.uri());
        assert_eq!(resolver(3).resolve(&start).await, start);
    }

    #[tokio::test]
    async fn test_non_redirect_returns_input() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let start = format!("{}/gone", server.uri());
        assert_eq!(resolver(10).resolve(&start).await, start);
    }

    #[tokio::test]
    async fn test_network_failure_returns_original() {
        let start = "http://127.0.0.1:1/abc";
        assert_eq!(resolver(10).resolve(start).await, start);
    }
}
