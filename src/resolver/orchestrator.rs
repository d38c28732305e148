// Resolution orchestrator - shared text in, unified media out
//
// Pipeline:
// 1. Extract the first link from the text
// 2. Expand it if it is a known shortlink
// 3. Classify the platform and extract the content id
// 4. Poll the platform's endpoints, mapping the first usable payload
//
// Input errors (no link, unsupported platform, no id) never reach the network.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, info_span, warn, Instrument};

use super::client::{ApiClient, Provider};
use super::config::ResolverConfig;
use super::errors::{ResolveError, ResolveResult};
use super::ids::extract_id;
use super::links::first_link;
use super::models::{ResolutionResult, StageTimings};
use super::platform::Platform;
use super::poller::{poll, Endpoint};
use super::routes::{route_for, EndpointSpec};
use super::shortlink::{is_short_link, ShortLinkResolver};
use super::utils::elapsed_ms;

/// Entry point of the resolver; cheap to share behind an `Arc`
pub struct MediaResolver {
    config: ResolverConfig,
    provider: Arc<dyn Provider>,
    shortlinks: ShortLinkResolver,
}

impl MediaResolver {
    /// Resolver backed by the HTTP provider described by `config`
    pub fn new(config: ResolverConfig) -> ResolveResult<Self> {
        let client = ApiClient::new(&config).map_err(ResolveError::Client)?;
        Self::with_provider(config, Arc::new(client))
    }

    /// Resolver backed by a custom provider
    pub fn with_provider(config: ResolverConfig, provider: Arc<dyn Provider>) -> ResolveResult<Self> {
        let shortlinks = ShortLinkResolver::new(&config).map_err(ResolveError::Client)?;
        Ok(Self {
            config,
            provider,
            shortlinks,
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the first link in `text`
    pub async fn resolve(&self, text: &str) -> ResolveResult<ResolutionResult> {
        self.run(text).instrument(info_span!("resolve")).await
    }

    async fn run(&self, text: &str) -> ResolveResult<ResolutionResult> {
        let started = Instant::now();
        let mut timings = StageTimings::default();

        // Extract
        let stage = Instant::now();
        let link = first_link(text).ok_or(ResolveError::NoLinkFound)?;
        timings.extract_ms = elapsed_ms(stage);
        info!("[Resolver] Link: {}", link);

        // Expand
        let stage = Instant::now();
        let url = self.expand(&link).await;
        timings.shortlink_ms = elapsed_ms(stage);

        // Classify
        let stage = Instant::now();
        let (url, platform) = classify(&link, url);
        if platform == Platform::Unknown {
            warn!("[Resolver] Unsupported link: {}", url);
            return Err(ResolveError::UnsupportedPlatform(url));
        }
        let id = extract_id(platform, &url);
        if id.is_empty() {
            warn!("[Resolver] No {} id in {}", platform.api_token(), url);
            return Err(ResolveError::InvalidId { platform });
        }
        let route = route_for(platform).ok_or_else(|| ResolveError::UnsupportedPlatform(url.clone()))?;
        timings.classify_ms = elapsed_ms(stage);
        info!("[Resolver] {} id {} ({} endpoints)", platform, id, route.endpoints.len());

        // Poll
        let stage = Instant::now();
        let endpoints = self.endpoints(platform, route.endpoints, &id, &url);
        let polled = poll(endpoints, route.mapper, self.config.timeout)
            .await
            .map_err(|failure| {
                warn!(
                    "[Resolver] {} failed after {} provider call(s): {}",
                    platform, failure.provider_calls, failure.error
                );
                ResolveError::from_poll(platform, failure.error)
            })?;
        timings.poll_ms = elapsed_ms(stage);

        info!(
            "[Resolver] Resolved {} {} via {} in {}ms",
            platform,
            polled.value.id(),
            polled.label,
            elapsed_ms(started)
        );

        Ok(ResolutionResult::new(
            polled.value,
            elapsed_ms(started),
            polled.provider_calls,
            timings,
        ))
    }

    async fn expand(&self, link: &str) -> String {
        if self.should_expand(link) {
            self.shortlinks.resolve(link).await
        } else {
            link.to_string()
        }
    }

    fn should_expand(&self, link: &str) -> bool {
        self.config.expand_short_links && is_short_link(link)
    }

    /// Lazy fetches for every endpoint of the route, in order
    fn endpoints<'a>(
        &'a self,
        platform: Platform,
        specs: &'static [EndpointSpec],
        id: &str,
        url: &str,
    ) -> Vec<Endpoint<'a>> {
        specs
            .iter()
            .map(|spec| {
                let provider = self.provider.as_ref();
                let path = spec.request_path(platform);
                let query = spec.query(id, url);
                Endpoint::new(spec.label, async move { provider.fetch(&path, &query).await })
            })
            .collect()
    }
}

/// Classify the expanded URL, falling back to the original link
fn classify(link: &str, expanded: String) -> (String, Platform) {
    match Platform::detect(&expanded) {
        Platform::Unknown if expanded != link => {
            let platform = Platform::detect(link);
            (link.to_string(), platform)
        }
        platform => (expanded, platform),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::client::ApiResponse;
    use crate::resolver::errors::{ErrorKind, FetchError};
    use crate::resolver::models::UnifiedMedia;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    type Responder = Box<dyn Fn(&str) -> Result<ApiResponse, FetchError> + Send + Sync>;

    /// Provider that records every call and answers per path
    struct RecordingProvider {
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
        respond: Responder,
    }

    impl RecordingProvider {
        fn new(respond: impl Fn(&str) -> Result<ApiResponse, FetchError> + Send + Sync + 'static) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            })
        }

        fn paths(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
        }
    }

    #[async_trait]
    impl Provider for RecordingProvider {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn fetch(&self, path: &str, query: &[(String, String)]) -> Result<ApiResponse, FetchError> {
            self.calls.lock().unwrap().push((path.to_string(), query.to_vec()));
            (self.respond)(path)
        }
    }

    fn douyin_payload(id: &str) -> Value {
        json!({
            "aweme_detail": {
                "aweme_id": id,
                "desc": "clip",
                "author": {"nickname": "n"},
                "video": {
                    "play_addr": {"url_list": ["https://aweme.snssdk.com/aweme/v1/playwm/?video_id=v1"]},
                    "duration": 15000
                }
            }
        })
    }

    fn http(status: u16) -> Result<ApiResponse, FetchError> {
        Err(FetchError::Http { status, message: format!("status {}", status) })
    }

    fn resolver(provider: Arc<RecordingProvider>) -> MediaResolver {
        MediaResolver::with_provider(ResolverConfig::default(), provider).unwrap()
    }

    #[tokio::test]
    async fn test_no_link_makes_no_calls() {
        let provider = RecordingProvider::new(|_| http(500));
        let err = resolver(provider.clone())
            .resolve("nothing to see here 🙂")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::NoLinkFound));
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(provider.paths().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_platform_makes_no_calls() {
        let provider = RecordingProvider::new(|_| http(500));
        let err = resolver(provider.clone())
            .resolve("look https://example.com/watch/1")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedPlatform(ref u) if u == "https://example.com/watch/1"));
        assert!(provider.paths().is_empty());
    }

    #[tokio::test]
    async fn test_missing_id_makes_no_calls() {
        let provider = RecordingProvider::new(|_| http(500));
        let err = resolver(provider.clone())
            .resolve("https://x.com/home")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidId { platform: Platform::Twitter }));
        assert!(err.user_message().contains("X (Twitter)"));
        assert!(provider.paths().is_empty());

        let err = resolver(provider.clone())
            .resolve("https://www.douyin.com/user/self")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidId { platform: Platform::Douyin }));
        assert!(provider.paths().is_empty());
    }

    #[tokio::test]
    async fn test_short_domain_link_resolves_with_its_id() {
        let provider = RecordingProvider::new(|_| Ok(ApiResponse::ok(douyin_payload("abc123"))));
        let config = ResolverConfig::default().with_expand_short_links(false);
        let resolver = MediaResolver::with_provider(config, provider.clone()).unwrap();

        let result = resolver
            .resolve("check this https://v.douyin.com/abc123 out")
            .await
            .unwrap();

        assert_eq!(result.media().platform(), Platform::Douyin);
        assert_eq!(result.api_calls(), 1);
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0].0, "/api/v1/douyin/app/v3/fetch_one_video");
        assert_eq!(calls[0].1, vec![("aweme_id".to_string(), "abc123".to_string())]);
    }

    #[test]
    fn test_tiktok_share_path_is_expanded() {
        let provider = RecordingProvider::new(|_| http(500));
        let on = resolver(provider.clone());
        assert!(on.should_expand("https://www.tiktok.com/t/ZTRabc123/"));
        assert!(on.should_expand("https://bili2233.cn/AbC123"));
        assert!(!on.should_expand("https://www.tiktok.com/@u/video/7356789012345678901"));

        let config = ResolverConfig::default().with_expand_short_links(false);
        let off = MediaResolver::with_provider(config, provider).unwrap();
        assert!(!off.should_expand("https://www.tiktok.com/t/ZTRabc123/"));
    }

    #[tokio::test]
    async fn test_unreachable_share_path_keeps_its_code() {
        let provider = RecordingProvider::new(|_| http(500));
        let config = ResolverConfig::default().with_proxy(Some("http://127.0.0.1:1".to_string()));
        let resolver = MediaResolver::with_provider(config, provider.clone()).unwrap();

        let _ = resolver.resolve("https://www.tiktok.com/t/ZTRabc123/").await;

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0].0, "/api/v1/tiktok/app/v3/fetch_one_video");
        assert_eq!(calls[0].1, vec![("aweme_id".to_string(), "ZTRabc123".to_string())]);
    }

    #[tokio::test]
    async fn test_success_wraps_media_with_cost() {
        let provider = RecordingProvider::new(|_| Ok(ApiResponse::ok(douyin_payload("7372484719365098803"))));
        let result = resolver(provider)
            .resolve("https://www.douyin.com/video/7372484719365098803")
            .await
            .unwrap();

        match result.media() {
            UnifiedMedia::Video { video_url, duration, .. } => {
                assert_eq!(video_url, "https://aweme.snssdk.com/aweme/v1/play/?video_id=v1");
                assert_eq!(*duration, 15);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(result.api_calls(), 1);
        assert!((result.estimated_cost() - 0.001).abs() < 1e-9);
        assert!(result.parse_time_ms() >= result.timings().poll_ms);
    }

    #[tokio::test]
    async fn test_not_found_stops_at_first_endpoint() {
        let provider = RecordingProvider::new(|_| http(404));
        let err = resolver(provider.clone())
            .resolve("https://www.xiaohongshu.com/explore/64b8d4f5000000001203f3c1")
            .await
            .unwrap_err();

        assert_eq!(provider.paths().len(), 1);
        assert!(matches!(err, ResolveError::ContentUnavailable { platform: Platform::Xiaohongshu, .. }));
        assert_eq!(err.user_message(), "This Xiaohongshu note may be private or deleted.");
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_next_endpoint() {
        let provider = RecordingProvider::new(|path| {
            if path.ends_with("app/v3/fetch_one_video") {
                http(503)
            } else {
                Ok(ApiResponse::ok(douyin_payload("7372484719365098803")))
            }
        });
        let result = resolver(provider.clone())
            .resolve("https://www.douyin.com/video/7372484719365098803")
            .await
            .unwrap();

        assert_eq!(
            provider.paths(),
            vec![
                "/api/v1/douyin/app/v3/fetch_one_video".to_string(),
                "/api/v1/douyin/web/fetch_one_video".to_string(),
            ]
        );
        assert_eq!(result.media().id(), "7372484719365098803");
        assert_eq!(result.api_calls(), 2);
        assert!((result.estimated_cost() - 0.002).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_exhausted_endpoints_surface_upstream_error() {
        let provider = RecordingProvider::new(|_| Err(FetchError::Connection("refused".to_string())));
        let err = resolver(provider.clone())
            .resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap_err();

        assert_eq!(provider.paths().len(), 2);
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.platform(), Some(Platform::YouTube));
    }

    #[tokio::test]
    async fn test_url_endpoints_receive_the_full_link() {
        let provider = RecordingProvider::new(|_| http(500));
        let link = "https://www.instagram.com/reel/CxYz123AbC/";
        let _ = resolver(provider.clone()).resolve(link).await;

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0].1[0], ("post_url".to_string(), link.to_string()));
        assert_eq!(calls[1].1[0], ("code".to_string(), "CxYz123AbC".to_string()));
    }

    #[test]
    fn test_classify_falls_back_to_original_link() {
        let (url, platform) = classify("https://b23.tv/AbC123", "https://example.org/landing".to_string());
        assert_eq!(platform, Platform::Bilibili);
        assert_eq!(url, "https://b23.tv/AbC123");

        let (url, platform) = classify(
            "https://b23.tv/AbC123",
            "https://www.bilibili.com/video/BV1xx411c7mD".to_string(),
        );
        assert_eq!(platform, Platform::Bilibili);
        assert_eq!(url, "https://www.bilibili.com/video/BV1xx411c7mD");
    }
}
