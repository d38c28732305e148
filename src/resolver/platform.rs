// Supported platforms and URL classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content platform a link belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Douyin,
    TikTok,
    Kuaishou,
    Xiaohongshu,
    Weibo,
    Instagram,
    Twitter,
    Bilibili,
    YouTube,
    Xigua,
    Unknown,
}

/// One row of the classification table
struct HostRule {
    host: &'static str,
    path_prefix: Option<&'static str>,
    platform: Platform,
}

const fn rule(host: &'static str, platform: Platform) -> HostRule {
    HostRule { host, path_prefix: None, platform }
}

const fn path_rule(host: &'static str, path: &'static str, platform: Platform) -> HostRule {
    HostRule { host, path_prefix: Some(path), platform }
}

/// Checked in order, first match wins
const HOST_RULES: &[HostRule] = &[
    rule("douyin.com", Platform::Douyin),
    rule("iesdouyin.com", Platform::Douyin),
    rule("amemv.com", Platform::Douyin),
    rule("tiktok.com", Platform::TikTok),
    rule("tiktokv.com", Platform::TikTok),
    rule("kuaishou.com", Platform::Kuaishou),
    rule("gifshow.com", Platform::Kuaishou),
    rule("chenzhongtech.com", Platform::Kuaishou),
    rule("xiaohongshu.com", Platform::Xiaohongshu),
    rule("xhslink.com", Platform::Xiaohongshu),
    rule("weibo.com", Platform::Weibo),
    rule("weibo.cn", Platform::Weibo),
    rule("t.cn", Platform::Weibo),
    rule("instagram.com", Platform::Instagram),
    rule("instagr.am", Platform::Instagram),
    rule("twitter.com", Platform::Twitter),
    rule("x.com", Platform::Twitter),
    rule("t.co", Platform::Twitter),
    rule("bilibili.com", Platform::Bilibili),
    rule("b23.tv", Platform::Bilibili),
    rule("bili2233.cn", Platform::Bilibili),
    rule("youtube.com", Platform::YouTube),
    rule("youtu.be", Platform::YouTube),
    rule("youtube-nocookie.com", Platform::YouTube),
    rule("ixigua.com", Platform::Xigua),
    path_rule("toutiao.com", "/video/", Platform::Xigua),
];

impl Platform {
    /// Every supported platform, `Unknown` excluded
    pub const SUPPORTED: [Platform; 10] = [
        Platform::Douyin,
        Platform::TikTok,
        Platform::Kuaishou,
        Platform::Xiaohongshu,
        Platform::Weibo,
        Platform::Instagram,
        Platform::Twitter,
        Platform::Bilibili,
        Platform::YouTube,
        Platform::Xigua,
    ];

    /// Classify a URL. Never fails; unmatched input is `Unknown`.
    pub fn detect(url: &str) -> Platform {
        let (host, path) = host_and_path(url);
        if host.is_empty() {
            return Platform::Unknown;
        }

        HOST_RULES
            .iter()
            .find(|r| {
                host_matches(&host, r.host)
                    && r.path_prefix.map_or(true, |p| path.starts_with(p))
            })
            .map(|r| r.platform)
            .unwrap_or(Platform::Unknown)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Douyin => "Douyin",
            Self::TikTok => "TikTok",
            Self::Kuaishou => "Kuaishou",
            Self::Xiaohongshu => "Xiaohongshu",
            Self::Weibo => "Weibo",
            Self::Instagram => "Instagram",
            Self::Twitter => "X (Twitter)",
            Self::Bilibili => "Bilibili",
            Self::YouTube => "YouTube",
            Self::Xigua => "Xigua",
            Self::Unknown => "Unknown",
        }
    }

    /// Path selector used in provider API routes
    pub fn api_token(&self) -> &'static str {
        match self {
            Self::Douyin => "douyin",
            Self::TikTok => "tiktok",
            Self::Kuaishou => "kuaishou",
            Self::Xiaohongshu => "xiaohongshu",
            Self::Weibo => "weibo",
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::Bilibili => "bilibili",
            Self::YouTube => "youtube",
            Self::Xigua => "xigua",
            Self::Unknown => "",
        }
    }

    /// What the platform calls a single piece of content
    pub fn content_noun(&self) -> &'static str {
        match self {
            Self::Xiaohongshu => "note",
            Self::Weibo | Self::Twitter | Self::Instagram => "post",
            _ => "video",
        }
    }

    /// Advisory provider price per upstream call, in USD
    pub fn cost_per_call(&self) -> f64 {
        match self {
            Self::Instagram | Self::Twitter | Self::YouTube => 0.002,
            Self::Unknown => 0.0,
            _ => 0.001,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn host_matches(host: &str, rule_host: &str) -> bool {
    host == rule_host
        || host
            .strip_suffix(rule_host)
            .map_or(false, |prefix| prefix.ends_with('.'))
}

/// Lower-cased host and path; tolerates strings `url` cannot parse
fn host_and_path(raw: &str) -> (String, String) {
    if let Ok(parsed) = url::Url::parse(raw.trim()) {
        if let Some(host) = parsed.host_str() {
            return (host.to_lowercase(), parsed.path().to_string());
        }
    }

    let lower = raw.trim().to_lowercase();
    let rest = lower
        .split_once("://")
        .map(|(_, r)| r)
        .unwrap_or(lower.as_str());
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let host = rest[..end].split(':').next().unwrap_or_default().to_string();
    let path = rest[end..].to_string();
    (host, path)
}
