// Content identifier extraction
//
// Each platform has an ordered list of patterns; the first capture wins.
// An empty result means the link does not name a single piece of content.

use lazy_static::lazy_static;
use regex::Regex;

use super::platform::Platform;

fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources.iter().map(|s| Regex::new(s).unwrap()).collect()
}

lazy_static! {
    static ref DOUYIN: Vec<Regex> = patterns(&[
        r"/(?:video|note|slides)/(\d+)",
        r"v\.douyin\.com/([A-Za-z0-9_-]+)",
        r"[?&](?:modal_id|aweme_id|item_ids)=(\d+)",
    ]);
    static ref TIKTOK: Vec<Regex> = patterns(&[
        r"/(?:video|photo)/(\d+)",
        r"(?:vm|vt)\.tiktok\.com/([A-Za-z0-9_-]+)",
        r"tiktok\.com/t/([A-Za-z0-9_-]+)",
        r"[?&](?:item_id|aweme_id)=(\d+)",
    ]);
    static ref KUAISHOU: Vec<Regex> = patterns(&[
        r"/(?:short-video|fw/photo|photo)/([A-Za-z0-9_-]+)",
        r"v\.kuaishou\.com/([A-Za-z0-9_-]+)",
        r"[?&](?:photoId|shareObjectId)=([A-Za-z0-9_-]+)",
    ]);
    static ref XIAOHONGSHU: Vec<Regex> = patterns(&[
        r"/explore/([0-9a-fA-F]{24})",
        r"/discovery/item/([0-9a-fA-F]{24})",
        r"xhslink\.com/(?:[a-z]/)?([A-Za-z0-9]+)",
        r"[?&](?:noteId|note_id)=([0-9a-fA-F]{24})",
    ]);
    static ref WEIBO: Vec<Regex> = patterns(&[
        r"/(?:detail|status)/([A-Za-z0-9]+)",
        r"weibo\.com/\d+/([A-Za-z0-9]+)",
        r"[?&](?:mid|id)=(\d+)",
    ]);
    static ref INSTAGRAM: Vec<Regex> = patterns(&[
        r"/(?:p|reel|reels|tv)/([A-Za-z0-9_-]+)",
    ]);
    static ref TWITTER: Vec<Regex> = patterns(&[
        r"/status(?:es)?/(\d+)",
    ]);
    static ref BILIBILI: Vec<Regex> = patterns(&[
        r"(BV[0-9A-Za-z]{10})",
        r"/video/(av\d+)",
        r"(?:b23\.tv|bili2233\.cn)/([A-Za-z0-9]+)",
        r"[?&]aid=(\d+)",
    ]);
    static ref YOUTUBE: Vec<Regex> = patterns(&[
        r"[?&]v=([A-Za-z0-9_-]{11})",
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        r"/(?:shorts|embed|live|v)/([A-Za-z0-9_-]{11})",
    ]);
    static ref XIGUA: Vec<Regex> = patterns(&[
        r"/video/(\d+)",
        r"v\.ixigua\.com/([A-Za-z0-9_-]+)",
        r"ixigua\.com/(\d+)",
        r"[?&](?:item_id|group_id)=(\d+)",
    ]);
    static ref SEGMENT_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Platforms whose links may carry the id as a bare trailing path segment
fn uses_trailing_segment(platform: Platform) -> bool {
    matches!(
        platform,
        Platform::Douyin | Platform::Kuaishou | Platform::Xigua
    )
}

fn patterns_for(platform: Platform) -> &'static [Regex] {
    match platform {
        Platform::Douyin => &DOUYIN,
        Platform::TikTok => &TIKTOK,
        Platform::Kuaishou => &KUAISHOU,
        Platform::Xiaohongshu => &XIAOHONGSHU,
        Platform::Weibo => &WEIBO,
        Platform::Instagram => &INSTAGRAM,
        Platform::Twitter => &TWITTER,
        Platform::Bilibili => &BILIBILI,
        Platform::YouTube => &YOUTUBE,
        Platform::Xigua => &XIGUA,
        Platform::Unknown => &[],
    }
}

/// Content id for `url`, or an empty string when none can be found
pub fn extract_id(platform: Platform, url: &str) -> String {
    for re in patterns_for(platform) {
        if let Some(id) = re.captures(url).and_then(|c| c.get(1)) {
            return id.as_str().to_string();
        }
    }

    if uses_trailing_segment(platform) {
        if let Some(segment) = trailing_segment(url) {
            return segment;
        }
    }

    String::new()
}

/// Path roots that list or describe accounts rather than one piece of content
const NON_CONTENT_ROOTS: &[&str] = &[
    "user", "search", "discover", "hashtag", "music", "profile", "follow", "home",
];

/// Last non-empty path segment, if it looks like an identifier
fn trailing_segment(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();
    if segments
        .first()
        .map_or(false, |root| NON_CONTENT_ROOTS.contains(&root.to_lowercase().as_str()))
    {
        return None;
    }
    segments
        .last()
        .filter(|s| SEGMENT_RE.is_match(s))
        .map(|s| s.to_string())
}
