// Xigua payload mapper
//
// App API:  { item_id, title, user_info, video_play_info: "<json string>" | { video_list } }
// Web API:  { group_id, title, user_info, videoResource: { normal: { video_list } } }
//
// `video_list` is an object keyed video_1, video_2, ... with base64 `main_url`s.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;

use super::common::{
    assemble, count, dimension, first_url, number, seconds, text, MediaParts, VideoStream,
};
use crate::resolver::errors::MapError;
use crate::resolver::models::{Statistics, UnifiedMedia};
use crate::resolver::platform::Platform;

pub fn map(data: &Value) -> Result<UnifiedMedia, MapError> {
    let item = ["/data", "/item", "/video_detail"]
        .iter()
        .find_map(|p| data.pointer(p).filter(|v| v.is_object()))
        .unwrap_or(data);

    let parts = MediaParts {
        id: text(item, &["/item_id", "/group_id", "/gid"]),
        author_name: text(item, &["/user_info/name", "/user_info/screen_name"]),
        author_avatar: text(item, &["/user_info/avatar_url"]),
        title: text(item, &["/title", "/abstract"]),
        cover_url: first_url(item, &["/poster_url", "/large_image/url_list", "/video_detail_info/detail_video_large_image/url"])
            .unwrap_or_default(),
        stats: Statistics {
            like_count: count(item, &["/video_like_count", "/digg_count"]),
            comment_count: count(item, &["/comment_count"]),
            share_count: count(item, &["/share_count"]),
            collect_count: count(item, &["/repin_count", "/collect_count"]),
            play_count: count(item, &["/video_watch_count", "/video_detail_info/video_watch_count"]),
        },
    };

    let video = first_stream(item).and_then(|entry| {
        let url = decode_url(&text(&entry, &["/main_url", "/backup_url_1"]))?;
        Some(VideoStream {
            url,
            dynamic_cover_url: None,
            duration_secs: seconds(item, &["/video_duration", "/videoResource/duration", "/duration"]).unwrap_or(0),
            width: dimension(&entry, &["/vwidth", "/width"]),
            height: dimension(&entry, &["/vheight", "/height"]),
            file_size: number(&entry, &["/size"]),
        })
    });

    assemble(Platform::Xigua, parts, video, Vec::new())
}

/// Lowest-numbered entry of the first video list found
fn first_stream(item: &Value) -> Option<Value> {
    // Some app responses embed the play info as a JSON string
    let play_info = match item.get("video_play_info") {
        Some(Value::String(raw)) => serde_json::from_str::<Value>(raw).ok(),
        Some(v) => Some(v.clone()),
        None => None,
    };

    let list = play_info
        .as_ref()
        .and_then(|p| p.get("video_list"))
        .or_else(|| item.pointer("/videoResource/normal/video_list"))
        .or_else(|| item.pointer("/play_info/video_list"))?;

    match list {
        Value::Object(map) => map
            .iter()
            .min_by_key(|(key, _)| (stream_number(key), key.as_str()))
            .map(|(_, v)| v.clone()),
        Value::Array(items) => items.first().cloned(),
        _ => None,
    }
}

/// Numeric suffix of a `video_N` key; other keys sort last
fn stream_number(key: &str) -> u32 {
    key.strip_prefix("video_")
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

/// Decode a base64 `main_url`; plain URLs pass through
fn decode_url(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }
    let bytes = STANDARD.decode(raw.trim()).ok()?;
    let url = String::from_utf8(bytes).ok()?;
    url.starts_with("http").then_some(url)
}
