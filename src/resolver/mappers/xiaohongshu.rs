// Xiaohongshu (RED) payload mapper
//
// Web API:  { "items": [ { "note_card": { ... } } ] }   camel/snake mix, counters as strings
// App API:  { "data": [ { "note_list": [ { ... } ] } ] }  or  [ { "note_list": [...] } ]
//
// Video notes either expose a stream list or only an origin key on the CDN.

use serde_json::Value;

use super::common::{
    array, assemble, count, dimension, first_url, ms_to_secs, number, seconds, text,
    GalleryImage, MediaParts, VideoStream,
};
use crate::resolver::errors::MapError;
use crate::resolver::models::{Statistics, UnifiedMedia};
use crate::resolver::platform::Platform;

const VIDEO_CDN: &str = "https://sns-video-bd.xhscdn.com/";

pub fn map(data: &Value) -> Result<UnifiedMedia, MapError> {
    let note = [
        "/note",
        "/items/0/note_card",
        "/note_card",
        "/data/0/note_list/0",
        "/0/note_list/0",
        "/note_list/0",
    ]
    .iter()
    .find_map(|p| data.pointer(p).filter(|v| v.is_object()))
    .ok_or(MapError::MissingField("note"))?;

    let title = match text(note, &["/title", "/display_title"]) {
        t if t.is_empty() => text(note, &["/desc"]),
        t => t,
    };

    let parts = MediaParts {
        id: text(note, &["/note_id", "/noteId", "/id"]),
        author_name: text(note, &["/user/nickname", "/user/nick_name", "/user/name"]),
        author_avatar: text(note, &["/user/avatar", "/user/image", "/user/images"]),
        title,
        cover_url: first_url(note, &["/cover", "/image_list/0"]).unwrap_or_default(),
        stats: Statistics {
            like_count: count(note, &["/interact_info/liked_count", "/liked_count", "/interactInfo/likedCount"]),
            comment_count: count(note, &["/interact_info/comment_count", "/comments_count", "/interactInfo/commentCount"]),
            share_count: count(note, &["/interact_info/share_count", "/shared_count", "/interactInfo/shareCount"]),
            collect_count: count(note, &["/interact_info/collected_count", "/collected_count", "/interactInfo/collectedCount"]),
            play_count: count(note, &["/view_count"]),
        },
    };

    let images = array(note, &["/image_list", "/images_list", "/imageList"])
        .iter()
        .filter_map(|img| {
            let url = first_url(img, &["/url_default", "/url_size_large", "/url", "/info_list/0/url", "/original"])?;
            Some(GalleryImage::new(url, dimension(img, &["/width"]), dimension(img, &["/height"])))
        })
        .collect();

    assemble(Platform::Xiaohongshu, parts, stream(note), images)
}

fn stream(note: &Value) -> Option<VideoStream> {
    let h264 = ["/video/media/stream/h264/0", "/video_info_v2/media/stream/h264/0", "/video/media/stream/h265/0"]
        .iter()
        .find_map(|p| note.pointer(p).filter(|v| v.is_object()));

    let url = h264
        .and_then(|s| first_url(s, &["/master_url", "/backup_urls"]))
        .or_else(|| first_url(note, &["/video/url", "/video_info_v2/url"]))
        .or_else(|| {
            first_url(note, &["/video/consumer/origin_video_key", "/video/consumer/originVideoKey"])
                .map(|key| format!("{}{}", VIDEO_CDN, key))
        })?;

    // Stream entries report milliseconds; capa reports seconds
    let duration_secs = h264
        .and_then(|s| number(s, &["/duration"]))
        .map(ms_to_secs)
        .or_else(|| seconds(note, &["/video/capa/duration", "/video/duration"]))
        .unwrap_or(0);

    Some(VideoStream {
        url,
        dynamic_cover_url: None,
        duration_secs,
        width: h264.map(|s| dimension(s, &["/width"])).unwrap_or(0),
        height: h264.map(|s| dimension(s, &["/height"])).unwrap_or(0),
        file_size: h264.and_then(|s| number(s, &["/size"])),
    })
}
