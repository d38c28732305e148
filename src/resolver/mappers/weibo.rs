// Weibo payload mapper
//
// Web API:    { "mid", "text_raw", "user", "page_info": { "media_info": {...} }, "pic_ids", "pic_infos" }
// Mobile API: { "status": { "id", "text", "page_info": { "urls": {...} }, "pics": [...] } }

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::common::{
    array, assemble, count, dimension, first_url, seconds, text, GalleryImage, MediaParts,
    VideoStream,
};
use crate::resolver::errors::MapError;
use crate::resolver::models::{Statistics, UnifiedMedia};
use crate::resolver::platform::Platform;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Stream keys, best first
const STREAM_KEYS: &[&str] = &[
    "/page_info/media_info/mp4_720p_mp4",
    "/page_info/media_info/mp4_hd_url",
    "/page_info/media_info/stream_url_hd",
    "/page_info/media_info/mp4_sd_url",
    "/page_info/media_info/stream_url",
    "/page_info/urls/mp4_720p_mp4",
    "/page_info/urls/mp4_hd_mp4",
    "/page_info/urls/mp4_ld_mp4",
];

pub fn map(data: &Value) -> Result<UnifiedMedia, MapError> {
    let status = data
        .get("status")
        .filter(|v| v.is_object())
        .unwrap_or(data);
    if !status.is_object() {
        return Err(MapError::Invalid("status is not an object".to_string()));
    }

    let raw_text = text(status, &["/text_raw", "/text"]);
    let parts = MediaParts {
        id: text(status, &["/mid", "/idstr", "/id"]),
        author_name: text(status, &["/user/screen_name"]),
        author_avatar: text(status, &["/user/avatar_hd", "/user/profile_image_url"]),
        title: TAG_RE.replace_all(&raw_text, "").trim().to_string(),
        cover_url: first_url(status, &["/page_info/page_pic/url", "/page_info/page_pic", "/page_info/media_info/big_pic_info/pic_big/url"])
            .unwrap_or_default(),
        stats: Statistics {
            like_count: count(status, &["/attitudes_count"]),
            comment_count: count(status, &["/comments_count"]),
            share_count: count(status, &["/reposts_count"]),
            collect_count: 0,
            play_count: count(status, &["/page_info/media_info/online_users_number", "/page_info/play_count"]),
        },
    };

    let video = first_url(status, STREAM_KEYS).map(|url| VideoStream {
        url,
        dynamic_cover_url: None,
        duration_secs: seconds(status, &["/page_info/media_info/duration", "/page_info/media_info/video_duration"]).unwrap_or(0),
        width: dimension(status, &["/page_info/media_info/width", "/page_info/page_pic/width"]),
        height: dimension(status, &["/page_info/media_info/height", "/page_info/page_pic/height"]),
        file_size: None,
    });

    assemble(Platform::Weibo, parts, video, images(status))
}

fn images(status: &Value) -> Vec<GalleryImage> {
    // pic_infos is keyed by id; pic_ids keeps the post order
    if let Some(infos) = status.get("pic_infos").filter(|v| v.is_object()) {
        return array(status, &["/pic_ids"])
            .iter()
            .filter_map(|id| infos.get(id.as_str()?))
            .filter_map(|info| {
                let url = first_url(info, &["/largest/url", "/original/url", "/large/url"])?;
                Some(GalleryImage::new(
                    url,
                    dimension(info, &["/largest/width", "/original/width"]),
                    dimension(info, &["/largest/height", "/original/height"]),
                ))
            })
            .collect();
    }

    array(status, &["/pics"])
        .iter()
        .filter_map(|pic| {
            let url = first_url(pic, &["/large/url", "/url"])?;
            Some(GalleryImage::new(
                url,
                dimension(pic, &["/large/geo/width", "/geo/width"]),
                dimension(pic, &["/large/geo/height", "/geo/height"]),
            ))
        })
        .collect()
}
