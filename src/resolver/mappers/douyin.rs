// Douyin payload mapper
//
// App API:  { "aweme_detail": { ... } }
// Web API:  { "aweme_details": [ { ... } ] } or the aweme object itself
//
// Image posts still carry `video.play_addr`, pointing at the background
// music track; that is not a video stream.

use serde_json::Value;

use super::common::{
    array, assemble, count, dimension, first_url, ms_to_secs, number, remove_watermark, text,
    GalleryImage, MediaParts, VideoStream,
};
use crate::resolver::errors::MapError;
use crate::resolver::models::{Statistics, UnifiedMedia};
use crate::resolver::platform::Platform;

pub fn map(data: &Value) -> Result<UnifiedMedia, MapError> {
    map_aweme(locate(data)?, Platform::Douyin)
}

fn locate(data: &Value) -> Result<&Value, MapError> {
    ["/aweme_detail", "/aweme_details/0", "/aweme_list/0"]
        .iter()
        .find_map(|p| data.pointer(p).filter(|v| v.is_object()))
        .or_else(|| data.get("aweme_id").map(|_| data))
        .ok_or(MapError::MissingField("aweme_detail"))
}

/// Map one aweme object; shared with the TikTok app API
pub(crate) fn map_aweme(aweme: &Value, platform: Platform) -> Result<UnifiedMedia, MapError> {
    let parts = MediaParts {
        id: text(aweme, &["/aweme_id", "/group_id"]),
        author_name: text(aweme, &["/author/nickname", "/author/unique_id"]),
        author_avatar: first_url(
            aweme,
            &[
                "/author/avatar_thumb/url_list",
                "/author/avatar_medium/url_list",
                "/author/avatar_larger/url_list",
            ],
        )
        .unwrap_or_default(),
        title: text(aweme, &["/desc", "/preview_title"]),
        cover_url: first_url(
            aweme,
            &["/video/origin_cover/url_list", "/video/cover/url_list"],
        )
        .unwrap_or_default(),
        stats: Statistics {
            like_count: count(aweme, &["/statistics/digg_count"]),
            comment_count: count(aweme, &["/statistics/comment_count"]),
            share_count: count(aweme, &["/statistics/share_count"]),
            collect_count: count(aweme, &["/statistics/collect_count"]),
            play_count: count(aweme, &["/statistics/play_count"]),
        },
    };

    assemble(platform, parts, stream(aweme), images(aweme))
}

fn stream(aweme: &Value) -> Option<VideoStream> {
    let url = first_url(
        aweme,
        &[
            "/video/play_addr/url_list",
            "/video/play_addr_h264/url_list",
            "/video/bit_rate/0/play_addr/url_list",
            "/video/download_addr/url_list",
        ],
    )?;
    if is_audio_track(&url) {
        return None;
    }

    Some(VideoStream {
        url: remove_watermark(&url, "/playwm/", "/play/"),
        dynamic_cover_url: first_url(
            aweme,
            &["/video/dynamic_cover/url_list", "/video/animated_cover/url_list"],
        ),
        duration_secs: ms_to_secs(number(aweme, &["/video/duration", "/duration"]).unwrap_or(0)),
        width: dimension(aweme, &["/video/play_addr/width", "/video/width"]),
        height: dimension(aweme, &["/video/play_addr/height", "/video/height"]),
        file_size: number(aweme, &["/video/play_addr/data_size"]),
    })
}

fn is_audio_track(url: &str) -> bool {
    let path = url.split('?').next().unwrap_or(url);
    path.ends_with(".mp3") || path.ends_with(".m4a") || url.contains("ies-music")
}

fn images(aweme: &Value) -> Vec<GalleryImage> {
    array(aweme, &["/images", "/image_post_info/images"])
        .iter()
        .filter_map(|img| {
            let url = first_url(img, &["/url_list", "/display_image/url_list"])?;
            let width = dimension(img, &["/width", "/display_image/width"]);
            let height = dimension(img, &["/height", "/display_image/height"]);
            Some(GalleryImage::new(url, width, height))
        })
        .collect()
}
