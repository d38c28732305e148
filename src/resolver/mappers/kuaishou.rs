// Kuaishou payload mapper
//
// Web API:  { "photo": { "photoId", "caption", "userName", "mainMvUrls": [...] } }
// App API:  { "photos": [ { "photo_id", "main_mv_urls": [...], "ext_params": { "atlas": ... } } ] }
//
// Atlas (image) posts list CDN hosts and relative paths separately.

use serde_json::Value;

use super::common::{
    array, assemble, count, dimension, first_url, ms_to_secs, number, text, GalleryImage,
    MediaParts, VideoStream,
};
use crate::resolver::errors::MapError;
use crate::resolver::models::{Statistics, UnifiedMedia};
use crate::resolver::platform::Platform;

pub fn map(data: &Value) -> Result<UnifiedMedia, MapError> {
    let photo = ["/photo", "/visionVideoDetail/photo", "/photos/0"]
        .iter()
        .find_map(|p| data.pointer(p).filter(|v| v.is_object()))
        .ok_or(MapError::MissingField("photo"))?;

    let parts = MediaParts {
        id: text(photo, &["/photoId", "/photo_id", "/id"]),
        author_name: text(photo, &["/userName", "/user_name", "/author/name"]),
        author_avatar: text(photo, &["/headUrl", "/headurl", "/author/headerUrl"]),
        title: text(photo, &["/caption"]),
        cover_url: first_url(photo, &["/coverUrl", "/coverUrls", "/cover_thumbnail_urls"]).unwrap_or_default(),
        stats: Statistics {
            like_count: count(photo, &["/likeCount", "/like_count", "/realLikeCount"]),
            comment_count: count(photo, &["/commentCount", "/comment_count"]),
            share_count: count(photo, &["/shareCount", "/share_count", "/forward_count"]),
            collect_count: count(photo, &["/collectCount", "/collect_count"]),
            play_count: count(photo, &["/viewCount", "/view_count"]),
        },
    };

    let video = first_url(photo, &["/photoUrl", "/mainMvUrls", "/main_mv_urls"]).map(|url| VideoStream {
        url,
        dynamic_cover_url: first_url(photo, &["/webpCoverUrls", "/animatedCoverUrl"]),
        duration_secs: ms_to_secs(number(photo, &["/duration"]).unwrap_or(0)),
        width: dimension(photo, &["/width", "/ext_params/w"]),
        height: dimension(photo, &["/height", "/ext_params/h"]),
        file_size: None,
    });

    assemble(Platform::Kuaishou, parts, video, atlas(photo))
}

fn atlas(photo: &Value) -> Vec<GalleryImage> {
    let Some(atlas) = photo.pointer("/ext_params/atlas") else {
        return Vec::new();
    };

    let cdn = first_url(atlas, &["/cdn", "/cdnList/0/cdn"]).unwrap_or_default();
    if cdn.is_empty() {
        return Vec::new();
    }
    let sizes = array(atlas, &["/size"]);

    array(atlas, &["/list"])
        .iter()
        .enumerate()
        .filter_map(|(i, path)| {
            let path = path.as_str()?;
            let url = format!("https://{}/{}", cdn.trim_end_matches('/'), path.trim_start_matches('/'));
            let (w, h) = sizes
                .get(i)
                .map(|s| (dimension(s, &["/w"]), dimension(s, &["/h"])))
                .unwrap_or((0, 0));
            Some(GalleryImage::new(url, w, h))
        })
        .collect()
}
