// X (Twitter) payload mapper
//
// v1.1 API:   { "id_str", "full_text", "user", "extended_entities": { "media": [...] } }
// GraphQL:    { "rest_id", "legacy": { ... }, "core": { "user_results": { "result": { "legacy" } } } }
//
// Video variants are used in payload order; the first mp4 wins.

use serde_json::Value;

use super::common::{
    array, assemble, count, dimension, ms_to_secs, number, text, GalleryImage, MediaParts,
    VideoStream,
};
use crate::resolver::errors::MapError;
use crate::resolver::models::{Statistics, UnifiedMedia};
use crate::resolver::platform::Platform;

pub fn map(data: &Value) -> Result<UnifiedMedia, MapError> {
    let tweet = ["/tweet", "/tweetResult/result", "/data/tweetResult/result"]
        .iter()
        .find_map(|p| data.pointer(p).filter(|v| v.is_object()))
        .unwrap_or(data);
    let legacy = tweet.get("legacy").filter(|v| v.is_object()).unwrap_or(tweet);

    let media = array(legacy, &["/extended_entities/media", "/entities/media", "/media"]);
    let video_entry = media
        .iter()
        .find(|m| matches!(m["type"].as_str(), Some("video") | Some("animated_gif")));

    let parts = MediaParts {
        id: text(tweet, &["/rest_id", "/id_str", "/legacy/id_str", "/id"]),
        author_name: text(
            tweet,
            &["/core/user_results/result/legacy/name", "/user/name", "/author/name", "/user/screen_name"],
        ),
        author_avatar: text(
            tweet,
            &[
                "/core/user_results/result/legacy/profile_image_url_https",
                "/user/profile_image_url_https",
                "/author/avatar",
            ],
        ),
        title: text(legacy, &["/full_text", "/text"]),
        cover_url: video_entry
            .map(|m| text(m, &["/media_url_https"]))
            .unwrap_or_default(),
        stats: Statistics {
            like_count: count(legacy, &["/favorite_count", "/likes"]),
            comment_count: count(legacy, &["/reply_count", "/replies"]),
            share_count: count(legacy, &["/retweet_count", "/retweets"]),
            collect_count: count(legacy, &["/bookmark_count", "/bookmarks"]),
            play_count: count(tweet, &["/views/count", "/views", "/legacy/views/count"]),
        },
    };

    let video = video_entry.and_then(|m| {
        let url = array(m, &["/video_info/variants"])
            .iter()
            .find(|v| v["content_type"].as_str() == Some("video/mp4"))
            .and_then(|v| v["url"].as_str())?
            .to_string();
        Some(VideoStream {
            url,
            dynamic_cover_url: None,
            duration_secs: ms_to_secs(number(m, &["/video_info/duration_millis"]).unwrap_or(0)),
            width: dimension(m, &["/original_info/width", "/sizes/large/w"]),
            height: dimension(m, &["/original_info/height", "/sizes/large/h"]),
            file_size: None,
        })
    });

    let photos = media
        .iter()
        .filter(|m| m["type"].as_str() == Some("photo"))
        .filter_map(|m| {
            let url = m["media_url_https"].as_str().or_else(|| m["url"].as_str())?;
            Some(GalleryImage::new(
                url.to_string(),
                dimension(m, &["/original_info/width", "/sizes/large/w"]),
                dimension(m, &["/original_info/height", "/sizes/large/h"]),
            ))
        })
        .collect();

    assemble(Platform::Twitter, parts, video, photos)
}
