// Instagram payload mapper
//
// v1 API:      { "items": [ { "code", "video_versions", "image_versions2", "carousel_media" } ] }
// GraphQL API: { "shortcode_media": { "shortcode", "video_url", "display_url", "edge_sidecar_to_children" } }
//
// A single-photo post becomes a one-image gallery.

use serde_json::Value;

use super::common::{
    array, assemble, count, dimension, first_url, number, seconds, text, GalleryImage,
    MediaParts, VideoStream,
};
use crate::resolver::errors::MapError;
use crate::resolver::models::{Statistics, UnifiedMedia};
use crate::resolver::platform::Platform;

pub fn map(data: &Value) -> Result<UnifiedMedia, MapError> {
    let item = ["/items/0", "/shortcode_media", "/xdt_shortcode_media", "/data/shortcode_media"]
        .iter()
        .find_map(|p| data.pointer(p).filter(|v| v.is_object()))
        .or_else(|| data.get("code").or_else(|| data.get("shortcode")).map(|_| data))
        .ok_or(MapError::MissingField("items"))?;

    let parts = MediaParts {
        id: text(item, &["/code", "/shortcode", "/id", "/pk"]),
        author_name: text(item, &["/user/username", "/owner/username"]),
        author_avatar: text(item, &["/user/profile_pic_url", "/owner/profile_pic_url"]),
        title: text(item, &["/caption/text", "/edge_media_to_caption/edges/0/node/text"]),
        cover_url: first_url(item, &["/image_versions2/candidates", "/display_url", "/thumbnail_src"]).unwrap_or_default(),
        stats: Statistics {
            like_count: count(item, &["/like_count", "/edge_media_preview_like/count"]),
            comment_count: count(item, &["/comment_count", "/edge_media_to_comment/count"]),
            share_count: count(item, &["/reshare_count"]),
            collect_count: count(item, &["/save_count"]),
            play_count: count(item, &["/play_count", "/view_count", "/video_view_count"]),
        },
    };

    let video = first_url(item, &["/video_versions", "/video_url"]).map(|url| VideoStream {
        url,
        dynamic_cover_url: None,
        duration_secs: seconds(item, &["/video_duration"]).unwrap_or(0),
        width: dimension(item, &["/video_versions/0/width", "/original_width", "/dimensions/width"]),
        height: dimension(item, &["/video_versions/0/height", "/original_height", "/dimensions/height"]),
        file_size: number(item, &["/video_versions/0/size"]),
    });

    assemble(Platform::Instagram, parts, video, images(item))
}

fn images(item: &Value) -> Vec<GalleryImage> {
    let carousel = array(item, &["/carousel_media"]);
    if !carousel.is_empty() {
        return carousel.iter().filter_map(image).collect();
    }

    let edges = array(item, &["/edge_sidecar_to_children/edges"]);
    if !edges.is_empty() {
        return edges.iter().filter_map(|e| e.get("node")).filter_map(image).collect();
    }

    image(item).into_iter().collect()
}

fn image(node: &Value) -> Option<GalleryImage> {
    let url = first_url(node, &["/image_versions2/candidates", "/display_url"])?;
    Some(GalleryImage::new(
        url,
        dimension(node, &["/image_versions2/candidates/0/width", "/original_width", "/dimensions/width"]),
        dimension(node, &["/image_versions2/candidates/0/height", "/original_height", "/dimensions/height"]),
    ))
}
