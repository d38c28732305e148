// TikTok payload mapper
//
// App API:  { "aweme_detail": { ... } }   same shape as Douyin, duration in ms
// Web API:  { "itemInfo": { "itemStruct": { ... } } }   camelCase, duration in s

use serde_json::Value;

use super::common::{
    array, assemble, count, dimension, first_url, number, seconds, text, GalleryImage, MediaParts,
    VideoStream,
};
use super::douyin::map_aweme;
use crate::resolver::errors::MapError;
use crate::resolver::models::{Statistics, UnifiedMedia};
use crate::resolver::platform::Platform;

pub fn map(data: &Value) -> Result<UnifiedMedia, MapError> {
    if let Some(aweme) = ["/aweme_detail", "/aweme_details/0", "/aweme_list/0"]
        .iter()
        .find_map(|p| data.pointer(p).filter(|v| v.is_object()))
    {
        return map_aweme(aweme, Platform::TikTok);
    }

    let item = ["/itemInfo/itemStruct", "/itemStruct", "/item"]
        .iter()
        .find_map(|p| data.pointer(p).filter(|v| v.is_object()))
        .ok_or(MapError::MissingField("itemStruct"))?;
    map_item(item)
}

fn map_item(item: &Value) -> Result<UnifiedMedia, MapError> {
    let parts = MediaParts {
        id: text(item, &["/id"]),
        author_name: text(item, &["/author/nickname", "/author/uniqueId"]),
        author_avatar: text(item, &["/author/avatarThumb", "/author/avatarMedium", "/author/avatarLarger"]),
        title: text(item, &["/desc"]),
        cover_url: text(item, &["/video/originCover", "/video/cover", "/imagePost/cover/imageURL/urlList/0"]),
        stats: Statistics {
            like_count: count(item, &["/stats/diggCount", "/statsV2/diggCount"]),
            comment_count: count(item, &["/stats/commentCount", "/statsV2/commentCount"]),
            share_count: count(item, &["/stats/shareCount", "/statsV2/shareCount"]),
            collect_count: count(item, &["/stats/collectCount", "/statsV2/collectCount"]),
            play_count: count(item, &["/stats/playCount", "/statsV2/playCount"]),
        },
    };

    let video = first_url(
        item,
        &["/video/playAddr", "/video/bitrateInfo/0/PlayAddr/UrlList", "/video/downloadAddr"],
    )
    .map(|url| VideoStream {
        url,
        dynamic_cover_url: first_url(item, &["/video/dynamicCover"]),
        duration_secs: seconds(item, &["/video/duration"]).unwrap_or(0),
        width: dimension(item, &["/video/width"]),
        height: dimension(item, &["/video/height"]),
        file_size: number(item, &["/video/bitrateInfo/0/PlayAddr/DataSize"]),
    });

    let images = array(item, &["/imagePost/images"])
        .iter()
        .filter_map(|img| {
            let url = first_url(img, &["/imageURL/urlList"])?;
            Some(GalleryImage::new(
                url,
                dimension(img, &["/imageWidth"]),
                dimension(img, &["/imageHeight"]),
            ))
        })
        .collect();

    assemble(Platform::TikTok, parts, video, images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_maps_web_video() {
        let payload = json!({
            "itemInfo": {"itemStruct": {
                "id": "7356789012345678901",
                "desc": "kickflip",
                "author": {"nickname": "sk8", "avatarThumb": "https://p16.tiktokcdn.com/a.jpeg"},
                "stats": {"diggCount": 10, "commentCount": 2, "shareCount": 1, "playCount": 900},
                "statsV2": {"collectCount": "4"},
                "video": {
                    "playAddr": "https://v16.tiktokcdn.com/v.mp4",
                    "cover": "https://p16.tiktokcdn.com/c.jpeg",
                    "duration": 12,
                    "width": 576,
                    "height": 1024
                }
            }}
        });
        match map(&payload).unwrap() {
            UnifiedMedia::Video { id, platform, stats, video_url, duration, aspect_ratio, .. } => {
                assert_eq!(id, "7356789012345678901");
                assert_eq!(platform, Platform::TikTok);
                assert_eq!(stats.play_count, 900);
                assert_eq!(stats.collect_count, 4);
                assert_eq!(video_url, "https://v16.tiktokcdn.com/v.mp4");
                assert_eq!(duration, 12);
                assert_eq!(aspect_ratio, Some(0.5625));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_maps_app_shape_with_ms_duration() {
        let payload = json!({
            "aweme_detail": {
                "aweme_id": "7356789012345678901",
                "video": {"play_addr": {"url_list": ["https://v16m.tiktokcdn.com/x.mp4"]}, "duration": 9500}
            }
        });
        match map(&payload).unwrap() {
            UnifiedMedia::Video { platform, duration, .. } => {
                assert_eq!(platform, Platform::TikTok);
                assert_eq!(duration, 9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_maps_photo_mode() {
        let payload = json!({
            "itemInfo": {"itemStruct": {
                "id": "7400000000000000000",
                "imagePost": {"images": [
                    {"imageURL": {"urlList": ["https://p16.tiktokcdn.com/1.jpeg"]}, "imageWidth": 1080, "imageHeight": 1350}
                ]}
            }}
        });
        match map(&payload).unwrap() {
            UnifiedMedia::ImageGallery { image_urls, image_sizes, .. } => {
                assert_eq!(image_urls, vec!["https://p16.tiktokcdn.com/1.jpeg"]);
                assert_eq!(image_sizes.unwrap()[0].width, 1080);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_shape() {
        assert_eq!(map(&json!({"foo": 1})).unwrap_err(), MapError::MissingField("itemStruct"));
    }
}
