// YouTube payload mapper
//
// Summary API:   { id, title, channel, thumbnails, lengthSeconds, viewCount, videos: { items: [...] } }
// Player API:    { videoDetails: {...}, streamingData: { formats: [...] } }
//
// Counters and lengths arrive as strings. Only muxed formats are used.

use serde_json::Value;

use super::common::{
    assemble, count, dimension, first_url, ms_to_secs, number, seconds, text, MediaParts,
    VideoStream,
};
use crate::resolver::errors::MapError;
use crate::resolver::models::{Statistics, UnifiedMedia};
use crate::resolver::platform::Platform;

pub fn map(data: &Value) -> Result<UnifiedMedia, MapError> {
    let parts = MediaParts {
        id: text(data, &["/id", "/videoId", "/videoDetails/videoId"]),
        author_name: text(data, &["/channel/name", "/videoDetails/author", "/author"]),
        author_avatar: first_url(data, &["/channel/avatar", "/channel/thumbnails"]).unwrap_or_default(),
        title: text(data, &["/title", "/videoDetails/title"]),
        cover_url: first_url(data, &["/thumbnails", "/videoDetails/thumbnail/thumbnails", "/thumbnail"])
            .unwrap_or_default(),
        stats: Statistics {
            like_count: count(data, &["/likeCount", "/videoDetails/likeCount"]),
            comment_count: count(data, &["/commentCount"]),
            share_count: 0,
            collect_count: 0,
            play_count: count(data, &["/viewCount", "/videoDetails/viewCount"]),
        },
    };

    let format = ["/videos/items/0", "/streamingData/formats/0", "/formats/0"]
        .iter()
        .find_map(|p| data.pointer(p).filter(|f| f["url"].is_string()));

    let video = format.map(|f| VideoStream {
        url: text(f, &["/url"]),
        dynamic_cover_url: first_url(data, &["/richThumbnail", "/richThumbnails"]),
        duration_secs: seconds(data, &["/lengthSeconds", "/videoDetails/lengthSeconds"])
            .or_else(|| number(f, &["/approxDurationMs", "/lengthMs"]).map(ms_to_secs))
            .unwrap_or(0),
        width: dimension(f, &["/width"]),
        height: dimension(f, &["/height"]),
        file_size: number(f, &["/contentLength", "/size"]),
    });

    assemble(Platform::YouTube, parts, video, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_maps_summary_shape() {
        let payload = json!({
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "channel": {"name": "Rick Astley", "avatar": [{"url": "https://yt3.ggpht.com/a.jpg"}]},
            "thumbnails": [{"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg"}],
            "lengthSeconds": "212",
            "viewCount": "1500000000",
            "likeCount": 17000000,
            "videos": {"items": [{
                "url": "https://rr1---sn.googlevideo.com/videoplayback?itag=18",
                "width": 640, "height": 360, "size": 17000000
            }]}
        });
        match map(&payload).unwrap() {
            UnifiedMedia::Video { id, author_name, author_avatar, stats, video_url, duration, file_size, .. } => {
                assert_eq!(id, "dQw4w9WgXcQ");
                assert_eq!(author_name, "Rick Astley");
                assert_eq!(author_avatar, "https://yt3.ggpht.com/a.jpg");
                assert_eq!(stats.play_count, 1_500_000_000);
                assert_eq!(video_url, "https://rr1---sn.googlevideo.com/videoplayback?itag=18");
                assert_eq!(duration, 212);
                assert_eq!(file_size, Some(17000000));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_maps_player_shape() {
        let payload = json!({
            "videoDetails": {
                "videoId": "dQw4w9WgXcQ",
                "title": "t",
                "author": "a",
                "viewCount": "10",
                "thumbnail": {"thumbnails": [{"url": "https://i.ytimg.com/1.jpg"}]}
            },
            "streamingData": {"formats": [{
                "url": "https://rr2---sn.googlevideo.com/videoplayback?itag=22",
                "approxDurationMs": "212091",
                "contentLength": "30000000",
                "width": 1280, "height": 720
            }]}
        });
        match map(&payload).unwrap() {
            UnifiedMedia::Video { id, duration, file_size, cover_url, .. } => {
                assert_eq!(id, "dQw4w9WgXcQ");
                assert_eq!(duration, 212);
                assert_eq!(file_size, Some(30000000));
                assert_eq!(cover_url, "https://i.ytimg.com/1.jpg");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_signature_only_formats_are_not_streams() {
        let payload = json!({
            "id": "dQw4w9WgXcQ",
            "streamingData": {"formats": [{"signatureCipher": "s=abc&url=x"}]}
        });
        assert_eq!(map(&payload).unwrap_err(), MapError::NoMedia);
    }
}
