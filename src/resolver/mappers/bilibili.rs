// Bilibili payload mapper
//
// Detail + play API:  { "View": { bvid, title, owner, stat, ... }, "playurl": { "dash" | "durl" } }
// Flat play API:      { bvid, title, owner, stat, duration, "dash": {...} }
//
// Bilibili has no gallery content on video routes. The muxed `durl` stream is
// preferred; DASH video entries carry no audio.

use serde_json::Value;

use super::common::{
    assemble, count, dimension, first_url, ms_to_secs, number, text, MediaParts, VideoStream,
};
use crate::resolver::errors::MapError;
use crate::resolver::models::{Statistics, UnifiedMedia};
use crate::resolver::platform::Platform;

pub fn map(data: &Value) -> Result<UnifiedMedia, MapError> {
    let view = ["/View", "/view", "/data/View"]
        .iter()
        .find_map(|p| data.pointer(p).filter(|v| v.is_object()))
        .unwrap_or(data);
    let play = ["/playurl", "/play_info", "/data/playurl"]
        .iter()
        .find_map(|p| data.pointer(p).filter(|v| v.is_object()))
        .unwrap_or(data);

    let id = match text(view, &["/bvid"]) {
        bvid if bvid.is_empty() => number(view, &["/aid"])
            .map(|aid| format!("av{}", aid))
            .unwrap_or_default(),
        bvid => bvid,
    };

    let parts = MediaParts {
        id,
        author_name: text(view, &["/owner/name"]),
        author_avatar: text(view, &["/owner/face"]),
        title: text(view, &["/title"]),
        cover_url: text(view, &["/pic"]),
        stats: Statistics {
            like_count: count(view, &["/stat/like"]),
            comment_count: count(view, &["/stat/reply"]),
            share_count: count(view, &["/stat/share"]),
            collect_count: count(view, &["/stat/favorite"]),
            play_count: count(view, &["/stat/view"]),
        },
    };

    let video = first_url(
        play,
        &[
            "/durl/0/url",
            "/durl/0/backup_url",
            "/dash/video/0/baseUrl",
            "/dash/video/0/base_url",
            "/dash/video/0/backupUrl",
        ],
    )
    .map(|url| VideoStream {
        url,
        dynamic_cover_url: None,
        duration_secs: number(view, &["/duration"])
            .or_else(|| number(play, &["/timelength"]).map(ms_to_secs))
            .unwrap_or(0),
        width: dimension(play, &["/dash/video/0/width"]).max(dimension(view, &["/dimension/width"])),
        height: dimension(play, &["/dash/video/0/height"]).max(dimension(view, &["/dimension/height"])),
        file_size: number(play, &["/durl/0/size"]),
    });

    assemble(Platform::Bilibili, parts, video, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_maps_view_and_dash() {
        let payload = json!({
            "View": {
                "bvid": "BV1xx411c7mD",
                "aid": 170001,
                "title": "first upload",
                "pic": "http://i0.hdslb.com/bfs/archive/c.jpg",
                "duration": 212,
                "owner": {"name": "up", "face": "http://i0.hdslb.com/bfs/face/f.jpg"},
                "stat": {"view": 99999, "like": 500, "reply": 40, "share": 8, "favorite": 77},
                "dimension": {"width": 1920, "height": 1080}
            },
            "playurl": {"dash": {"video": [{
                "baseUrl": "https://upos-sz-mirrorcos.bilivideo.com/1.m4s",
                "width": 1920, "height": 1080
            }]}}
        });
        match map(&payload).unwrap() {
            UnifiedMedia::Video { id, title, stats, video_url, duration, width, height, .. } => {
                assert_eq!(id, "BV1xx411c7mD");
                assert_eq!(title, "first upload");
                assert_eq!(stats.collect_count, 77);
                assert_eq!(stats.play_count, 99999);
                assert_eq!(video_url, "https://upos-sz-mirrorcos.bilivideo.com/1.m4s");
                assert_eq!(duration, 212);
                assert_eq!((width, height), (1920, 1080));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_maps_flat_durl_with_aid() {
        let payload = json!({
            "aid": 170001,
            "title": "legacy",
            "timelength": 65400,
            "durl": [{"url": "https://upos-hz-mirrorakam.akamaized.net/1.flv", "size": 1234567}]
        });
        match map(&payload).unwrap() {
            UnifiedMedia::Video { id, duration, file_size, .. } => {
                assert_eq!(id, "av170001");
                assert_eq!(duration, 65);
                assert_eq!(file_size, Some(1234567));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_muxed_stream_preferred_over_dash() {
        let payload = json!({
            "bvid": "BV1xx411c7mD",
            "durl": [{"url": "https://upos-sz-mirrorcos.bilivideo.com/muxed.mp4"}],
            "dash": {"video": [{"baseUrl": "https://upos-sz-mirrorcos.bilivideo.com/video-only.m4s"}]}
        });
        match map(&payload).unwrap() {
            UnifiedMedia::Video { video_url, .. } => {
                assert_eq!(video_url, "https://upos-sz-mirrorcos.bilivideo.com/muxed.mp4");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_without_stream_has_no_media() {
        let payload = json!({"View": {"bvid": "BV1xx411c7mD", "title": "t"}});
        assert_eq!(map(&payload).unwrap_err(), MapError::NoMedia);
    }
}
