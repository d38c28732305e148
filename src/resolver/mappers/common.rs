// Helpers shared by the platform mappers
//
// Payload paths are JSON pointers ("/video/play_addr/url_list/0"). Every
// lookup takes a list of candidate paths because API versions of the same
// platform rename and move fields; the first usable value wins.

use serde_json::Value;

use crate::resolver::errors::MapError;
use crate::resolver::models::{ImageSize, Statistics, UnifiedMedia};
use crate::resolver::platform::Platform;

/// First non-empty string (numbers are stringified) found at `paths`
pub fn text(v: &Value, paths: &[&str]) -> String {
    opt_text(v, paths).unwrap_or_default()
}

pub fn opt_text(v: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|p| match v.pointer(p)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First URL at `paths`; a path may point at a string, a list of strings,
/// or a list of objects carrying a `url` field
pub fn first_url(v: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|p| url_in(v.pointer(p)?))
}

fn url_in(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items.iter().find_map(url_in),
        Value::Object(obj) => ["url", "url_default", "src"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(url_in)),
        _ => None,
    }
}

/// First counter at `paths`, 0 when absent or unparsable
pub fn count(v: &Value, paths: &[&str]) -> u64 {
    paths
        .iter()
        .find_map(|p| v.pointer(p).and_then(parse_count))
        .unwrap_or(0)
}

/// First plain number at `paths`
pub fn number(v: &Value, paths: &[&str]) -> Option<u64> {
    paths.iter().find_map(|p| v.pointer(p).and_then(parse_count))
}

/// First dimension at `paths`, 0 when absent
pub fn dimension(v: &Value, paths: &[&str]) -> u32 {
    number(v, paths)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

/// Lenient counter parsing: numbers, numeric strings and abbreviations
/// such as "1.2万", "3w", "5.1k", "10+", "1,024"
pub fn parse_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|i| i.max(0) as u64))
            .or_else(|| n.as_f64().map(|f| if f > 0.0 { f as u64 } else { 0 })),
        Value::String(s) => parse_count_str(s),
        _ => None,
    }
}

fn parse_count_str(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('+')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let last = cleaned.chars().last()?;
    let stem = &cleaned[..cleaned.len() - last.len_utf8()];
    let (digits, multiplier) = match last {
        '万' | 'w' | 'W' => (stem, 10_000.0),
        '亿' => (stem, 100_000_000.0),
        'k' | 'K' => (stem, 1_000.0),
        'm' | 'M' => (stem, 1_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };

    let value: f64 = digits.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return Some(0);
    }
    Some((value * multiplier).round() as u64)
}

/// Millisecond duration to whole seconds (truncating)
pub fn ms_to_secs(ms: u64) -> u64 {
    ms / 1000
}

/// Seconds given as an integer, float or numeric string, truncated
pub fn seconds(v: &Value, paths: &[&str]) -> Option<u64> {
    paths.iter().find_map(|p| match v.pointer(p)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.max(0.0) as u64),
        _ => None,
    })
}

/// Replace the first occurrence of `watermarked` in the URL path with `clean`
///
/// Query string and host are left untouched.
pub fn remove_watermark(url: &str, watermarked: &str, clean: &str) -> String {
    let split = url.find('?').unwrap_or(url.len());
    let (path_part, rest) = url.split_at(split);
    match path_part.find(watermarked) {
        Some(pos) => format!(
            "{}{}{}{}",
            &path_part[..pos],
            clean,
            &path_part[pos + watermarked.len()..],
            rest
        ),
        None => url.to_string(),
    }
}

/// Width / height, when both are known
pub fn aspect_ratio(width: u32, height: u32) -> Option<f64> {
    if width > 0 && height > 0 {
        Some(f64::from(width) / f64::from(height))
    } else {
        None
    }
}

/// Fields every variant carries
#[derive(Debug, Clone, Default)]
pub struct MediaParts {
    pub id: String,
    pub author_name: String,
    pub author_avatar: String,
    pub title: String,
    pub cover_url: String,
    pub stats: Statistics,
}

/// A playable stream picked from the payload
#[derive(Debug, Clone, Default)]
pub struct VideoStream {
    pub url: String,
    pub dynamic_cover_url: Option<String>,
    pub duration_secs: u64,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
}

/// One gallery image
#[derive(Debug, Clone)]
pub struct GalleryImage {
    pub url: String,
    pub size: Option<ImageSize>,
}

impl GalleryImage {
    pub fn new(url: String, width: u32, height: u32) -> Self {
        let size = if width > 0 && height > 0 {
            Some(ImageSize { width, height })
        } else {
            None
        };
        Self { url, size }
    }
}

/// Pick the variant: stream present -> Video, else images -> ImageGallery
pub fn assemble(
    platform: Platform,
    parts: MediaParts,
    video: Option<VideoStream>,
    images: Vec<GalleryImage>,
) -> Result<UnifiedMedia, MapError> {
    if parts.id.is_empty() {
        return Err(MapError::MissingField("id"));
    }

    let MediaParts { id, author_name, author_avatar, title, cover_url, stats } = parts;

    if let Some(stream) = video.filter(|s| !s.url.is_empty()) {
        return Ok(UnifiedMedia::Video {
            id,
            platform,
            author_name,
            author_avatar,
            title,
            cover_url,
            stats,
            video_url: stream.url,
            dynamic_cover_url: stream.dynamic_cover_url,
            duration: stream.duration_secs,
            width: stream.width,
            height: stream.height,
            aspect_ratio: aspect_ratio(stream.width, stream.height),
            file_size: stream.file_size,
        });
    }

    let images: Vec<GalleryImage> = images.into_iter().filter(|i| !i.url.is_empty()).collect();
    if images.is_empty() {
        return Err(MapError::NoMedia);
    }

    // Sizes are reported only when every image has one
    let image_sizes: Option<Vec<ImageSize>> = images.iter().map(|i| i.size).collect();
    let cover_url = if cover_url.is_empty() {
        images[0].url.clone()
    } else {
        cover_url
    };

    Ok(UnifiedMedia::ImageGallery {
        id,
        platform,
        author_name,
        author_avatar,
        title,
        cover_url,
        stats,
        image_urls: images.into_iter().map(|i| i.url).collect(),
        image_sizes,
    })
}

/// Elements of the first array found at `paths`
pub fn array<'a>(v: &'a Value, paths: &[&str]) -> &'a [Value] {
    paths
        .iter()
        .find_map(|p| v.pointer(p).and_then(Value::as_array).filter(|a| !a.is_empty()))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// First object found at `paths`
pub fn object<'a>(v: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|p| v.pointer(p).filter(|o| o.is_object()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parts(id: &str) -> MediaParts {
        MediaParts { id: id.to_string(), ..Default::default() }
    }

    #[test]
    fn test_ms_to_secs_truncates() {
        assert_eq!(ms_to_secs(15000), 15);
        assert_eq!(ms_to_secs(999), 0);
        assert_eq!(ms_to_secs(1999), 1);
    }

    #[test]
    fn test_watermark_rewrite_only_touches_path() {
        let url = "https://aweme.snssdk.com/aweme/v1/playwm/?video_id=v0200f&ratio=720p&line=0";
        assert_eq!(
            remove_watermark(url, "/playwm/", "/play/"),
            "https://aweme.snssdk.com/aweme/v1/play/?video_id=v0200f&ratio=720p&line=0"
        );
        let query_only = "https://cdn.example.com/v1/play/?next=/playwm/";
        assert_eq!(remove_watermark(query_only, "/playwm/", "/play/"), query_only);
    }

    #[test]
    fn test_parse_count_variants() {
        assert_eq!(parse_count(&json!(12)), Some(12));
        assert_eq!(parse_count(&json!(-3)), Some(0));
        assert_eq!(parse_count(&json!(4.7)), Some(4));
        assert_eq!(parse_count(&json!("1,024")), Some(1024));
        assert_eq!(parse_count(&json!("1.2万")), Some(12_000));
        assert_eq!(parse_count(&json!("3w")), Some(30_000));
        assert_eq!(parse_count(&json!("5.1k")), Some(5_100));
        assert_eq!(parse_count(&json!("10+")), Some(10));
        assert_eq!(parse_count(&json!("2亿")), Some(200_000_000));
        assert_eq!(parse_count(&json!("")), None);
        assert_eq!(parse_count(&json!("赞")), None);
        assert_eq!(parse_count(&json!(null)), None);
    }

    #[test]
    fn test_count_falls_back_across_paths() {
        let v = json!({"stats": {"diggCount": "7"}, "statistics": {"digg_count": null}});
        assert_eq!(count(&v, &["/statistics/digg_count", "/stats/diggCount"]), 7);
        assert_eq!(count(&v, &["/missing"]), 0);
    }

    #[test]
    fn test_first_url_shapes() {
        let v = json!({
            "a": ["", "https://a/1"],
            "b": [{"url": "https://b/1"}],
            "c": "https://c/1",
        });
        assert_eq!(first_url(&v, &["/missing", "/a"]).as_deref(), Some("https://a/1"));
        assert_eq!(first_url(&v, &["/b"]).as_deref(), Some("https://b/1"));
        assert_eq!(first_url(&v, &["/c"]).as_deref(), Some("https://c/1"));
        assert_eq!(first_url(&v, &["/nope"]), None);
    }

    #[test]
    fn test_assemble_prefers_video() {
        let stream = VideoStream { url: "https://v/1.mp4".to_string(), width: 720, height: 1280, ..Default::default() };
        let media = assemble(
            Platform::Douyin,
            parts("1"),
            Some(stream),
            vec![GalleryImage::new("https://i/1".to_string(), 1, 1)],
        )
        .unwrap();
        match media {
            UnifiedMedia::Video { aspect_ratio, .. } => assert_eq!(aspect_ratio, Some(0.5625)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_assemble_gallery_and_sizes() {
        let media = assemble(
            Platform::Xiaohongshu,
            parts("n"),
            None,
            vec![
                GalleryImage::new("https://i/1".to_string(), 100, 200),
                GalleryImage::new("https://i/2".to_string(), 0, 0),
            ],
        )
        .unwrap();
        match media {
            UnifiedMedia::ImageGallery { image_urls, image_sizes, cover_url, .. } => {
                assert_eq!(image_urls, vec!["https://i/1", "https://i/2"]);
                assert_eq!(image_sizes, None);
                assert_eq!(cover_url, "https://i/1");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_assemble_without_media_fails() {
        let empty_stream = VideoStream::default();
        assert_eq!(
            assemble(Platform::Douyin, parts("1"), Some(empty_stream), Vec::new()).unwrap_err(),
            MapError::NoMedia
        );
        assert_eq!(
            assemble(Platform::Douyin, parts(""), None, Vec::new()).unwrap_err(),
            MapError::MissingField("id")
        );
    }
}
