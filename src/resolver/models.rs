// Unified media model shared by every platform mapper

use serde::{Deserialize, Serialize};

use super::platform::Platform;

/// Engagement counters; absent upstream values are 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub like_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
    pub collect_count: u64,
    pub play_count: u64,
}

/// Pixel dimensions of one gallery image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Normalized description of one piece of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UnifiedMedia {
    Video {
        id: String,
        platform: Platform,
        author_name: String,
        author_avatar: String,
        title: String,
        cover_url: String,
        stats: Statistics,
        video_url: String,
        dynamic_cover_url: Option<String>,
        /// Whole seconds
        duration: u64,
        width: u32,
        height: u32,
        aspect_ratio: Option<f64>,
        file_size: Option<u64>,
    },
    ImageGallery {
        id: String,
        platform: Platform,
        author_name: String,
        author_avatar: String,
        title: String,
        cover_url: String,
        stats: Statistics,
        image_urls: Vec<String>,
        /// Parallel to `image_urls` when present
        image_sizes: Option<Vec<ImageSize>>,
    },
}

impl UnifiedMedia {
    pub fn id(&self) -> &str {
        match self {
            Self::Video { id, .. } | Self::ImageGallery { id, .. } => id,
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            Self::Video { platform, .. } | Self::ImageGallery { platform, .. } => *platform,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Video { title, .. } | Self::ImageGallery { title, .. } => title,
        }
    }

    pub fn author_name(&self) -> &str {
        match self {
            Self::Video { author_name, .. } | Self::ImageGallery { author_name, .. } => author_name,
        }
    }

    pub fn stats(&self) -> &Statistics {
        match self {
            Self::Video { stats, .. } | Self::ImageGallery { stats, .. } => stats,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video { .. })
    }
}

/// Wall-clock duration of each pipeline stage, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTimings {
    pub extract_ms: u64,
    pub shortlink_ms: u64,
    pub classify_ms: u64,
    pub poll_ms: u64,
}

/// Finished resolution handed to the UI layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    media: UnifiedMedia,
    parse_time_ms: u64,
    network_time_ms: u64,
    estimated_cost: f64,
    api_calls: u32,
    timings: StageTimings,
}

impl ResolutionResult {
    pub fn new(media: UnifiedMedia, parse_time_ms: u64, api_calls: u32, timings: StageTimings) -> Self {
        let estimated_cost = estimate_cost(media.platform(), api_calls);
        Self {
            media,
            parse_time_ms,
            network_time_ms: timings.shortlink_ms + timings.poll_ms,
            estimated_cost,
            api_calls,
            timings,
        }
    }

    pub fn media(&self) -> &UnifiedMedia {
        &self.media
    }

    pub fn into_media(self) -> UnifiedMedia {
        self.media
    }

    pub fn parse_time_ms(&self) -> u64 {
        self.parse_time_ms
    }

    pub fn network_time_ms(&self) -> u64 {
        self.network_time_ms
    }

    pub fn estimated_cost(&self) -> f64 {
        self.estimated_cost
    }

    pub fn api_calls(&self) -> u32 {
        self.api_calls
    }

    pub fn timings(&self) -> &StageTimings {
        &self.timings
    }
}

/// Advisory cost of `calls` provider calls, rounded to 1/10000 USD
pub fn estimate_cost(platform: Platform, calls: u32) -> f64 {
    let raw = platform.cost_per_call() * f64::from(calls);
    (raw * 10_000.0).round() / 10_000.0
}
