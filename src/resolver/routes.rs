// Provider routes per platform
//
// Endpoints are listed primary first. The request path is
// /api/v1/{platform api token}/{path}?{param}={id or url}

use super::mappers::{self, Mapper};
use super::platform::Platform;

/// What an endpoint is queried with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteArg {
    /// The extracted content id
    Id,
    /// The full (expanded) content URL
    Url,
}

/// One provider operation
#[derive(Debug, Clone, Copy)]
pub struct EndpointSpec {
    pub label: &'static str,
    /// `{variant}/{operation}`
    pub path: &'static str,
    pub param: &'static str,
    pub arg: RouteArg,
}

impl EndpointSpec {
    const fn id(label: &'static str, path: &'static str, param: &'static str) -> Self {
        Self { label, path, param, arg: RouteArg::Id }
    }

    const fn url(label: &'static str, path: &'static str, param: &'static str) -> Self {
        Self { label, path, param, arg: RouteArg::Url }
    }

    /// Request path for `platform`
    pub fn request_path(&self, platform: Platform) -> String {
        format!("/api/v1/{}/{}", platform.api_token(), self.path)
    }

    /// Query pairs for this endpoint
    pub fn query(&self, id: &str, url: &str) -> Vec<(String, String)> {
        let value = match self.arg {
            RouteArg::Id => id,
            RouteArg::Url => url,
        };
        vec![(self.param.to_string(), value.to_string())]
    }
}

/// Endpoints and mapper for one platform
#[derive(Clone, Copy)]
pub struct Route {
    pub endpoints: &'static [EndpointSpec],
    pub mapper: Mapper,
}

const DOUYIN: &[EndpointSpec] = &[
    EndpointSpec::id("app_v3", "app/v3/fetch_one_video", "aweme_id"),
    EndpointSpec::id("web", "web/fetch_one_video", "aweme_id"),
    EndpointSpec::url("app_v3_share_url", "app/v3/fetch_one_video_by_share_url", "share_url"),
];

const TIKTOK: &[EndpointSpec] = &[
    EndpointSpec::id("app_v3", "app/v3/fetch_one_video", "aweme_id"),
    EndpointSpec::id("web", "web/fetch_post_detail", "itemId"),
    EndpointSpec::url("app_v3_share_url", "app/v3/fetch_one_video_by_share_url", "share_url"),
];

const KUAISHOU: &[EndpointSpec] = &[
    EndpointSpec::id("web", "web/fetch_one_video", "photo_id"),
    EndpointSpec::url("app_share_url", "app/fetch_one_video_by_url", "url"),
];

const XIAOHONGSHU: &[EndpointSpec] = &[
    EndpointSpec::id("web_v2", "web/get_note_info_v2", "note_id"),
    EndpointSpec::id("app", "app/get_note_info", "note_id"),
    EndpointSpec::url("web_share_url", "web/get_note_info_v4", "share_text"),
];

const WEIBO: &[EndpointSpec] = &[
    EndpointSpec::id("web_v2", "web_v2/fetch_post_detail", "id"),
    EndpointSpec::id("app", "app/fetch_status_detail", "status_id"),
];

const INSTAGRAM: &[EndpointSpec] = &[
    EndpointSpec::url("v1_url", "v1/fetch_post_by_url", "post_url"),
    EndpointSpec::id("web_app", "web_app/fetch_post_info_by_code", "code"),
];

const TWITTER: &[EndpointSpec] = &[
    EndpointSpec::id("web", "web/fetch_tweet_detail", "tweet_id"),
    EndpointSpec::id("web_v2", "web/fetch_tweet_detail_v2", "tweet_id"),
];

const BILIBILI: &[EndpointSpec] = &[
    EndpointSpec::id("web", "web/fetch_one_video", "bv_id"),
    EndpointSpec::id("app", "app/fetch_one_video", "bv_id"),
];

const YOUTUBE: &[EndpointSpec] = &[
    EndpointSpec::id("web", "web/get_video_info", "video_id"),
    EndpointSpec::id("web_v2", "web/get_video_info_v2", "video_id"),
];

const XIGUA: &[EndpointSpec] = &[
    EndpointSpec::id("app_v2", "app/v2/fetch_one_video", "item_id"),
    EndpointSpec::id("app_v2_play", "app/v2/fetch_one_video_play_url", "item_id"),
];

/// Route for `platform`, or `None` when it cannot be resolved
pub fn route_for(platform: Platform) -> Option<Route> {
    let endpoints = match platform {
        Platform::Douyin => DOUYIN,
        Platform::TikTok => TIKTOK,
        Platform::Kuaishou => KUAISHOU,
        Platform::Xiaohongshu => XIAOHONGSHU,
        Platform::Weibo => WEIBO,
        Platform::Instagram => INSTAGRAM,
        Platform::Twitter => TWITTER,
        Platform::Bilibili => BILIBILI,
        Platform::YouTube => YOUTUBE,
        Platform::Xigua => XIGUA,
        Platform::Unknown => return None,
    };

    Some(Route {
        endpoints,
        mapper: mappers::mapper_for(platform)?,
    })
}
