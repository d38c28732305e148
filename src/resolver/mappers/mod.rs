// Platform payload mappers
//
// Each mapper is a pure function from a provider payload to `UnifiedMedia`.

pub mod common;

pub mod bilibili;
pub mod douyin;
pub mod instagram;
pub mod kuaishou;
pub mod tiktok;
pub mod twitter;
pub mod weibo;
pub mod xiaohongshu;
pub mod xigua;
pub mod youtube;

use serde_json::Value;

use super::errors::MapError;
use super::models::UnifiedMedia;
use super::platform::Platform;

/// Payload -> unified model
pub type Mapper = fn(&Value) -> Result<UnifiedMedia, MapError>;

/// Mapper for `platform`
pub fn mapper_for(platform: Platform) -> Option<Mapper> {
    let mapper: Mapper = match platform {
        Platform::Douyin => douyin::map,
        Platform::TikTok => tiktok::map,
        Platform::Kuaishou => kuaishou::map,
        Platform::Xiaohongshu => xiaohongshu::map,
        Platform::Weibo => weibo::map,
        Platform::Instagram => instagram::map,
        Platform::Twitter => twitter::map,
        Platform::Bilibili => bilibili::map,
        Platform::YouTube => youtube::map,
        Platform::Xigua => xigua::map,
        Platform::Unknown => return None,
    };
    Some(mapper)
}
