//! Render handles for a chosen image platform
//!
//! A handle is what a renderer needs to draw an emoji: its text, an image
//! URL for the preferred platform and a tooltip. Handles are resolved for a
//! whole index at once into a [`HandleSnapshot`], which callers swap in as a
//! unit whenever the platform preference changes.

use crate::index::EmojiIndex;
use crate::record::{EmojiId, EmojiRecord, Platform};
use std::collections::HashMap;
use std::sync::Arc;

/// Used when [`AssetSources`] has no base URL for a platform
pub const FALLBACK_ASSET_BASE: &str = "https://pajbot.com/static/emoji-v2/img/twitter/64/";

/// Platform used when a record has no image for the preferred one
pub const FALLBACK_PLATFORM: Platform = Platform::Twitter;

/// Display scale of the 64px images
pub const IMAGE_SCALE: f32 = 0.35;

/// Where each platform's images are served from
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSources {
    base_urls: HashMap<Platform, String>,
}

impl Default for AssetSources {
    fn default() -> Self {
        let base_urls = Platform::ALL
            .into_iter()
            .map(|platform| {
                (
                    platform,
                    format!("https://pajbot.com/static/emoji-v2/img/{platform}/64/"),
                )
            })
            .collect();
        Self { base_urls }
    }
}

impl AssetSources {
    /// Sources with no platform configured; every URL uses the fallback base
    pub fn empty() -> Self {
        Self {
            base_urls: HashMap::new(),
        }
    }

    pub fn with_base_url(mut self, platform: Platform, base_url: impl Into<String>) -> Self {
        self.base_urls.insert(platform, base_url.into());
        self
    }

    pub fn base_url(&self, platform: Platform) -> &str {
        self.base_urls
            .get(&platform)
            .map(String::as_str)
            .unwrap_or(FALLBACK_ASSET_BASE)
    }
}

/// Renderable form of one emoji
#[derive(Debug, Clone, PartialEq)]
pub struct EmojiHandle {
    /// The emoji text itself
    pub name: String,
    /// Image location
    pub url: String,
    /// e.g. `:smile:<br/>Emoji`
    pub tooltip: String,
    pub scale: f32,
    /// Platform the image was taken from
    pub platform: Platform,
}

impl EmojiHandle {
    fn resolve(record: &EmojiRecord, preferred: Platform, sources: &AssetSources) -> Self {
        let platform = if record.platforms.supports(preferred) {
            preferred
        } else {
            FALLBACK_PLATFORM
        };

        Self {
            name: record.literal.clone(),
            url: format!(
                "{}{}.png",
                sources.base_url(platform),
                record.unified_code.to_lowercase()
            ),
            tooltip: format!(":{}:<br/>Emoji", record.primary_short_code()),
            scale: IMAGE_SCALE,
            platform,
        }
    }
}

/// Handles for every record of one index, for one platform preference
#[derive(Debug, Clone, Default)]
pub struct HandleSnapshot {
    platform: Platform,
    handles: Vec<Arc<EmojiHandle>>,
}

impl HandleSnapshot {
    /// Preferred platform this snapshot was resolved for
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn get(&self, id: EmojiId) -> Option<&Arc<EmojiHandle>> {
        self.handles.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Resolve a handle for every record in `index`.
///
/// Pure: the index is untouched and the result can be installed atomically.
pub fn resolve_handles(
    index: &EmojiIndex,
    platform: Platform,
    sources: &AssetSources,
) -> HandleSnapshot {
    let handles = index
        .records()
        .map(|(_, record)| Arc::new(EmojiHandle::resolve(record, platform, sources)))
        .collect();

    HandleSnapshot { platform, handles }
}
