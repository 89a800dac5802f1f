//! # Chatmoji Core
//!
//! Emoji recognition and shortcode substitution for chat text.
//!
//! This crate provides:
//! - Loading of the iamcal `emoji.json` dataset, including skin-tone variants
//! - Lookup indices by leading character, alias and unified code
//! - Scanning of text into literal runs and emoji
//! - `:shortcode:` replacement
//! - Per-platform render handles, swapped atomically on preference changes
//!
//! ```text
//!   text ──► scan ──► [Text("hi "), Emoji(wave)]
//!   ":wave:" ──► replace_short_codes ──► "👋"
//! ```

pub mod engine;
pub mod error;
pub mod handles;
pub mod index;
pub mod loader;
pub mod record;
pub mod scanner;
mod shortcodes;
pub mod tones;

pub use engine::{EmojiState, Emojis, Fragment};
pub use error::{CodepointError, CoreError, DatasetError, Result};
pub use handles::{
    resolve_handles, AssetSources, EmojiHandle, HandleSnapshot, FALLBACK_ASSET_BASE,
    FALLBACK_PLATFORM, IMAGE_SCALE,
};
pub use index::EmojiIndex;
pub use loader::{DatasetLoader, DroppedRecord, EmojiEntry, LoadReport, LoadedDataset};
pub use record::{decode_codepoints, EmojiId, EmojiRecord, Platform, PlatformSet, MAX_CODEPOINTS};
pub use scanner::Segment;
pub use tones::ToneTable;

/// Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the core engine with default settings
pub fn init() -> Result<()> {
    tracing::info!("Initializing Chatmoji Core v{}", VERSION);
    Ok(())
}
