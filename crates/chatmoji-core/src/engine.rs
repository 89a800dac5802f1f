//! Published emoji state
//!
//! [`Emojis`] holds the current index and handle snapshot behind a single
//! shared pointer. Loads and platform changes build a complete new state off
//! to the side and swap it in under a short write lock, so readers only ever
//! see a finished index with handles resolved for it. Writers are serialized
//! by a separate mutex; readers never wait on a build.

use crate::error::Result;
use crate::handles::{resolve_handles, AssetSources, EmojiHandle, HandleSnapshot};
use crate::index::EmojiIndex;
use crate::loader::{DatasetLoader, LoadReport};
use crate::record::{EmojiId, EmojiRecord, Platform};
use crate::scanner::Segment;
use crate::tones::ToneTable;
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;

/// Scanned text, ready for a renderer
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Emoji(Arc<EmojiHandle>),
}

/// One consistent view of the emoji tables
#[derive(Debug, Default)]
pub struct EmojiState {
    index: Arc<EmojiIndex>,
    handles: Arc<HandleSnapshot>,
    sources: AssetSources,
}

impl EmojiState {
    pub fn index(&self) -> &EmojiIndex {
        &self.index
    }

    pub fn handles(&self) -> &HandleSnapshot {
        &self.handles
    }

    pub fn platform(&self) -> Platform {
        self.handles.platform()
    }

    pub fn handle(&self, id: EmojiId) -> Option<&Arc<EmojiHandle>> {
        self.handles.get(id)
    }

    /// Look up a record and its handle by alias
    pub fn by_short_code(&self, short_code: &str) -> Option<(&EmojiRecord, &Arc<EmojiHandle>)> {
        let id = self.index.by_short_code(short_code)?;
        Some((self.index.get(id)?, self.handles.get(id)?))
    }

    /// Split `text` into text and emoji handles
    pub fn parse(&self, text: &str) -> Vec<Fragment> {
        self.index
            .scan(text)
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => Fragment::Text(text.to_string()),
                Segment::Emoji(id) => match self.handles.get(id) {
                    Some(handle) => Fragment::Emoji(Arc::clone(handle)),
                    None => Fragment::Text(
                        self.index
                            .get(id)
                            .map(|record| record.literal.clone())
                            .unwrap_or_default(),
                    ),
                },
            })
            .collect()
    }

    pub fn replace_short_codes(&self, text: &str) -> String {
        self.index.replace_short_codes(text)
    }
}

/// Shared emoji engine
#[derive(Debug)]
pub struct Emojis {
    state: RwLock<Arc<EmojiState>>,
    /// Serializes loads and handle resolution passes
    update: Mutex<()>,
    tones: ToneTable,
}

impl Default for Emojis {
    fn default() -> Self {
        Self::new(Platform::default(), AssetSources::default())
    }
}

impl Emojis {
    /// Create an empty engine; it matches nothing until a dataset is loaded
    pub fn new(platform: Platform, sources: AssetSources) -> Self {
        let state = EmojiState {
            index: Arc::default(),
            handles: Arc::new(resolve_handles(&EmojiIndex::default(), platform, &sources)),
            sources,
        };

        Self {
            state: RwLock::new(Arc::new(state)),
            update: Mutex::new(()),
            tones: ToneTable::STANDARD,
        }
    }

    pub fn with_tones(mut self, tones: ToneTable) -> Self {
        self.tones = tones;
        self
    }

    /// Current state; cheap, and stays valid across later reloads
    pub fn snapshot(&self) -> Arc<EmojiState> {
        Arc::clone(&*self.state.read())
    }

    fn publish(&self, state: EmojiState) {
        *self.state.write() = Arc::new(state);
    }

    /// Load a dataset document and publish it.
    ///
    /// If the document is not a JSON array nothing is published and the
    /// previous state stays in place.
    pub fn load_str(&self, json: &str) -> Result<LoadReport> {
        let loaded = match DatasetLoader::parse(self.tones, json) {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::warn!("Failed to load emoji dataset: {}", err);
                return Err(err.into());
            }
        };
        let index = Arc::new(EmojiIndex::build(loaded.records));

        let _guard = self.update.lock();
        let current = self.snapshot();
        let handles = resolve_handles(&index, current.platform(), &current.sources);
        self.publish(EmojiState {
            index,
            handles: Arc::new(handles),
            sources: current.sources.clone(),
        });

        let report = loaded.report;
        tracing::info!(
            entries = report.entries,
            records = report.records,
            variants = report.variants,
            dropped = report.dropped.len(),
            "Loaded emoji dataset"
        );
        Ok(report)
    }

    /// Read and load a dataset file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            tracing::warn!("Failed to read emoji dataset {}: {}", path.display(), err);
            err
        })?;
        self.load_str(&json)
    }

    /// Resolve handles for a new platform preference and publish them
    pub fn set_platform(&self, platform: Platform) {
        self.reconfigure(platform, None);
    }

    /// Replace the image sources and re-resolve for the current platform
    pub fn set_asset_sources(&self, sources: AssetSources) {
        let platform = self.snapshot().platform();
        self.reconfigure(platform, Some(sources));
    }

    /// Re-resolve every handle.
    ///
    /// Only one pass runs at a time; readers keep the previous snapshot until
    /// the new one is complete.
    pub fn reconfigure(&self, platform: Platform, sources: Option<AssetSources>) {
        let _guard = self.update.lock();
        let current = self.snapshot();
        let sources = sources.unwrap_or_else(|| current.sources.clone());

        let handles = resolve_handles(&current.index, platform, &sources);
        self.publish(EmojiState {
            index: Arc::clone(&current.index),
            handles: Arc::new(handles),
            sources,
        });

        tracing::debug!(%platform, "Resolved emoji handles");
    }

    pub fn parse(&self, text: &str) -> Vec<Fragment> {
        self.snapshot().parse(text)
    }

    pub fn replace_short_codes(&self, text: &str) -> String {
        self.snapshot().replace_short_codes(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const DATASET: &str = r#"[
        {
            "short_names": ["wave"],
            "unified": "1F44B",
            "has_img_apple": true,
            "has_img_twitter": true,
            "skin_variations": {
                "1F3FB": { "unified": "1F44B-1F3FB", "has_img_twitter": true },
                "1F3FF": { "unified": "1F44B-1F3FF", "has_img_apple": true, "has_img_twitter": true }
            }
        },
        {
            "short_names": ["heart"],
            "unified": "2764-FE0F",
            "non_qualified": "2764",
            "has_img_twitter": true
        },
        {
            "short_names": ["smile"],
            "unified": "1F604",
            "has_img_apple": true,
            "has_img_google": true,
            "has_img_twitter": true
        }
    ]"#;

    fn loaded() -> Emojis {
        let emojis = Emojis::default();
        emojis.load_str(DATASET).unwrap();
        emojis
    }

    fn kinds(fragments: &[Fragment]) -> Vec<String> {
        fragments
            .iter()
            .map(|fragment| match fragment {
                Fragment::Text(text) => format!("text:{text}"),
                Fragment::Emoji(handle) => handle.tooltip.clone(),
            })
            .collect()
    }

    #[test]
    fn test_empty_engine_is_pass_through() {
        let emojis = Emojis::default();
        assert_eq!(
            emojis.parse("hi \u{1F44B}"),
            vec![Fragment::Text("hi \u{1F44B}".to_string())]
        );
        assert_eq!(emojis.replace_short_codes(":wave:"), ":wave:");
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let emojis = Emojis::default();
        assert!(emojis.load_str("{ broken").is_err());
        assert!(emojis.snapshot().index().is_empty());

        emojis.load_str(DATASET).unwrap();
        assert!(emojis.load_str("not json").is_err());
        assert_eq!(emojis.snapshot().index().len(), 5);
    }

    #[test]
    fn test_variants_are_independent_records() {
        let emojis = loaded();
        let state = emojis.snapshot();
        let index = state.index();

        let ids: Vec<_> = ["wave", "wave_tone1", "wave_tone5"]
            .iter()
            .map(|alias| index.by_short_code(alias).unwrap())
            .collect();
        assert_eq!(ids.len(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);

        let bucket = index.candidates('\u{1F44B}');
        for id in &ids {
            assert!(bucket.contains(id));
        }

        assert_eq!(
            kinds(&emojis.parse("\u{1F44B}\u{1F3FF}\u{1F44B}")),
            vec![":wave_tone5:<br/>Emoji", ":wave:<br/>Emoji"]
        );
    }

    #[test]
    fn test_parse_and_replace() {
        let emojis = loaded();
        let text = emojis.replace_short_codes("hi :wave: :Heart: :nope:");
        assert_eq!(text, "hi \u{1F44B} \u{2764} :nope:");

        assert_eq!(
            kinds(&emojis.parse(&text)),
            vec![
                "text:hi ",
                ":wave:<br/>Emoji",
                "text: ",
                ":heart:<br/>Emoji",
                "text: :nope:",
            ]
        );
    }

    #[test]
    fn test_set_platform_swaps_handles() {
        let emojis = loaded();
        let before = emojis.snapshot();

        emojis.set_platform(Platform::Apple);
        let after = emojis.snapshot();

        let (_, handle) = after.by_short_code("smile").unwrap();
        assert_eq!(handle.platform, Platform::Apple);
        assert!(handle.url.contains("/apple/64/1f604.png"));

        let (_, handle) = after.by_short_code("heart").unwrap();
        assert_eq!(handle.platform, Platform::Twitter);

        // Older snapshots are unaffected.
        let (_, handle) = before.by_short_code("smile").unwrap();
        assert_eq!(handle.platform, Platform::Twitter);
        assert!(Arc::ptr_eq(&before.index, &after.index));
    }

    #[test]
    fn test_reload_keeps_platform() {
        let emojis = loaded();
        emojis.set_platform(Platform::Google);
        emojis.load_str(DATASET).unwrap();

        let state = emojis.snapshot();
        assert_eq!(state.platform(), Platform::Google);
        assert_eq!(state.handles().len(), state.index().len());
    }

    #[test]
    fn test_set_asset_sources() {
        let emojis = loaded();
        emojis.set_asset_sources(
            AssetSources::default().with_base_url(Platform::Twitter, "https://cdn.test/tw/"),
        );
        let state = emojis.snapshot();
        let (_, handle) = state.by_short_code("heart").unwrap();
        assert_eq!(handle.url, "https://cdn.test/tw/2764-fe0f.png");
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATASET.as_bytes()).unwrap();

        let emojis = Emojis::default();
        let report = emojis.load_file(file.path()).unwrap();
        assert_eq!(report.records, 5);

        assert!(emojis.load_file("/definitely/not/here.json").is_err());
    }

    const SAMPLE: &str = include_str!("../data/emoji.sample.json");

    #[test]
    fn test_sample_dataset_report() {
        let emojis = Emojis::default();
        let report = emojis.load_str(SAMPLE).unwrap();
        assert_eq!(report.entries, 14);
        assert_eq!(report.records, 21);
        assert_eq!(report.variants, 7);
        assert!(report.dropped.is_empty());
    }

    #[test]
    fn test_sample_dataset_is_fully_reachable() {
        let emojis = Emojis::default();
        emojis.load_str(SAMPLE).unwrap();
        let state = emojis.snapshot();
        let index = state.index();

        for (id, record) in index.records() {
            for alias in &record.short_codes {
                let found = index.by_short_code(alias).unwrap();
                assert_eq!(found, id);
                let leading = index.get(found).unwrap().leading_char().unwrap();
                assert!(index.candidates(leading).contains(&found));
            }
            assert!(state.handle(id).is_some());
        }
        assert!(index.by_short_code("handshake_tone1-tone2").is_some());
    }

    #[test]
    fn test_sample_dataset_scan() {
        let emojis = Emojis::default();
        emojis.load_str(SAMPLE).unwrap();

        let text = "gg \u{1F44D}\u{1F3FD} \u{1F3F4}\u{E0067}\u{E0062}\u{E0065}\u{E006E}\u{E0067}\u{E007F}\u{1F3F4} \
                    \u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}\u{200D}\u{1F466}\u{1F468} #\u{20E3}#1";
        assert_eq!(
            kinds(&emojis.parse(text)),
            vec![
                "text:gg ",
                ":+1_tone3:<br/>Emoji",
                "text: ",
                ":flag-england:<br/>Emoji",
                ":waving_black_flag:<br/>Emoji",
                "text: ",
                ":man-woman-girl-boy:<br/>Emoji",
                ":man:<br/>Emoji",
                "text: ",
                ":hash:<br/>Emoji",
                "text:#1",
            ]
        );
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        let emojis = loaded();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let state = emojis.snapshot();
                        let platform = state.platform();
                        let (_, smile) = state.by_short_code("smile").unwrap();
                        assert_eq!(smile.platform, platform);
                        assert_eq!(state.parse("\u{1F604}").len(), 1);
                    }
                });
            }

            scope.spawn(|| {
                for i in 0..100 {
                    let platform = if i % 2 == 0 {
                        Platform::Apple
                    } else {
                        Platform::Google
                    };
                    emojis.set_platform(platform);
                }
            });
        });
    }
}
