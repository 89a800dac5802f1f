//! Emoji dataset loading
//!
//! Reads the `emoji.json` layout published by iamcal/emoji-data: a JSON array
//! of entries, each with aliases, codepoints, per-platform image flags and an
//! optional map of skin-tone variations.
//!
//! Loading degrades instead of failing. Only a container that is not a JSON
//! array aborts; a bad entry or variation is dropped, logged, and listed in
//! the [`LoadReport`].

use crate::error::DatasetError;
use crate::record::{decode_codepoints, EmojiRecord, Platform, PlatformSet};
use crate::tones::ToneTable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One entry of the dataset, as found on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiEntry {
    pub short_names: Vec<String>,
    pub unified: Option<String>,
    pub non_qualified: Option<String>,
    pub has_img_apple: bool,
    pub has_img_google: bool,
    pub has_img_twitter: bool,
    pub has_img_facebook: bool,
    /// Tone variations keyed by modifier codepoints (`1F3FB`, `1F3FB-1F3FC`),
    /// in document order
    pub skin_variations: IndexMap<String, EmojiEntry>,
}

impl EmojiEntry {
    fn platforms(&self) -> PlatformSet {
        PlatformSet::empty()
            .with(Platform::Apple, self.has_img_apple)
            .with(Platform::Google, self.has_img_google)
            .with(Platform::Twitter, self.has_img_twitter)
            .with(Platform::Facebook, self.has_img_facebook)
    }

    /// Codepoints used for matching; the non-qualified form wins when present
    fn match_code(&self) -> Option<&str> {
        self.non_qualified
            .as_deref()
            .filter(|code| !code.is_empty())
            .or(self.unified.as_deref().filter(|code| !code.is_empty()))
    }

    /// Build a record from this entry.
    ///
    /// `alias` replaces the entry's own aliases; variants are built this way.
    pub fn to_record(&self, alias: Option<String>) -> Result<EmojiRecord, DatasetError> {
        let short_codes = match alias {
            Some(alias) => vec![alias],
            None => self.short_names.clone(),
        };
        if short_codes.is_empty() {
            return Err(DatasetError::MissingShortCode);
        }

        let code = self.match_code().unwrap_or_default();
        let literal = decode_codepoints(code).map_err(|source| DatasetError::Codepoints {
            code: code.to_string(),
            source,
        })?;

        let unified_code = self
            .unified
            .as_deref()
            .filter(|code| !code.is_empty())
            .unwrap_or(code)
            .to_ascii_uppercase();

        Ok(EmojiRecord {
            short_codes,
            unified_code,
            non_qualified_code: self.non_qualified.clone().filter(|code| !code.is_empty()),
            platforms: self.platforms(),
            literal,
        })
    }
}

/// A record that was left out of the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRecord {
    /// Alias the record would have had, if known
    pub alias: Option<String>,
    /// Codepoint string of the record, if known
    pub code: Option<String>,
    pub reason: String,
}

/// Summary of a dataset load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Top-level entries seen
    pub entries: usize,
    /// Records kept, base and variants
    pub records: usize,
    /// Tone variant records kept
    pub variants: usize,
    pub dropped: Vec<DroppedRecord>,
}

impl LoadReport {
    fn drop_record(&mut self, alias: Option<String>, code: Option<String>, reason: DatasetError) {
        match reason {
            DatasetError::UnresolvedToneKey(_) => {
                tracing::error!(?alias, "Dropping emoji variation: {}", reason)
            }
            _ => tracing::warn!(?alias, ?code, "Dropping emoji: {}", reason),
        }
        self.dropped.push(DroppedRecord {
            alias,
            code,
            reason: reason.to_string(),
        });
    }
}

/// Records produced by a load, in discovery order
#[derive(Debug, Default)]
pub struct LoadedDataset {
    pub records: Vec<EmojiRecord>,
    pub report: LoadReport,
}

/// Turns dataset entries into records, expanding skin-tone variations
#[derive(Debug)]
pub struct DatasetLoader {
    tones: ToneTable,
    loaded: LoadedDataset,
}

impl DatasetLoader {
    pub fn new(tones: ToneTable) -> Self {
        Self {
            tones,
            loaded: LoadedDataset::default(),
        }
    }

    /// Parse a whole dataset document.
    ///
    /// Fails only when `json` is not an array; everything else is reported.
    pub fn parse(tones: ToneTable, json: &str) -> Result<LoadedDataset, DatasetError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;

        let mut loader = Self::new(tones);
        for value in values {
            match serde_json::from_value::<EmojiEntry>(value) {
                Ok(entry) => loader.add_entry(&entry),
                Err(err) => {
                    loader.loaded.report.entries += 1;
                    loader.loaded.report.drop_record(
                        None,
                        None,
                        DatasetError::Entry(err.to_string()),
                    );
                }
            }
        }

        Ok(loader.finish())
    }

    /// Add one entry and its skin variations
    pub fn add_entry(&mut self, entry: &EmojiEntry) {
        self.loaded.report.entries += 1;

        let primary = entry.short_names.first().cloned();
        match entry.to_record(None) {
            Ok(record) => self.push(record),
            Err(err) => self.loaded.report.drop_record(
                primary.clone(),
                entry.match_code().map(str::to_string),
                err,
            ),
        }

        for (key, variation) in &entry.skin_variations {
            let code = variation.match_code().map(str::to_string);
            let Some(base) = primary.as_deref() else {
                self.loaded
                    .report
                    .drop_record(None, code, DatasetError::MissingShortCode);
                continue;
            };

            let alias = match self.tones.variant_alias(base, key) {
                Ok(alias) => alias,
                Err(err) => {
                    self.loaded
                        .report
                        .drop_record(Some(base.to_string()), code, err);
                    continue;
                }
            };

            match variation.to_record(Some(alias.clone())) {
                Ok(record) => {
                    self.loaded.report.variants += 1;
                    self.push(record);
                }
                Err(err) => self.loaded.report.drop_record(Some(alias), code, err),
            }
        }
    }

    fn push(&mut self, record: EmojiRecord) {
        self.loaded.report.records += 1;
        self.loaded.records.push(record);
    }

    pub fn finish(self) -> LoadedDataset {
        self.loaded
    }
}
