//! Skin-tone names for variant aliases
//!
//! The dataset keys skin variations by the tone modifier codepoints
//! (`1F3FB`, or `1F3FB-1F3FC` for two-person emoji). Variant aliases use
//! tone names instead, so `+1` with key `1F3FD` becomes `+1_tone3`.

use crate::error::DatasetError;

/// Lookup table from tone modifier codepoint to tone name
#[derive(Debug, Clone, Copy)]
pub struct ToneTable {
    entries: &'static [(&'static str, &'static str)],
}

impl ToneTable {
    /// Fitzpatrick modifiers U+1F3FB..U+1F3FF
    pub const STANDARD: ToneTable = ToneTable {
        entries: &[
            ("1F3FB", "tone1"),
            ("1F3FC", "tone2"),
            ("1F3FD", "tone3"),
            ("1F3FE", "tone4"),
            ("1F3FF", "tone5"),
        ],
    };

    pub fn get(&self, code: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(code))
            .map(|(_, name)| *name)
    }

    /// Translate a variation key into hyphen-joined tone names, in key order.
    ///
    /// Unknown segments are skipped. A key with no known segment at all is
    /// an error, never an empty name.
    pub fn tone_names(&self, key: &str) -> Result<String, DatasetError> {
        let mut names = Vec::new();
        for part in key.split('-') {
            match self.get(part) {
                Some(name) => names.push(name),
                None => {
                    tracing::debug!("Tone with key {:?} does not exist in tone names map", part);
                }
            }
        }

        if names.is_empty() {
            return Err(DatasetError::UnresolvedToneKey(key.to_string()));
        }

        Ok(names.join("-"))
    }

    /// Alias for a variation of `base`, e.g. `wave_tone2`
    pub fn variant_alias(&self, base: &str, key: &str) -> Result<String, DatasetError> {
        Ok(format!("{}_{}", base, self.tone_names(key)?))
    }
}

impl Default for ToneTable {
    fn default() -> Self {
        Self::STANDARD
    }
}
