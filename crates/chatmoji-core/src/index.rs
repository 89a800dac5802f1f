//! Lookup structures over a loaded record set
//!
//! An [`EmojiIndex`] is built once from the full record set and never
//! modified afterwards. It owns the records in an arena and keeps three
//! maps of [`EmojiId`]s:
//!
//! - leading character -> candidates, longest literal first (text scanning)
//! - lowercased alias -> record (shortcode substitution and completion)
//! - unified code -> record (reverse lookup, e.g. for a picker)

use crate::record::{EmojiId, EmojiRecord};
use std::collections::HashMap;

/// Immutable emoji lookup tables
#[derive(Debug, Default)]
pub struct EmojiIndex {
    records: Vec<EmojiRecord>,
    by_leading_char: HashMap<char, Vec<EmojiId>>,
    by_short_code: HashMap<String, EmojiId>,
    by_unified_code: HashMap<String, EmojiId>,
    /// Every alias, sorted and de-duplicated
    short_codes: Vec<String>,
}

impl EmojiIndex {
    /// Index `records` in discovery order.
    ///
    /// Records with an empty literal are skipped; the loader never produces
    /// them. Later records win on alias and unified code collisions.
    pub fn build(records: Vec<EmojiRecord>) -> Self {
        let mut index = Self::default();

        for record in records {
            let Some(leading) = record.leading_char() else {
                tracing::warn!(
                    alias = record.primary_short_code(),
                    "Skipping emoji with empty text"
                );
                continue;
            };

            let id = EmojiId(index.records.len() as u32);

            index.by_leading_char.entry(leading).or_default().push(id);

            for short_code in &record.short_codes {
                let key = short_code.to_lowercase();
                index.short_codes.push(key.clone());
                index.by_short_code.insert(key, id);
            }

            index
                .by_unified_code
                .insert(record.unified_code.to_ascii_uppercase(), id);

            index.records.push(record);
        }

        // Stable: equal lengths keep discovery order.
        let records = &index.records;
        for bucket in index.by_leading_char.values_mut() {
            bucket.sort_by(|a, b| {
                let a = records[a.index()].literal.len();
                let b = records[b.index()].literal.len();
                b.cmp(&a)
            });
        }

        index.short_codes.sort();
        index.short_codes.dedup();

        index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: EmojiId) -> Option<&EmojiRecord> {
        self.records.get(id.index())
    }

    /// All records with their ids, in discovery order
    pub fn records(&self) -> impl Iterator<Item = (EmojiId, &EmojiRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (EmojiId(i as u32), record))
    }

    /// Candidates whose literal starts with `leading`, longest first
    pub fn candidates(&self, leading: char) -> &[EmojiId] {
        self.by_leading_char
            .get(&leading)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up an alias without its colons, ignoring case
    pub fn by_short_code(&self, short_code: &str) -> Option<EmojiId> {
        self.by_short_code.get(&short_code.to_lowercase()).copied()
    }

    pub fn by_unified_code(&self, unified_code: &str) -> Option<EmojiId> {
        self.by_unified_code
            .get(&unified_code.to_ascii_uppercase())
            .copied()
    }

    /// Sorted list of every known alias
    pub fn short_codes(&self) -> &[String] {
        &self.short_codes
    }

    /// Aliases starting with `prefix`, in sorted order, at most `limit`
    pub fn complete(&self, prefix: &str, limit: usize) -> Vec<&str> {
        let prefix = prefix.to_lowercase();
        let start = self.short_codes.partition_point(|code| code.as_str() < prefix.as_str());
        self.short_codes[start..]
            .iter()
            .take_while(|code| code.starts_with(&prefix))
            .take(limit)
            .map(String::as_str)
            .collect()
    }
}
