//! Splitting text into literal runs and emoji
//!
//! The scanner walks the UTF-8 bytes of the input. Continuation bytes are
//! never match starts; they are only consumed as part of a match that began
//! on the byte before them. At each start position the candidate bucket for
//! the leading character is tried in order, and since buckets are sorted
//! longest first the first hit is the longest emoji starting there.

use crate::index::EmojiIndex;
use crate::record::EmojiId;

/// A piece of scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'t> {
    /// Text that is not an emoji, borrowed from the input
    Text(&'t str),
    /// A matched emoji; its literal is exactly the text it replaced
    Emoji(EmojiId),
}

fn is_continuation_byte(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

impl EmojiIndex {
    /// Split `text` into literal runs and emoji, in order.
    ///
    /// Concatenating the text of every segment (an emoji contributes its
    /// record's literal) gives back `text` exactly.
    pub fn scan<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let bytes = text.as_bytes();
        let mut segments = Vec::new();
        let mut last_end = 0;
        let mut i = 0;

        while i < bytes.len() {
            if is_continuation_byte(bytes[i]) {
                i += 1;
                continue;
            }

            let Some((id, len)) = self.match_at(text, i) else {
                i += 1;
                continue;
            };

            if i > last_end {
                segments.push(Segment::Text(&text[last_end..i]));
            }
            segments.push(Segment::Emoji(id));

            i += len;
            last_end = i;
        }

        if last_end < bytes.len() {
            segments.push(Segment::Text(&text[last_end..]));
        }

        segments
    }

    /// Longest emoji starting at byte `start`, with its length in bytes.
    ///
    /// `start` must be a char boundary of `text`.
    pub fn match_at(&self, text: &str, start: usize) -> Option<(EmojiId, usize)> {
        let rest = text.get(start..)?;
        let leading = rest.chars().next()?;
        let skip = leading.len_utf8();

        for &id in self.candidates(leading) {
            let Some(record) = self.get(id) else {
                continue;
            };
            let literal = record.literal.as_bytes();
            if literal.len() > rest.len() {
                continue;
            }
            if rest.as_bytes()[skip..literal.len()] == literal[skip..] {
                return Some((id, literal.len()));
            }
        }

        None
    }
}
