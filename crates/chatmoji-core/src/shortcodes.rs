//! `:shortcode:` substitution
//!
//! Tokens are found once against the original input. Each replacement shifts
//! everything after it, so edits are applied at the original position plus
//! the signed sum of all earlier length changes.

use crate::index::EmojiIndex;
use regex::Regex;
use std::sync::LazyLock;

// Alias charset is ASCII only.
static SHORT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[-+0-9A-Za-z_]+:").expect("Invalid short code regex"));

impl EmojiIndex {
    /// Replace every known `:alias:` in `text` with its emoji.
    ///
    /// Unknown tokens are left as they are.
    pub fn replace_short_codes(&self, text: &str) -> String {
        let mut result = text.to_string();
        let mut offset: isize = 0;

        for token in SHORT_CODE_REGEX.find_iter(text) {
            let matched = token.as_str();
            let name = &matched[1..matched.len() - 1];

            let Some(record) = self.by_short_code(name).and_then(|id| self.get(id)) else {
                continue;
            };

            let start = (token.start() as isize + offset) as usize;
            result.replace_range(start..start + token.len(), &record.literal);

            offset += record.literal.len() as isize - token.len() as isize;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::record;
    use pretty_assertions::assert_eq;

    fn index() -> EmojiIndex {
        EmojiIndex::build(vec![
            record(&["smile"], "1F604", "\u{1F604}"),
            record(&["a"], "2764-FE0F", "\u{2764}"),
            record(
                &["b"],
                "1F468-200D-1F469",
                "\u{1F468}\u{200D}\u{1F469}",
            ),
            record(&["+1", "thumbsup"], "1F44D", "\u{1F44D}"),
            record(&["-1"], "1F44E", "\u{1F44E}"),
            record(&["flag-de"], "1F1E9-1F1EA", "\u{1F1E9}\u{1F1EA}"),
        ])
    }

    #[test]
    fn test_replace_single() {
        assert_eq!(
            index().replace_short_codes("hi :smile: there"),
            "hi \u{1F604} there"
        );
    }

    #[test]
    fn test_unknown_token_is_untouched() {
        let index = index();
        assert_eq!(
            index.replace_short_codes("hi :not_a_real_emoji: there"),
            "hi :not_a_real_emoji: there"
        );
        assert_eq!(index.replace_short_codes("::"), "::");
        assert_eq!(index.replace_short_codes("10:30"), "10:30");
    }

    #[test]
    fn test_multiple_matches_keep_positions() {
        assert_eq!(
            index().replace_short_codes(":a::b:"),
            "\u{2764}\u{1F468}\u{200D}\u{1F469}"
        );
        assert_eq!(
            index().replace_short_codes("x :b: y :a: z :smile:"),
            "x \u{1F468}\u{200D}\u{1F469} y \u{2764} z \u{1F604}"
        );
    }

    #[test]
    fn test_mixed_known_and_unknown() {
        assert_eq!(
            index().replace_short_codes(":nope: :+1: :zzz: :-1:"),
            ":nope: \u{1F44D} :zzz: \u{1F44E}"
        );
    }

    #[test]
    fn test_case_insensitive_and_punctuation() {
        let index = index();
        assert_eq!(index.replace_short_codes(":SMILE:"), "\u{1F604}");
        assert_eq!(index.replace_short_codes(":Flag-DE:"), "\u{1F1E9}\u{1F1EA}");
        assert_eq!(index.replace_short_codes(":ThumbsUp:"), "\u{1F44D}");
    }

    #[test]
    fn test_text_around_multibyte_content() {
        assert_eq!(
            index().replace_short_codes("日本 :a: é :smile:!"),
            "日本 \u{2764} é \u{1F604}!"
        );
    }

    #[test]
    fn test_non_ascii_token_does_not_hide_next_alias() {
        let index = index();
        assert_eq!(
            index.replace_short_codes("ok :日本:smile: x"),
            "ok :日本\u{1F604} x"
        );
        assert_eq!(index.replace_short_codes(":émoji:"), ":émoji:");
    }

    #[test]
    fn test_empty_index_rewrites_nothing() {
        let index = EmojiIndex::default();
        assert_eq!(index.replace_short_codes(":smile:"), ":smile:");
    }
}
