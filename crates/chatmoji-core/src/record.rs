//! Emoji records and codepoint decoding
//!
//! A record is one emoji as it appears in the dataset, either a base emoji or
//! a synthesized skin-tone variant. Records live in the index arena and are
//! addressed by [`EmojiId`].

use crate::error::CodepointError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Longest codepoint sequence the dataset uses
pub const MAX_CODEPOINTS: usize = 9;

/// Stable id of a record inside a published index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmojiId(pub(crate) u32);

impl EmojiId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EmojiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Image sets an emoji can be rendered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Apple,
    Google,
    #[default]
    Twitter,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Apple,
        Platform::Google,
        Platform::Twitter,
        Platform::Facebook,
    ];

    /// Name as used in asset paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apple => "apple",
            Self::Google => "google",
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
        }
    }

    fn flag(self) -> PlatformSet {
        match self {
            Self::Apple => PlatformSet::APPLE,
            Self::Google => PlatformSet::GOOGLE,
            Self::Twitter => PlatformSet::TWITTER,
            Self::Facebook => PlatformSet::FACEBOOK,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown emoji platform: {s}"))
    }
}

bitflags! {
    /// Platforms that ship an image for a record
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct PlatformSet: u8 {
        const APPLE = 0b0001;
        const GOOGLE = 0b0010;
        const TWITTER = 0b0100;
        const FACEBOOK = 0b1000;
    }
}

impl PlatformSet {
    pub fn supports(&self, platform: Platform) -> bool {
        self.contains(platform.flag())
    }

    pub fn with(mut self, platform: Platform, supported: bool) -> Self {
        self.set(platform.flag(), supported);
        self
    }
}

/// One canonical or variant emoji
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiRecord {
    /// Aliases, the first one is the primary alias
    pub short_codes: Vec<String>,
    /// Fully qualified codepoints, e.g. `2764-FE0F`
    pub unified_code: String,
    /// Codepoints without variation selectors, e.g. `2764`
    pub non_qualified_code: Option<String>,
    pub platforms: PlatformSet,
    /// Decoded text this record matches against
    pub literal: String,
}

impl EmojiRecord {
    pub fn primary_short_code(&self) -> &str {
        // Records without aliases are rejected while loading.
        self.short_codes.first().map(String::as_str).unwrap_or_default()
    }

    /// First scalar value of the literal text
    pub fn leading_char(&self) -> Option<char> {
        self.literal.chars().next()
    }
}

/// Decode a hyphen-joined list of hex codepoints (`1F44D-1F3FB`) into text.
pub fn decode_codepoints(code: &str) -> Result<String, CodepointError> {
    if code.trim().is_empty() {
        return Err(CodepointError::Empty);
    }

    let mut scalars: SmallVec<[char; MAX_CODEPOINTS]> = SmallVec::new();
    for segment in code.split('-') {
        let value = u32::from_str_radix(segment.trim(), 16)
            .map_err(|_| CodepointError::InvalidHex(segment.to_string()))?;
        let c = char::from_u32(value).ok_or(CodepointError::InvalidScalar(value))?;
        scalars.push(c);
    }

    if scalars.len() > MAX_CODEPOINTS {
        return Err(CodepointError::TooLong {
            count: scalars.len(),
            max: MAX_CODEPOINTS,
        });
    }

    Ok(scalars.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_single_codepoint() {
        assert_eq!(decode_codepoints("1F600").unwrap(), "\u{1F600}");
    }

    #[test]
    fn test_decode_sequence_is_case_insensitive() {
        assert_eq!(
            decode_codepoints("1f44d-1F3FB").unwrap(),
            "\u{1F44D}\u{1F3FB}"
        );
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(decode_codepoints(""), Err(CodepointError::Empty));
        assert_eq!(
            decode_codepoints("1F600-"),
            Err(CodepointError::InvalidHex(String::new()))
        );
        assert_eq!(
            decode_codepoints("XYZ"),
            Err(CodepointError::InvalidHex("XYZ".to_string()))
        );
        assert_eq!(
            decode_codepoints("D83D"),
            Err(CodepointError::InvalidScalar(0xD83D))
        );
    }

    #[test]
    fn test_decode_limits_sequence_length() {
        let nine = vec!["1F9D1"; 9].join("-");
        assert!(decode_codepoints(&nine).is_ok());

        let ten = vec!["1F9D1"; 10].join("-");
        assert_eq!(
            decode_codepoints(&ten),
            Err(CodepointError::TooLong { count: 10, max: 9 })
        );
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("Apple".parse::<Platform>().unwrap(), Platform::Apple);
        assert_eq!("twitter".parse::<Platform>().unwrap(), Platform::Twitter);
        assert!("messenger".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_set() {
        let set = PlatformSet::empty()
            .with(Platform::Apple, true)
            .with(Platform::Google, false);
        assert!(set.supports(Platform::Apple));
        assert!(!set.supports(Platform::Google));
        assert!(!set.supports(Platform::Twitter));
    }
}
