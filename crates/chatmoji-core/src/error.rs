//! Error types for Chatmoji Core

use thiserror::Error;

/// Result type for Chatmoji Core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// The emoji dataset could not be loaded
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems found while reading an emoji dataset.
///
/// Only [`DatasetError::Parse`] aborts a load. The other variants are
/// recorded against a single record, which is then left out of the index.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The top-level container is not a JSON array of entries
    #[error("malformed emoji dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry could not be decoded into the expected shape
    #[error("malformed entry: {0}")]
    Entry(String),

    /// No alias was given and none could be derived
    #[error("entry has no short names")]
    MissingShortCode,

    /// The codepoint string could not be decoded
    #[error("bad codepoints {code:?}: {source}")]
    Codepoints {
        code: String,
        #[source]
        source: CodepointError,
    },

    /// A skin variation key did not contain any known tone
    #[error("skin variation key {0:?} does not resolve to any tone name")]
    UnresolvedToneKey(String),
}

/// Why a hyphen-joined codepoint string failed to decode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodepointError {
    #[error("no codepoints")]
    Empty,

    #[error("segment {0:?} is not a hexadecimal number")]
    InvalidHex(String),

    #[error("U+{0:X} is not a Unicode scalar value")]
    InvalidScalar(u32),

    #[error("more than {max} codepoints ({count})")]
    TooLong { count: usize, max: usize },
}
