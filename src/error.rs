// File: src/error.rs
use thiserror::Error;

/// Largest maximum edit distance the automaton factory accepts.
/// Precomputation grows exponentially beyond this.
pub const MAX_SUPPORTED_DISTANCE: u8 = 4;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("keyword must not be empty")]
    EmptyKeyword,

    #[error("cannot build a BK-tree from an empty dictionary")]
    EmptyDictionary,

    #[error("maximum edit distance {requested} is not supported (limit is {max})")]
    UnsupportedDistance { requested: u8, max: u8 },

    #[error("weight of `{keyword}` would overflow")]
    WeightOverflow { keyword: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("inconsistent automaton snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, SuggestError>;
