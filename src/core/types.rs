// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Index of a node inside the trie arena.
pub type NodeId = usize;

/// A keyword together with its accumulated weight.
/// Weights are additive: inserting the same keyword again adds to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub text: String,
    pub weight: u64,
}

impl KeywordEntry {
    pub fn new(text: impl Into<String>, weight: u64) -> Self {
        Self { text: text.into(), weight }
    }
}

impl<S: Into<String>> From<(S, u64)> for KeywordEntry {
    fn from((text, weight): (S, u64)) -> Self {
        Self::new(text, weight)
    }
}

/// A ranked did-you-mean candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub keyword: String,
    pub weight: u64,
    pub distance: usize,
    /// `weight / distance^ld_weight`, infinite for an exact match.
    pub score: f64,
}

/// Ranking score shared by the BK-tree and the intersection search.
///
/// An exact match (distance 0) always dominates.
pub fn score(weight: u64, distance: usize, ld_weight: f64) -> f64 {
    if distance == 0 {
        return f64::INFINITY;
    }
    weight as f64 / (distance as f64).powf(ld_weight)
}
