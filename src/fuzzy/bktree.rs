// File: src/fuzzy/bktree.rs
use crate::config::DEFAULT_LD_WEIGHT;
use crate::core::types::{score, KeywordEntry, Suggestion};
use crate::error::{Result, SuggestError};
use crate::fuzzy::distance::levenshtein;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct BkNode {
    word: String,
    score: u64,
    /// Edit distance to this node's word -> child index. One child per distance.
    children: BTreeMap<usize, usize>,
}

impl BkNode {
    fn new(word: &str, score: u64) -> Self {
        Self { word: word.to_string(), score, children: BTreeMap::new() }
    }
}

/// A dictionary word found within the query radius.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BkMatch {
    pub word: String,
    pub score: u64,
    pub distance: usize,
}

/// A Burkhard-Keller tree over the Levenshtein metric.
///
/// Append-only: words are never removed, but inserting a word that is
/// already present adds to its score.
#[derive(Debug, Clone)]
pub struct BkTree {
    nodes: Vec<BkNode>,
    ld_weight: f64,
}

impl BkTree {
    /// Builds the tree from a full dictionary snapshot. The first entry
    /// becomes the root; insertion order only affects the shape.
    pub fn build<I, E>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<KeywordEntry>,
    {
        let mut entries = entries.into_iter().map(Into::into);
        let root = entries.next().ok_or(SuggestError::EmptyDictionary)?;
        if root.text.is_empty() {
            return Err(SuggestError::EmptyKeyword);
        }

        let mut tree = Self { nodes: vec![BkNode::new(&root.text, root.weight)], ld_weight: DEFAULT_LD_WEIGHT };
        for entry in entries {
            tree.insert_or_increment(&entry.text, entry.weight)?;
        }
        log::info!("BK-tree built with {} words", tree.len());
        Ok(tree)
    }

    pub fn with_ld_weight(mut self, ld_weight: f64) -> Self {
        self.ld_weight = ld_weight;
        self
    }

    /// Inserts `word` or, if it is already present, adds `score` to it.
    /// Returns the word's score after the update.
    pub fn insert_or_increment(&mut self, word: &str, score: u64) -> Result<u64> {
        if word.is_empty() {
            return Err(SuggestError::EmptyKeyword);
        }

        let mut node_idx = 0;
        loop {
            let d = levenshtein(word, &self.nodes[node_idx].word);
            if d == 0 {
                let node = &mut self.nodes[node_idx];
                node.score = node
                    .score
                    .checked_add(score)
                    .ok_or_else(|| SuggestError::WeightOverflow { keyword: word.to_string() })?;
                return Ok(node.score);
            }
            match self.nodes[node_idx].children.get(&d) {
                Some(&child) => node_idx = child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(BkNode::new(word, score));
                    self.nodes[node_idx].children.insert(d, child);
                    return Ok(score);
                }
            }
        }
    }

    /// All words within `max_error` edits of `term`, in traversal order.
    ///
    /// Only children keyed within `max_error` of the current distance are
    /// visited; the triangle inequality rules out everything else.
    pub fn query(&self, term: &str, max_error: usize) -> Vec<BkMatch> {
        let mut matches = Vec::new();
        let mut stack = vec![0];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            let d = levenshtein(term, &node.word);
            if d <= max_error {
                matches.push(BkMatch { word: node.word.clone(), score: node.score, distance: d });
            }
            let band = d.saturating_sub(max_error)..=d + max_error;
            stack.extend(node.children.range(band).map(|(_, &child)| child));
        }
        matches
    }

    /// The `n` best candidates for `term` by `score / distance^ld_weight`.
    /// An exact match is returned alone.
    pub fn rank(&self, term: &str, max_error: usize, n: usize) -> Vec<Suggestion> {
        if n == 0 {
            return vec![];
        }
        let matches = self.query(term, max_error);
        if let Some(exact) = matches.iter().find(|m| m.distance == 0) {
            return vec![Suggestion {
                keyword: exact.word.clone(),
                weight: exact.score,
                distance: 0,
                score: f64::INFINITY,
            }];
        }

        let mut ranked: Vec<Suggestion> = matches
            .into_iter()
            .map(|m| Suggestion {
                score: score(m.score, m.distance, self.ld_weight),
                keyword: m.word,
                weight: m.score,
                distance: m.distance,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.weight.cmp(&a.weight))
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
        ranked.truncate(n);
        ranked
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        let mut node_idx = 0;
        loop {
            let node = &self.nodes[node_idx];
            let d = levenshtein(word, &node.word);
            if d == 0 {
                return Some(node.score);
            }
            node_idx = *node.children.get(&d)?;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_word(&self) -> &str {
        &self.nodes[0].word
    }

    /// Every `(parent word, child word, key)` edge of the tree.
    pub fn edges(&self) -> Vec<(&str, &str, usize)> {
        self.nodes
            .iter()
            .flat_map(|parent| {
                parent
                    .children
                    .iter()
                    .map(move |(&key, &child)| (parent.word.as_str(), self.nodes[child].word.as_str(), key))
            })
            .collect()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0, 1)];
        while let Some((node_idx, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(self.nodes[node_idx].children.values().map(|&child| (child, level + 1)));
        }
        deepest
    }
}
