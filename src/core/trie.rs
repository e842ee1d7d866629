// --- File: src/core/trie.rs
use crate::core::types::{KeywordEntry, NodeId};
use crate::error::{Result, SuggestError};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Branch(char),
    /// End-of-word marker owned by the last branch of a keyword.
    Terminal,
}

#[derive(Debug, Clone)]
struct TrieNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: BTreeMap<char, NodeId>,
    terminal: Option<NodeId>,
    /// For a terminal this is the keyword's own weight.
    max_weight_in_subtree: u64,
}

impl TrieNode {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self { kind, parent, children: BTreeMap::new(), terminal: None, max_weight_in_subtree: 0 }
    }
}

/// Frontier entry of the best-first extraction. Field order drives `Ord`:
/// heaviest subtree first, then the lexicographically smallest prefix.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Frontier {
    weight: u64,
    prefix: Reverse<String>,
    node: NodeId,
}

/// An arena-backed trie whose nodes cache the maximum keyword weight
/// found anywhere in their subtree.
///
/// Parent links are arena indices, so words can be rebuilt from a terminal
/// without any reference cycles.
#[derive(Debug, Clone)]
pub struct WeightedTrie {
    nodes: Vec<TrieNode>,
    keyword_count: usize,
}

impl Default for WeightedTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightedTrie {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::new(NodeKind::Root, None)], keyword_count: 0 }
    }

    pub fn from_entries<I, E>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<KeywordEntry>,
    {
        let mut trie = Self::new();
        for entry in entries {
            let entry = entry.into();
            trie.insert_or_increment(&entry.text, entry.weight)?;
        }
        Ok(trie)
    }

    fn push_node(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TrieNode::new(kind, Some(parent)));
        id
    }

    /// Adds `weight` to `keyword`, creating it if needed, and returns the
    /// keyword's new total weight.
    /// O(k) complexity where k is the keyword length.
    pub fn insert_or_increment(&mut self, keyword: &str, weight: u64) -> Result<u64> {
        if keyword.is_empty() {
            return Err(SuggestError::EmptyKeyword);
        }

        let mut node_idx = ROOT;
        let mut path = vec![ROOT];
        for c in keyword.chars() {
            let next_idx = match self.nodes[node_idx].children.get(&c) {
                Some(&id) => id,
                None => {
                    let id = self.push_node(NodeKind::Branch(c), node_idx);
                    self.nodes[node_idx].children.insert(c, id);
                    id
                }
            };
            node_idx = next_idx;
            path.push(node_idx);
        }

        let terminal_idx = match self.nodes[node_idx].terminal {
            Some(id) => id,
            None => {
                let id = self.push_node(NodeKind::Terminal, node_idx);
                self.nodes[node_idx].terminal = Some(id);
                self.keyword_count += 1;
                id
            }
        };

        let updated = self.nodes[terminal_idx]
            .max_weight_in_subtree
            .checked_add(weight)
            .ok_or_else(|| SuggestError::WeightOverflow { keyword: keyword.to_string() })?;
        self.nodes[terminal_idx].max_weight_in_subtree = updated;

        // Ancestors only ever grow; stop at the first one already covering us.
        for &idx in path.iter().rev() {
            if updated > self.nodes[idx].max_weight_in_subtree {
                self.nodes[idx].max_weight_in_subtree = updated;
            } else {
                break;
            }
        }
        Ok(updated)
    }

    /// Follows `prefix` character by character from the root.
    pub fn find_node(&self, prefix: &str) -> Option<NodeId> {
        let mut node_idx = ROOT;
        for c in prefix.chars() {
            node_idx = *self.nodes[node_idx].children.get(&c)?;
        }
        Some(node_idx)
    }

    /// Returns up to `k` keywords starting with `prefix`, heaviest first.
    /// Equal weights come out in ascending keyword order.
    ///
    /// Best-first extraction: every step descends from the heaviest frontier
    /// subtree along its heaviest children to a terminal, and the siblings
    /// passed on the way down join the frontier. O(k * depth).
    pub fn top_n(&self, prefix: &str, k: usize) -> Vec<KeywordEntry> {
        let Some(start) = self.find_node(prefix) else {
            return vec![];
        };

        let mut results = Vec::with_capacity(k.min(self.keyword_count));
        let mut frontier = BinaryHeap::new();
        frontier.push(Frontier {
            weight: self.nodes[start].max_weight_in_subtree,
            prefix: Reverse(prefix.to_string()),
            node: start,
        });

        while results.len() < k {
            let Some(Frontier { prefix: Reverse(spelled), node, .. }) = frontier.pop() else {
                break;
            };
            if let Some((text, terminal)) = self.descend_heaviest(node, spelled, &mut frontier) {
                results.push(KeywordEntry {
                    text,
                    weight: self.nodes[terminal].max_weight_in_subtree,
                });
            }
        }
        results
    }

    /// Walks from `from` (spelling `spelled`) to the terminal of its heaviest
    /// keyword, pushing every sibling passed on the way onto the frontier.
    fn descend_heaviest(
        &self,
        from: NodeId,
        mut spelled: String,
        frontier: &mut BinaryHeap<Frontier>,
    ) -> Option<(String, NodeId)> {
        let mut current = from;
        loop {
            if self.nodes[current].kind == NodeKind::Terminal {
                return Some((spelled, current));
            }
            let best = self.heaviest_child(current)?;
            for sibling in self.ordered_children(current).filter(|&id| id != best) {
                let mut sibling_prefix = spelled.clone();
                if let NodeKind::Branch(c) = self.nodes[sibling].kind {
                    sibling_prefix.push(c);
                }
                frontier.push(Frontier {
                    weight: self.nodes[sibling].max_weight_in_subtree,
                    prefix: Reverse(sibling_prefix),
                    node: sibling,
                });
            }
            if let NodeKind::Branch(c) = self.nodes[best].kind {
                spelled.push(c);
            }
            current = best;
        }
    }

    /// Terminal first, then letters in ascending order.
    fn ordered_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let node = &self.nodes[id];
        node.terminal.into_iter().chain(node.children.values().copied())
    }

    /// First child in `ordered_children` order carrying the maximum weight.
    fn heaviest_child(&self, id: NodeId) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for child in self.ordered_children(id) {
            match best {
                Some(b)
                    if self.nodes[b].max_weight_in_subtree
                        >= self.nodes[child].max_weight_in_subtree => {}
                _ => best = Some(child),
            }
        }
        best
    }

    /// Rebuilds the keyword spelled by the path from the root to `id`.
    pub fn word_of(&self, id: NodeId) -> String {
        let mut letters = Vec::new();
        let mut current = Some(id);
        while let Some(idx) = current {
            if let NodeKind::Branch(c) = self.nodes[idx].kind {
                letters.push(c);
            }
            current = self.nodes[idx].parent;
        }
        letters.into_iter().rev().collect()
    }

    pub fn weight_of(&self, keyword: &str) -> Option<u64> {
        if keyword.is_empty() {
            return None;
        }
        let node = self.find_node(keyword)?;
        let terminal = self.nodes[node].terminal?;
        Some(self.nodes[terminal].max_weight_in_subtree)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.weight_of(keyword).is_some()
    }

    /// Every keyword, heaviest first.
    pub fn keywords(&self) -> Vec<KeywordEntry> {
        self.top_n("", self.keyword_count)
    }

    pub fn len(&self) -> usize {
        self.keyword_count
    }

    pub fn is_empty(&self) -> bool {
        self.keyword_count == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    pub fn subtree_weight(&self, id: NodeId) -> u64 {
        self.nodes[id].max_weight_in_subtree
    }

    pub fn terminal(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].terminal
    }

    /// Letter children of `id` in ascending letter order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (char, NodeId)> + '_ {
        self.nodes[id].children.iter().map(|(&c, &child)| (c, child))
    }
}
