// File: src/fuzzy/intersection.rs
use crate::core::trie::{NodeKind, WeightedTrie};
use crate::core::types::{score, NodeId, Suggestion};
use crate::fuzzy::automaton::{Automaton, AutomatonState};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A (trie node, automaton state) pair on the search frontier.
#[derive(Debug)]
struct Candidate {
    /// Upper bound on the score of anything below `node`; exact for terminals.
    bound: f64,
    weight: u64,
    /// Spelled prefix; ties go to the smaller one, which is never after any
    /// keyword below it.
    prefix: Reverse<String>,
    node: NodeId,
    state: AutomatonState,
    /// Set for terminals only.
    distance: Option<usize>,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bound
            .total_cmp(&other.bound)
            .then_with(|| self.weight.cmp(&other.weight))
            .then_with(|| self.prefix.cmp(&other.prefix))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}


/// The `n` best keywords within the automaton's distance of its word.
///
/// Best-first over the trie while driving `automaton` along each path.
/// Subtrees whose automaton state dies are never visited, and distances are
/// only materialized at accepting terminals. An exact match is returned alone.
pub fn intersect(trie: &WeightedTrie, automaton: &Automaton<'_>, n: usize, ld_weight: f64) -> Vec<Suggestion> {
    let mut results = Vec::new();
    if n == 0 || trie.is_empty() {
        return results;
    }

    let root = trie.root();
    let initial = automaton.initial();
    let mut frontier = BinaryHeap::new();
    frontier.push(Candidate {
        bound: score(trie.subtree_weight(root), automaton.min_edits(initial), ld_weight),
        weight: trie.subtree_weight(root),
        prefix: Reverse(String::new()),
        node: root,
        state: initial,
        distance: None,
    });

    while let Some(candidate) = frontier.pop() {
        let Reverse(prefix) = candidate.prefix;
        if trie.kind(candidate.node) == NodeKind::Terminal {
            let distance = candidate.distance.unwrap_or_default();
            let suggestion = Suggestion {
                keyword: prefix,
                weight: candidate.weight,
                distance,
                score: candidate.bound,
            };
            if distance == 0 {
                return vec![suggestion];
            }
            results.push(suggestion);
            if results.len() == n {
                break;
            }
            continue;
        }

        if let Some(terminal) = trie.terminal(candidate.node) {
            if let Some(distance) = automaton.distance(candidate.state) {
                let weight = trie.subtree_weight(terminal);
                frontier.push(Candidate {
                    bound: score(weight, distance, ld_weight),
                    weight,
                    prefix: Reverse(prefix.clone()),
                    node: terminal,
                    state: candidate.state,
                    distance: Some(distance),
                });
            }
        }

        for (letter, child) in trie.children(candidate.node) {
            let Some(next) = automaton.step(candidate.state, letter) else {
                continue;
            };
            let weight = trie.subtree_weight(child);
            let mut spelled = prefix.clone();
            spelled.push(letter);
            frontier.push(Candidate {
                bound: score(weight, automaton.min_edits(next), ld_weight),
                weight,
                prefix: Reverse(spelled),
                node: child,
                state: next,
                distance: None,
            });
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::automaton::AutomatonFactory;

    fn suggest(trie: &WeightedTrie, distance: u8, term: &str, n: usize) -> Vec<(String, usize)> {
        let factory = AutomatonFactory::new(distance).unwrap();
        let automaton = Automaton::new(&factory, term);
        intersect(trie, &automaton, n, 6.0)
            .into_iter()
            .map(|s| (s.keyword, s.distance))
            .collect()
    }

    #[test]
    fn test_finds_misspelling() {
        let trie = WeightedTrie::from_entries([("food", 10)]).unwrap();
        assert_eq!(suggest(&trie, 3, "fxod", 1), [("food".to_string(), 1)]);
        assert!(suggest(&trie, 2, "abcfood", 1).is_empty());
    }

    #[test]
    fn test_exact_match_is_sole_result() {
        let trie = WeightedTrie::from_entries([("food", 1), ("good", 500), ("mood", 400)]).unwrap();
        assert_eq!(suggest(&trie, 2, "food", 5), [("food".to_string(), 0)]);
    }

    #[test]
    fn test_ranks_by_weight_over_distance() {
        let trie = WeightedTrie::from_entries([("bard", 100), ("barns", 1000), ("zzzz", 1_000_000)]).unwrap();
        let found = suggest(&trie, 2, "bart", 5);
        assert_eq!(found, [("bard".to_string(), 1), ("barns".to_string(), 2)]);
    }

    #[test]
    fn test_limit_and_empty_trie() {
        let trie = WeightedTrie::from_entries([("cat", 3), ("bat", 2), ("rat", 1)]).unwrap();
        let found = suggest(&trie, 1, "hat", 2);
        assert_eq!(found, [("cat".to_string(), 1), ("bat".to_string(), 1)]);
        assert!(suggest(&trie, 1, "hat", 0).is_empty());
        assert!(suggest(&WeightedTrie::new(), 1, "hat", 3).is_empty());
    }

    #[test]
    fn test_equal_scores_resolve_alphabetically() {
        let trie = WeightedTrie::from_entries([("ca", 2), ("ac", 2)]).unwrap();
        assert_eq!(suggest(&trie, 2, "c", 2), [("ac".to_string(), 1), ("ca".to_string(), 1)]);

        let trie = WeightedTrie::from_entries([("rat", 5), ("bat", 5), ("cat", 5), ("at", 5)]).unwrap();
        let found: Vec<String> = suggest(&trie, 1, "hat", 4).into_iter().map(|(w, _)| w).collect();
        assert_eq!(found, ["at", "bat", "cat", "rat"]);
    }
}
