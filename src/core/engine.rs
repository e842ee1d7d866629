use crate::config::{Backend, SuggestConfig};
use crate::core::trie::WeightedTrie;
use crate::core::types::{KeywordEntry, Suggestion};
use crate::error::{Result, SuggestError};
use crate::fuzzy::automaton::{Automaton, AutomatonFactory};
use crate::fuzzy::bktree::BkTree;
use crate::fuzzy::intersection::intersect;
use std::sync::Arc;

/// Autocomplete and did-you-mean over one dictionary snapshot.
///
/// The trie and the BK-tree index the same weighted keywords; the automaton
/// factory depends only on the maximum distance and can be shared between
/// engines.
pub struct SuggestEngine {
    trie: WeightedTrie,
    bk_tree: BkTree,
    factory: Arc<AutomatonFactory>,
    config: SuggestConfig,
}

impl SuggestEngine {
    pub fn from_entries<I, E>(entries: I, config: SuggestConfig) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<KeywordEntry>,
    {
        config.validate()?;
        let factory = Arc::new(AutomatonFactory::new(config.max_distance)?);
        Self::with_factory(entries, config, factory)
    }

    pub fn with_factory<I, E>(entries: I, config: SuggestConfig, factory: Arc<AutomatonFactory>) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<KeywordEntry>,
    {
        config.validate()?;
        if factory.max_distance() != config.max_distance {
            return Err(SuggestError::InvalidConfig(format!(
                "automaton tables are for distance {}, configuration asks for {}",
                factory.max_distance(),
                config.max_distance
            )));
        }

        let entries: Vec<KeywordEntry> = entries.into_iter().map(Into::into).collect();
        let trie = WeightedTrie::from_entries(entries.iter().cloned())?;
        let bk_tree = BkTree::build(entries)?.with_ld_weight(config.ld_weight);
        log::info!("suggest index built: {} keywords, {} trie nodes", trie.len(), trie.node_count());

        Ok(Self { trie, bk_tree, factory, config })
    }

    /// Adds `weight` to `keyword` in both indexes. Returns the new total.
    pub fn add_keyword(&mut self, keyword: &str, weight: u64) -> Result<u64> {
        let total = self.trie.insert_or_increment(keyword, weight)?;
        self.bk_tree.insert_or_increment(keyword, weight)?;
        Ok(total)
    }

    /// Up to `k` keywords starting with `prefix`, heaviest first.
    pub fn top_n(&self, prefix: &str, k: usize) -> Vec<String> {
        self.trie.top_n(prefix, k).into_iter().map(|entry| entry.text).collect()
    }

    pub fn top_n_entries(&self, prefix: &str, k: usize) -> Vec<KeywordEntry> {
        self.trie.top_n(prefix, k)
    }

    /// Ranked did-you-mean candidates within the configured distance.
    pub fn suggestions(&self, term: &str, n: usize) -> Vec<Suggestion> {
        match self.config.backend {
            Backend::BkTree => self.bk_tree.rank(term, usize::from(self.config.max_distance), n),
            Backend::Automaton => {
                let automaton = Automaton::new(&self.factory, term);
                intersect(&self.trie, &automaton, n, self.config.ld_weight)
            }
        }
    }

    pub fn did_you_mean(&self, term: &str) -> Option<String> {
        self.suggestions(term, 1).into_iter().next().map(|s| s.keyword)
    }

    pub fn did_you_mean_n(&self, term: &str, n: usize) -> Vec<String> {
        self.suggestions(term, n).into_iter().map(|s| s.keyword).collect()
    }

    pub fn set_backend(&mut self, backend: Backend) {
        self.config.backend = backend;
    }

    pub fn weight_of(&self, keyword: &str) -> Option<u64> {
        self.trie.weight_of(keyword)
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }

    pub fn trie(&self) -> &WeightedTrie {
        &self.trie
    }

    pub fn bk_tree(&self) -> &BkTree {
        &self.bk_tree
    }

    pub fn factory(&self) -> &Arc<AutomatonFactory> {
        &self.factory
    }
}
