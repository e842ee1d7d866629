use crate::core::engine::SuggestEngine;
use crate::error::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// A cloneable handle for serving queries from many threads.
///
/// Queries share a read lock; `add_keyword` and `swap` take the write lock,
/// so mutation never overlaps a query on the same index.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<RwLock<SuggestEngine>>,
}

impl SharedEngine {
    pub fn new(engine: SuggestEngine) -> Self {
        Self { inner: Arc::new(RwLock::new(engine)) }
    }

    pub fn top_n(&self, prefix: &str, k: usize) -> Vec<String> {
        self.inner.read().top_n(prefix, k)
    }

    pub fn did_you_mean(&self, term: &str) -> Option<String> {
        self.inner.read().did_you_mean(term)
    }

    pub fn did_you_mean_n(&self, term: &str, n: usize) -> Vec<String> {
        self.inner.read().did_you_mean_n(term, n)
    }

    pub fn add_keyword(&self, keyword: &str, weight: u64) -> Result<u64> {
        self.inner.write().add_keyword(keyword, weight)
    }

    /// Replaces the whole index with a freshly built one and returns the old.
    pub fn swap(&self, engine: SuggestEngine) -> SuggestEngine {
        std::mem::replace(&mut *self.inner.write(), engine)
    }

    /// Runs `f` under the read lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&SuggestEngine) -> R) -> R {
        f(&self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuggestConfig;
    use std::thread;

    fn engine(entries: &[(&str, u64)]) -> SuggestEngine {
        let config = SuggestConfig { max_distance: 1, ..SuggestConfig::default() };
        SuggestEngine::from_entries(entries.iter().copied(), config).unwrap()
    }

    #[test]
    fn test_concurrent_readers() {
        let shared = SharedEngine::new(engine(&[("food", 10), ("good", 4)]));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.did_you_mean("fxod"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("food"));
        }
    }

    #[test]
    fn test_writes_are_visible() {
        let shared = SharedEngine::new(engine(&[("food", 10)]));
        shared.add_keyword("fool", 50).unwrap();
        assert_eq!(shared.top_n("foo", 2), ["fool", "food"]);
    }

    #[test]
    fn test_swap_replaces_index() {
        let shared = SharedEngine::new(engine(&[("food", 10)]));
        let old = shared.swap(engine(&[("drink", 3)]));
        assert_eq!(old.len(), 1);
        assert_eq!(shared.top_n("", 5), ["drink"]);
        assert_eq!(shared.with_engine(|e| e.weight_of("drink")), Some(3));
    }
}
