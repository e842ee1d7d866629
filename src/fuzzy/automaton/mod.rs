//! Levenshtein automata driven by precomputed, word-independent tables.

mod factory;
mod position;
mod state;

pub use factory::{AutomatonFactory, AutomatonState, StateId, StateSummary, FORMAT_VERSION};

/// A factory bound to one word: the per-query automaton instance.
#[derive(Debug, Clone)]
pub struct Automaton<'a> {
    factory: &'a AutomatonFactory,
    word: Vec<char>,
}

impl<'a> Automaton<'a> {
    pub fn new(factory: &'a AutomatonFactory, word: &str) -> Self {
        Self { factory, word: word.chars().collect() }
    }

    pub fn initial(&self) -> AutomatonState {
        self.factory.init()
    }

    pub fn step(&self, state: AutomatonState, c: char) -> Option<AutomatonState> {
        self.factory.step(state, c, &self.word[state.offset..])
    }

    pub fn is_accepting(&self, state: AutomatonState) -> bool {
        self.factory.is_accepting(state, self.word.len())
    }

    /// Final distance if `state` accepts.
    pub fn distance(&self, state: AutomatonState) -> Option<usize> {
        self.is_accepting(state).then(|| self.factory.edit_distance(state, self.word.len()))
    }

    /// Optimistic distance of anything still reachable from `state`.
    pub fn min_edits(&self, state: AutomatonState) -> usize {
        usize::from(self.factory.min_edits(state))
    }
}

impl AutomatonFactory {
    /// Distance between `word` and `query` if it is within `max_distance`.
    pub fn distance(&self, word: &str, query: &str) -> Option<usize> {
        let automaton = Automaton::new(self, word);
        let mut state = automaton.initial();
        for c in query.chars() {
            state = automaton.step(state, c)?;
        }
        automaton.distance(state)
    }

    pub fn accepts(&self, word: &str, query: &str) -> bool {
        self.distance(word, query).is_some()
    }
}
