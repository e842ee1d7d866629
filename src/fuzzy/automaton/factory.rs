// File: src/fuzzy/automaton/factory.rs
use super::state::{enumerate_states, ParametricState};
use crate::error::{Result, SuggestError, MAX_SUPPORTED_DISTANCE};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Numeric identity of a canonical parametric state.
pub type StateId = u32;

/// Bumped whenever the serialized table layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// What survives of a parametric state once its positions are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSummary {
    /// Lower bound on the distance of any word reached from this state.
    pub min_edits: u8,
    /// Largest `offset - edits` over the state's positions.
    pub max_base_offset: i32,
    pub max_offset: i32,
}

/// A runtime automaton configuration: a canonical state plus the absolute
/// word index its offsets are relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AutomatonState {
    pub state: StateId,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Transition {
    target: StateId,
    shift: u32,
}

/// Transitions for one window length: row per state, column per
/// characteristic vector. `None` is a dead end.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransitionTable {
    window: u32,
    entries: Vec<Option<Transition>>,
}

impl TransitionTable {
    fn new(window: u32) -> Self {
        Self { window, entries: Vec::new() }
    }

    fn row_len(&self) -> usize {
        1 << self.window
    }

    fn set(&mut self, state: StateId, vector: u32, transition: Transition) {
        let idx = state as usize * self.row_len() + vector as usize;
        if self.entries.len() <= idx {
            self.entries.resize((state as usize + 1) * self.row_len(), None);
        }
        self.entries[idx] = Some(transition);
    }

    fn get(&self, state: StateId, vector: u32) -> Option<Transition> {
        let idx = state as usize * self.row_len() + vector as usize;
        self.entries.get(idx).copied().flatten()
    }
}

/// Build-phase deduplication of canonical states.
#[derive(Default)]
struct StateRegistry {
    ids: AHashMap<ParametricState, StateId>,
    states: Vec<ParametricState>,
}

impl StateRegistry {
    fn intern(&mut self, state: ParametricState) -> StateId {
        if let Some(&id) = self.ids.get(&state) {
            return id;
        }
        let id = self.states.len() as StateId;
        self.states.push(state.clone());
        self.ids.insert(state, id);
        id
    }
}

/// Word-independent Levenshtein automaton tables for one maximum distance
/// (Schulz-Mihov parametric simulation).
///
/// Built once and shared by every query: stepping costs one table lookup per
/// character regardless of dictionary size. Precomputation grows
/// exponentially with the distance, which is why it is capped at
/// [`MAX_SUPPORTED_DISTANCE`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomatonFactory {
    format_version: u32,
    max_distance: u8,
    initial: StateId,
    states: Vec<StateSummary>,
    /// Indexed by window length `0..=2 * max_distance + 1`.
    tables: Vec<TransitionTable>,
}

impl AutomatonFactory {
    pub fn new(max_distance: u8) -> Result<Self> {
        if max_distance > MAX_SUPPORTED_DISTANCE {
            return Err(SuggestError::UnsupportedDistance {
                requested: max_distance,
                max: MAX_SUPPORTED_DISTANCE,
            });
        }

        let mut registry = StateRegistry::default();
        for state in enumerate_states(max_distance) {
            registry.intern(state);
        }
        let initial = registry.intern(ParametricState::initial());

        let widest = Self::widest_window(max_distance);
        let mut tables: Vec<TransitionTable> = (0..=widest).map(TransitionTable::new).collect();

        // Registry may still grow while we walk it; every state gets all windows.
        let mut id = 0;
        while (id as usize) < registry.states.len() {
            let state = registry.states[id as usize].clone();
            let max_offset = state.max_offset();
            for table in &mut tables {
                if max_offset > table.window as i32 {
                    continue;
                }
                for vector in 0..(1u32 << table.window) {
                    if let Some((next, shift)) = state.transition(vector, table.window, max_distance) {
                        let target = registry.intern(next);
                        table.set(id, vector, Transition { target, shift });
                    }
                }
            }
            id += 1;
        }

        let state_count = registry.states.len();
        for table in &mut tables {
            let rows = state_count * table.row_len();
            table.entries.resize(rows, None);
        }

        // Reduce: only the scalars needed at query time are kept.
        let states: Vec<StateSummary> = registry
            .states
            .iter()
            .map(|s| StateSummary {
                min_edits: s.min_edits(),
                max_base_offset: s.max_base_offset(),
                max_offset: s.max_offset(),
            })
            .collect();

        let factory = Self { format_version: FORMAT_VERSION, max_distance, initial, states, tables };
        log::debug!(
            "levenshtein factory for distance {}: {} states, {} transitions",
            max_distance,
            factory.state_count(),
            factory.transition_count()
        );
        Ok(factory)
    }

    /// Checks that deserialized tables are internally consistent, so that
    /// stepping can index them without going out of bounds.
    pub fn validate(&self) -> Result<()> {
        let corrupt = |msg: String| Err(SuggestError::CorruptSnapshot(msg));

        if self.format_version != FORMAT_VERSION {
            return corrupt(format!("format version {}, expected {}", self.format_version, FORMAT_VERSION));
        }
        if self.max_distance > MAX_SUPPORTED_DISTANCE {
            return Err(SuggestError::UnsupportedDistance {
                requested: self.max_distance,
                max: MAX_SUPPORTED_DISTANCE,
            });
        }
        let state_count = self.states.len();
        if self.initial as usize >= state_count {
            return corrupt(format!("initial state {} of {}", self.initial, state_count));
        }
        let expected_tables = Self::widest_window(self.max_distance) as usize + 1;
        if self.tables.len() != expected_tables {
            return corrupt(format!("{} transition tables, expected {}", self.tables.len(), expected_tables));
        }
        for (window, table) in self.tables.iter().enumerate() {
            if table.window as usize != window || table.entries.len() != state_count * table.row_len() {
                return corrupt(format!("transition table {} has the wrong shape", window));
            }
            if let Some(t) = table.entries.iter().flatten().find(|t| t.target as usize >= state_count) {
                return corrupt(format!("transition to unknown state {}", t.target));
            }
        }
        Ok(())
    }

    fn widest_window(max_distance: u8) -> u32 {
        2 * u32::from(max_distance) + 1
    }

    pub fn max_distance(&self) -> u8 {
        self.max_distance
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.tables.iter().map(|t| t.entries.iter().filter(|e| e.is_some()).count()).sum()
    }

    pub fn summary(&self, state: StateId) -> StateSummary {
        self.states[state as usize]
    }

    pub fn init(&self) -> AutomatonState {
        AutomatonState { state: self.initial, offset: 0 }
    }

    /// Advances `current` on `next`, where `remaining` is the matched word
    /// from index `current.offset` on. `None` means the distance bound can
    /// no longer be met.
    pub fn step(&self, current: AutomatonState, next: char, remaining: &[char]) -> Option<AutomatonState> {
        let window = remaining.len().min(Self::widest_window(self.max_distance) as usize);
        let vector = characteristic_vector(next, &remaining[..window]);
        let transition = self.tables[window].get(current.state, vector)?;
        Some(AutomatonState {
            state: transition.target,
            offset: current.offset + transition.shift as usize,
        })
    }

    /// Whether `state` accepts at the end of a word of `word_len` characters.
    pub fn is_accepting(&self, state: AutomatonState, word_len: usize) -> bool {
        let summary = self.summary(state.state);
        let relative = state.offset as i64 - word_len as i64;
        let lowest = -i64::from(summary.max_base_offset) - i64::from(self.max_distance);
        let highest = -i64::from(summary.max_offset);
        (lowest..=highest).contains(&relative)
    }

    /// Distance between the word and the consumed input. Only meaningful
    /// when `state` is accepting.
    pub fn edit_distance(&self, state: AutomatonState, word_len: usize) -> usize {
        let summary = self.summary(state.state);
        let distance = word_len as i64 - state.offset as i64 - i64::from(summary.max_base_offset);
        distance.max(0) as usize
    }

    pub fn min_edits(&self, state: AutomatonState) -> u8 {
        self.summary(state.state).min_edits
    }
}

/// Bit `i` set iff `window[i] == c`.
fn characteristic_vector(c: char, window: &[char]) -> u32 {
    window
        .iter()
        .enumerate()
        .filter(|&(_, &w)| w == c)
        .fold(0, |vector, (i, _)| vector | (1 << i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(factory: &AutomatonFactory, word: &str, query: &str) -> Option<usize> {
        let word: Vec<char> = word.chars().collect();
        let mut state = factory.init();
        for c in query.chars() {
            state = factory.step(state, c, &word[state.offset..])?;
        }
        factory.is_accepting(state, word.len()).then(|| factory.edit_distance(state, word.len()))
    }

    #[test]
    fn test_rejects_unsupported_distance() {
        assert!(matches!(
            AutomatonFactory::new(5),
            Err(SuggestError::UnsupportedDistance { requested: 5, max: 4 })
        ));
    }

    #[test]
    fn test_state_space_sizes() {
        assert_eq!(AutomatonFactory::new(1).unwrap().state_count(), 5);
        assert_eq!(AutomatonFactory::new(2).unwrap().state_count(), 30);
    }

    #[test]
    fn test_distance_zero_is_exact_match() {
        let factory = AutomatonFactory::new(0).unwrap();
        assert_eq!(run(&factory, "food", "food"), Some(0));
        assert_eq!(run(&factory, "food", "fod"), None);
        assert_eq!(run(&factory, "", ""), Some(0));
    }

    #[test]
    fn test_single_edit() {
        let factory = AutomatonFactory::new(1).unwrap();
        assert_eq!(run(&factory, "food", "fxod"), Some(1));
        assert_eq!(run(&factory, "food", "foo"), Some(1));
        assert_eq!(run(&factory, "food", "foods"), Some(1));
        assert_eq!(run(&factory, "food", "ood"), Some(1));
        assert_eq!(run(&factory, "food", "fxxd"), None);
    }

    #[test]
    fn test_boundary_distances() {
        let factory = AutomatonFactory::new(2).unwrap();
        assert_eq!(run(&factory, "food", "abfood"), Some(2));
        assert_eq!(run(&factory, "food", "abcfood"), None);
        assert_eq!(run(&factory, "kitten", "sitting"), None);
        let factory = AutomatonFactory::new(3).unwrap();
        assert_eq!(run(&factory, "kitten", "sitting"), Some(3));
        assert_eq!(run(&factory, "food", "abcfood"), Some(3));
    }

    #[test]
    fn test_empty_word_and_query() {
        let factory = AutomatonFactory::new(2).unwrap();
        assert_eq!(run(&factory, "", "ab"), Some(2));
        assert_eq!(run(&factory, "", "abc"), None);
        assert_eq!(run(&factory, "ab", ""), Some(2));
        assert_eq!(run(&factory, "abc", ""), None);
    }

    #[test]
    fn test_validate_catches_inconsistent_tables() {
        let factory = AutomatonFactory::new(2).unwrap();
        assert!(factory.validate().is_ok());

        let mut stale = factory.clone();
        stale.format_version += 1;
        assert!(matches!(stale.validate(), Err(SuggestError::CorruptSnapshot(_))));

        let mut wrong_distance = AutomatonFactory::new(1).unwrap();
        wrong_distance.max_distance = 2;
        assert!(matches!(wrong_distance.validate(), Err(SuggestError::CorruptSnapshot(_))));

        let mut bad_initial = factory.clone();
        bad_initial.initial = factory.state_count() as StateId;
        assert!(bad_initial.validate().is_err());

        let mut bad_target = factory.clone();
        if let Some(Some(t)) = bad_target.tables[1].entries.iter_mut().find(|e| e.is_some()) {
            t.target = 999;
        }
        assert!(bad_target.validate().is_err());

        let mut short_table = factory;
        short_table.tables[3].entries.pop();
        assert!(short_table.validate().is_err());
    }

    #[test]
    fn test_characteristic_vector() {
        let window: Vec<char> = "abca".chars().collect();
        assert_eq!(characteristic_vector('a', &window), 0b1001);
        assert_eq!(characteristic_vector('z', &window), 0);
        assert_eq!(characteristic_vector('a', &[]), 0);
    }
}
