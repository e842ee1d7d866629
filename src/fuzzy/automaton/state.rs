//! Parametric states: subsumption-free position sets, used only while the
//! factory precomputes its tables.

use super::position::{subsumption_triangle, Position};
use ahash::AHashSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ParametricState {
    /// Sorted, deduplicated, no position subsumed by another.
    positions: Vec<Position>,
}

impl ParametricState {
    pub fn initial() -> Self {
        Self { positions: vec![Position::new(0, 0)] }
    }

    pub fn from_positions(mut positions: Vec<Position>) -> Self {
        positions.sort_unstable();
        positions.dedup();
        let kept = positions
            .iter()
            .filter(|p| !positions.iter().any(|q| q.subsumes(p)))
            .copied()
            .collect();
        Self { positions: kept }
    }

    /// Shifts every offset so the smallest is 0. Returns the shift applied.
    pub fn canonicalize(mut self) -> (Self, i32) {
        let shift = self.positions.iter().map(|p| p.offset).min().unwrap_or(0);
        for p in &mut self.positions {
            p.offset -= shift;
        }
        (self, shift)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[cfg(test)]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn min_edits(&self) -> u8 {
        self.positions.iter().map(|p| p.edits).min().unwrap_or(0)
    }

    pub fn max_offset(&self) -> i32 {
        self.positions.iter().map(|p| p.offset).max().unwrap_or(0)
    }

    pub fn max_base_offset(&self) -> i32 {
        self.positions.iter().map(Position::base_offset).max().unwrap_or(0)
    }

    /// Successor for one characteristic vector, canonicalized, with the
    /// shift the absolute cursor advances by. `None` when every position dies.
    pub fn transition(&self, vector: u32, window: u32, max_distance: u8) -> Option<(Self, u32)> {
        let mut next = Vec::with_capacity(self.positions.len() * 3);
        for p in &self.positions {
            p.successors(vector, window, max_distance, &mut next);
        }
        let next = Self::from_positions(next);
        if next.is_empty() {
            return None;
        }
        let (state, shift) = next.canonicalize();
        Some((state, shift as u32))
    }
}

/// Every canonical state for `max_distance`: each subsumption-free subset of
/// the triangle around `(0, 0)`, left-shifted to offset 0.
pub(crate) fn enumerate_states(max_distance: u8) -> Vec<ParametricState> {
    let triangle = subsumption_triangle(max_distance);
    let mut seen = AHashSet::new();
    let mut states = Vec::new();
    let mut chosen = Vec::with_capacity(triangle.len());
    collect_subsets(&triangle, 0, &mut chosen, &mut seen, &mut states);
    states
}

// The triangle is ordered by edits, so a later position can never subsume
// an earlier one; checking the new position against `chosen` is enough.
fn collect_subsets(
    triangle: &[Position],
    next: usize,
    chosen: &mut Vec<Position>,
    seen: &mut AHashSet<ParametricState>,
    states: &mut Vec<ParametricState>,
) {
    if next == triangle.len() {
        if chosen.is_empty() {
            return;
        }
        let (state, _) = ParametricState::from_positions(chosen.clone()).canonicalize();
        if seen.insert(state.clone()) {
            states.push(state);
        }
        return;
    }

    collect_subsets(triangle, next + 1, chosen, seen, states);

    let candidate = triangle[next];
    if !chosen.iter().any(|p| p.subsumes(&candidate)) {
        chosen.push(candidate);
        collect_subsets(triangle, next + 1, chosen, seen, states);
        chosen.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_counts_match_known_values() {
        assert_eq!(enumerate_states(0).len(), 1);
        assert_eq!(enumerate_states(1).len(), 5);
        assert_eq!(enumerate_states(2).len(), 30);
        assert_eq!(enumerate_states(3).len(), 196);
    }

    #[test]
    fn test_from_positions_drops_subsumed() {
        let state = ParametricState::from_positions(vec![
            Position::new(1, 1),
            Position::new(0, 0),
            Position::new(0, 0),
            Position::new(3, 1),
        ]);
        assert_eq!(state.positions(), [Position::new(0, 0), Position::new(3, 1)]);
    }

    #[test]
    fn test_canonicalize_shifts_to_zero() {
        let state = ParametricState::from_positions(vec![Position::new(2, 1), Position::new(3, 1)]);
        let (state, shift) = state.canonicalize();
        assert_eq!(shift, 2);
        assert_eq!(state.positions(), [Position::new(0, 1), Position::new(1, 1)]);
        assert_eq!(state.max_offset(), 1);
        assert_eq!(state.max_base_offset(), 0);
        assert_eq!(state.min_edits(), 1);
    }

    #[test]
    fn test_transition_dies_without_budget() {
        let state = ParametricState::from_positions(vec![Position::new(0, 1)]);
        assert!(state.transition(0, 3, 1).is_none());
        let (next, shift) = state.transition(1, 3, 1).unwrap();
        assert_eq!(shift, 1);
        assert_eq!(next.positions(), [Position::new(0, 1)]);
    }
}
