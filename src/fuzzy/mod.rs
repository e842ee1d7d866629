pub mod automaton;
pub mod bktree;
pub mod distance;
pub mod intersection;
