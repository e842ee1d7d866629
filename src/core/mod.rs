pub mod engine;
pub mod shared;
pub mod trie;
pub mod types;
