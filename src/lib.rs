// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod fuzzy;
pub mod persistence;

pub use crate::config::{Backend, SuggestConfig};
pub use crate::core::engine::SuggestEngine;
pub use crate::core::shared::SharedEngine;
pub use crate::core::types::{KeywordEntry, Suggestion};
pub use crate::error::{Result, SuggestError};
