use crate::error::{Result, SuggestError, MAX_SUPPORTED_DISTANCE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_DISTANCE: u8 = 3;
pub const DEFAULT_LD_WEIGHT: f64 = 6.0;
pub const DEFAULT_TOP_N: usize = 10;

/// Which index answers did-you-mean queries. Results are the same either
/// way; only the cost profile differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    BkTree,
    #[default]
    Automaton,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Largest edit distance a did-you-mean candidate may have.
    pub max_distance: u8,
    /// Exponent applied to the distance when scoring `weight / distance^ld_weight`.
    pub ld_weight: f64,
    pub backend: Backend,
    pub default_top_n: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            ld_weight: DEFAULT_LD_WEIGHT,
            backend: Backend::default(),
            default_top_n: DEFAULT_TOP_N,
        }
    }
}

impl SuggestConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_distance > MAX_SUPPORTED_DISTANCE {
            return Err(SuggestError::UnsupportedDistance {
                requested: self.max_distance,
                max: MAX_SUPPORTED_DISTANCE,
            });
        }
        if !self.ld_weight.is_finite() || self.ld_weight < 0.0 {
            return Err(SuggestError::InvalidConfig(format!(
                "ld_weight must be a non-negative number, got {}",
                self.ld_weight
            )));
        }
        Ok(())
    }
}
