use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Construction parameters forwarded by a registry or harness.
///
/// Every field has a default, so a partial JSON object such as
/// `{"randomize_tasks": true, "n_tasks": 10}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Sample goals instead of using the five hand-coded ones.
    pub randomize_tasks: bool,
    /// Number of sampled goals. Ignored unless `randomize_tasks` is set.
    pub n_tasks: usize,
    /// `(width, height)` of the grid.
    pub grid_size: (usize, usize),
    /// Seed for goal sampling.
    pub seed: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            randomize_tasks: false,
            n_tasks: 2,
            grid_size: (5, 5),
            seed: 1337,
        }
    }
}

impl EnvConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
