use std::collections::HashMap;

use tracing::debug;

use crate::config::EnvConfig;
use crate::environment::{GridTaskEnv, TaskEnv};
use crate::error::{EnvError, Result};

pub const BASE_GRIDWORLD: &str = "base-gridworld";

pub type Factory = fn(&EnvConfig) -> Result<Box<dyn TaskEnv>>;

/// Lets a harness build environments by name from a configuration.
pub struct Registry {
    factories: HashMap<String, Factory>,
}

fn make_base_gridworld(config: &EnvConfig) -> Result<Box<dyn TaskEnv>> {
    Ok(Box::new(GridTaskEnv::from_config(config)?))
}

impl Registry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, factory: Factory) -> Result<()> {
        if self.factories.contains_key(name) {
            return Err(EnvError::DuplicateEnv(name.to_string()));
        }
        debug!(name, "registered env");
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn make(&self, name: &str, config: &EnvConfig) -> Result<Box<dyn TaskEnv>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| EnvError::UnknownEnv(name.to_string()))?;
        factory(config)
    }

    pub fn make_from_json(&self, name: &str, json: &str) -> Result<Box<dyn TaskEnv>> {
        let config = EnvConfig::from_json(json)?;
        self.make(name, &config)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(BASE_GRIDWORLD.to_string(), make_base_gridworld);
        registry
    }
}
