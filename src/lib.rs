//! Task-conditioned gridworld for meta-reinforcement-learning experiments.
//!
//! An agent starts in the top-left cell of a `width x height` grid and is
//! rewarded for standing on the goal cell of the active task. Tasks are
//! either five hand-coded goals or a seeded sample of distinct cells.
//! Environments are built directly through [`GridTaskEnv`] or by name through
//! a [`Registry`].

pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod planning;
pub mod policy;
pub mod registry;
pub mod report;
pub mod tasks;

pub use config::EnvConfig;
pub use environment::{
    BoxSpace, GridSize, GridTaskEnv, Info, Movement, Observation, Pos, TaskEnv, Transition,
};
pub use error::{EnvError, Result};
pub use registry::{Registry, BASE_GRIDWORLD};
pub use tasks::TaskSet;
