use thiserror::Error;

use crate::environment::Pos;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("task index {index} out of range for {len} tasks")]
    TaskIndexOutOfRange { index: usize, len: usize },
    #[error("action {0} does not decode to a movement")]
    InvalidAction(f32),
    #[error("no environment registered as `{0}`")]
    UnknownEnv(String),
    #[error("environment `{0}` is already registered")]
    DuplicateEnv(String),
    #[error("policy has no entry for {0:?}")]
    MissingPolicyEntry(Pos),
    #[error("input finished before the episode ended")]
    InputClosed,
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, EnvError>;
