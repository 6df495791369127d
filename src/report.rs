use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::agent::Agent;
use crate::environment::Pos;
use crate::error::Result;

/// One row of an evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeRecord {
    pub task: usize,
    pub goal_x: usize,
    pub goal_y: usize,
    pub steps: usize,
    pub total_reward: i32,
    pub first_goal_step: Option<usize>,
}

impl EpisodeRecord {
    pub fn new(task: usize, goal: Pos, agent: &Agent) -> Self {
        Self {
            task,
            goal_x: goal.x,
            goal_y: goal.y,
            steps: agent.steps,
            total_reward: agent.reward,
            first_goal_step: agent.first_goal_step,
        }
    }
}

pub fn write_records<W: Write>(writer: W, records: &[EpisodeRecord]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv(path: &Path, records: &[EpisodeRecord]) -> Result<()> {
    let file = File::create(path)?;
    write_records(file, records)
}
