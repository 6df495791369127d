use std::collections::HashMap;
use std::io::BufRead;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::environment::{GridSize, Movement, Observation, Pos};
use crate::error::{EnvError, Result};

pub trait Policy
{
    fn act(&mut self, obs: &Observation) -> Result<Movement>;
    fn prob(&self, pos: Pos, movement: Movement) -> f32;
}

pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self
    {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Policy for RandomPolicy
{
    fn act(&mut self, _obs: &Observation) -> Result<Movement> {
        Ok(self.rng.gen())
    }

    fn prob(&self, _pos: Pos, _movement: Movement) -> f32 {
        0.25
    }
}

/// Reads `w`/`a`/`s`/`d` lines from `input`. Other lines are ignored.
pub struct HumanControlPolicy<R> {
    input: R,
}

impl<R: BufRead> HumanControlPolicy<R> {
    pub fn new(input: R) -> Self
    {
        Self { input }
    }
}

impl<R: BufRead> Policy for HumanControlPolicy<R>
{
    fn act(&mut self, _obs: &Observation) -> Result<Movement> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(EnvError::InputClosed);
            }
            let movement = match line.trim() {
                "w" => Some(Movement::Up),
                "s" => Some(Movement::Down),
                "a" => Some(Movement::Left),
                "d" => Some(Movement::Right),
                _ => None,
            };
            if let Some(movement) = movement {
                return Ok(movement);
            }
        }
    }

    fn prob(&self, _pos: Pos, _movement: Movement) -> f32 {
        0.25
    }
}

// Represents deterministic policy
#[derive(Debug, Clone, Default)]
pub struct DetPolicy {
    pub policy: HashMap<Pos, Movement>,
}

impl DetPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    // Initializes the deterministic policy to always go up
    pub fn initialize(&mut self, grid: GridSize) {
        for pos in grid.iter_all_coordinates() {
            self.policy.insert(pos, Movement::Up);
        }
    }
}

impl Policy for DetPolicy {
    fn act(&mut self, obs: &Observation) -> Result<Movement> {
        let pos = obs.pos();
        self.policy
            .get(&pos)
            .copied()
            .ok_or(EnvError::MissingPolicyEntry(pos))
    }

    fn prob(&self, pos: Pos, movement: Movement) -> f32 {
        if self.policy.get(&pos) == Some(&movement) { 1.0 } else { 0.0 }
    }
}
