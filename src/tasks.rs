use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::debug;

use crate::environment::{GridSize, Pos};
use crate::error::{EnvError, Result};

/// Ordered, immutable list of goal cells. Each goal is one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSet {
    goals: Vec<Pos>,
}

impl TaskSet {
    /// Hand-coded goals, each four steps away from the origin.
    pub fn fixed() -> Self {
        Self {
            goals: vec![
                Pos::new(3, 1),
                Pos::new(1, 3),
                Pos::new(2, 2),
                Pos::new(4, 0),
                Pos::new(0, 4),
            ],
        }
    }

    /// Draws `n_tasks` distinct cells of `grid`.
    ///
    /// Cell ids `0..width*height` are shuffled with a generator seeded from
    /// `seed` and the first `n_tasks` are kept, so the same seed always yields
    /// the same task set.
    pub fn sampled(grid: GridSize, n_tasks: usize, seed: u64) -> Result<Self> {
        let cells = grid.area();
        if n_tasks == 0 {
            return Err(EnvError::Configuration(
                "n_tasks must be positive when randomizing tasks".to_string(),
            ));
        }
        if n_tasks > cells {
            return Err(EnvError::Configuration(format!(
                "cannot draw {} distinct tasks from a {}x{} grid",
                n_tasks, grid.width, grid.height
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut ids: Vec<usize> = (0..cells).collect();
        ids.shuffle(&mut rng);

        let goals: Vec<Pos> = ids
            .into_iter()
            .take(n_tasks)
            .map(|id| Pos::new(id % grid.width, id / grid.width))
            .collect();
        debug!(n_tasks, seed, ?goals, "sampled task set");
        Ok(Self { goals })
    }

    pub fn fits(&self, grid: GridSize) -> bool {
        self.goals.iter().all(|goal| grid.contains(*goal))
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Pos> {
        self.goals.get(idx).copied()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.goals.contains(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.goals.iter().copied()
    }
}
