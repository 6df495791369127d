use std::collections::HashMap;
use std::fmt;

use ndarray::Array1;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use tracing::{debug, trace};

use crate::config::EnvConfig;
use crate::error::{EnvError, Result};
use crate::tasks::TaskSet;

// Action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Movement {
    Up,
    Right,
    Down,
    Left,
}

impl Movement {
    /// Unit step in grid coordinates. The origin is the top-left corner, so
    /// `Up` decreases `y`.
    pub fn into_vector(self) -> (isize, isize)
    {
        match self {
            Movement::Up    => ( 0,-1),
            Movement::Right => ( 1, 0),
            Movement::Down  => ( 0, 1),
            Movement::Left  => (-1, 0),
        }
    }

    pub fn actions() -> Vec<Movement> {
        vec![Movement::Up, Movement::Right, Movement::Down, Movement::Left]
    }

    /// Decodes the continuous action scalar used by hosts with a `[0, 4)`
    /// action box. The value is rounded to nearest, ties to even.
    pub fn from_action(action: f32) -> Result<Movement> {
        if !action.is_finite() {
            return Err(EnvError::InvalidAction(action));
        }
        let rounded = action.round_ties_even();
        if rounded < 0.0 || rounded > 3.0 {
            return Err(EnvError::InvalidAction(action));
        }
        match rounded as u8 {
            0 => Ok(Movement::Up),
            1 => Ok(Movement::Right),
            2 => Ok(Movement::Down),
            _ => Ok(Movement::Left),
        }
    }

    pub fn to_action(self) -> f32 {
        match self {
            Movement::Up    => 0.0,
            Movement::Right => 1.0,
            Movement::Down  => 2.0,
            Movement::Left  => 3.0,
        }
    }
}

impl Distribution<Movement> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Movement {
        match rng.gen_range(0, 4) {
            0 => Movement::Up,
            1 => Movement::Right,
            2 => Movement::Down,
            _ => Movement::Left,
        }
    }
}


#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const ORIGIN: Pos = Pos { x: 0, y: 0 };

    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Pos) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}


#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl GridSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Applies `movement` to `pos`. A move that would leave the grid is
    /// rejected: the position is returned unchanged together with
    /// `wall_hit = true`.
    pub fn check_movement(&self, pos: Pos, movement: Movement) -> (Pos, bool)
    {
        let blocked = match movement {
            Movement::Up    => pos.y == 0,
            Movement::Right => pos.x + 1 >= self.width,
            Movement::Down  => pos.y + 1 >= self.height,
            Movement::Left  => pos.x == 0,
        };
        if blocked {
            return (pos, true);
        }

        let (dx, dy) = movement.into_vector();
        let new_pos = Pos {
            x: (pos.x as isize + dx) as usize,
            y: (pos.y as isize + dy) as usize,
        };
        (new_pos, false)
    }

    pub fn iter_all_coordinates(&self) -> GridIter {
        GridIter::new(*self)
    }
}

pub struct GridIter {
    currx: usize,
    curry: usize,
    size: GridSize,
}

impl GridIter {
    fn new(size: GridSize) -> GridIter {
        GridIter {
            size,
            currx: 0,
            curry: 0,
        }
    }
}

impl Iterator for GridIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        if self.size.width == 0 || self.curry >= self.size.height {
            return None;
        }
        let pos = Pos { x: self.currx, y: self.curry };
        self.currx += 1;
        if self.currx == self.size.width {
            self.currx = 0;
            self.curry += 1;
        }
        Some(pos)
    }
}


/// What the controlling agent sees: its cell and the Manhattan distance to
/// the active goal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Observation {
    pub x: usize,
    pub y: usize,
    pub distance: usize,
}

impl Observation {
    pub fn pos(&self) -> Pos {
        Pos::new(self.x, self.y)
    }

    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.x, self.y, self.distance)
    }

    pub fn to_array(&self) -> Array1<f32> {
        Array1::from_vec(vec![self.x as f32, self.y as f32, self.distance as f32])
    }
}

pub type Info = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub observation: Observation,
    pub reward: i32,
    pub done: bool,
    pub info: Info,
}

/// Bounds of a box-shaped space, as reported to host frameworks.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpace {
    pub low: f32,
    pub high: f32,
    pub shape: Vec<usize>,
}


/// Capabilities a task-conditioned environment exposes to a training harness.
pub trait TaskEnv {
    fn reset(&mut self) -> Observation;
    fn step(&mut self, action: f32) -> Result<Transition>;
    fn observe(&self) -> Observation;
    fn select_task(&mut self, idx: usize) -> Result<Observation>;
    fn list_task_indices(&self) -> std::ops::Range<usize>;
    fn grid_size(&self) -> GridSize;
    fn goal(&self) -> Pos;
    fn render_to_string(&self) -> String;
    fn observation_space(&self) -> BoxSpace;
    fn action_space(&self) -> BoxSpace;

    fn render(&self) {
        print!("{}", self.render_to_string());
    }
}


/// Deterministic gridworld where every task is a goal cell.
///
/// The agent always starts an episode at the top-left corner. Moves that
/// would leave the grid are absorbed, the reward is 1 whenever the agent ends
/// a step on the goal, and episodes never end on their own.
#[derive(Debug, Clone)]
pub struct GridTaskEnv {
    grid: GridSize,
    tasks: TaskSet,
    active: usize,
    state: Pos,
}

impl GridTaskEnv {
    pub fn new(randomize_tasks: bool, n_tasks: usize, grid_size: (usize, usize), seed: u64) -> Result<Self>
    {
        let grid = GridSize::new(grid_size.0, grid_size.1);
        if grid.width == 0 || grid.height == 0 {
            return Err(EnvError::Configuration(format!(
                "grid dimensions must be positive, got {}x{}",
                grid.width, grid.height
            )));
        }

        let tasks = if randomize_tasks {
            TaskSet::sampled(grid, n_tasks, seed)?
        } else {
            TaskSet::fixed()
        };
        if !tasks.fits(grid) {
            return Err(EnvError::Configuration(format!(
                "fixed goals do not fit a {}x{} grid",
                grid.width, grid.height
            )));
        }
        debug!(width = grid.width, height = grid.height, tasks = tasks.len(), "grid task env setup");

        let mut env = Self {
            grid,
            tasks,
            active: 0,
            state: Pos::ORIGIN,
        };
        env.reset();
        Ok(env)
    }

    pub fn from_config(config: &EnvConfig) -> Result<Self> {
        Self::new(config.randomize_tasks, config.n_tasks, config.grid_size, config.seed)
    }

    pub fn tasks(&self) -> &TaskSet {
        &self.tasks
    }

    pub fn active_task(&self) -> usize {
        self.active
    }

    pub fn position(&self) -> Pos {
        self.state
    }

    /// Typed step, used once the action scalar has been decoded.
    pub fn step_movement(&mut self, movement: Movement) -> Transition {
        let (new_pos, wall_hit) = self.grid.check_movement(self.state, movement);
        if wall_hit {
            trace!(?movement, pos = ?self.state, "move rejected at edge");
        }
        self.state = new_pos;

        let reward = if self.state == self.goal() { 1 } else { 0 };
        let observation = self.observe();
        trace!(?movement, ?observation, reward, "step");
        Transition {
            observation,
            reward,
            done: false,
            info: Info::new(),
        }
    }

    fn marker(&self, pos: Pos) -> char {
        if pos == self.state {
            'X'
        } else if pos == self.goal() {
            'G'
        } else if self.tasks.contains(pos) {
            'P'
        } else {
            ' '
        }
    }
}

impl TaskEnv for GridTaskEnv {
    fn reset(&mut self) -> Observation {
        self.state = Pos::ORIGIN;
        trace!(task = self.active, "reset");
        self.observe()
    }

    fn step(&mut self, action: f32) -> Result<Transition> {
        let movement = Movement::from_action(action)?;
        Ok(self.step_movement(movement))
    }

    fn observe(&self) -> Observation {
        Observation {
            x: self.state.x,
            y: self.state.y,
            distance: self.state.manhattan(self.goal()),
        }
    }

    fn select_task(&mut self, idx: usize) -> Result<Observation> {
        if idx >= self.tasks.len() {
            return Err(EnvError::TaskIndexOutOfRange { index: idx, len: self.tasks.len() });
        }
        self.active = idx;
        debug!(task = idx, goal = ?self.goal(), "task selected");
        Ok(self.reset())
    }

    fn list_task_indices(&self) -> std::ops::Range<usize> {
        0..self.tasks.len()
    }

    fn grid_size(&self) -> GridSize {
        self.grid
    }

    fn goal(&self) -> Pos {
        // `active` is only ever set to a checked index.
        self.tasks.get(self.active).unwrap_or(Pos::ORIGIN)
    }

    fn render_to_string(&self) -> String {
        self.to_string()
    }

    fn observation_space(&self) -> BoxSpace {
        BoxSpace {
            low: 0.0,
            high: (self.grid.width + self.grid.height) as f32,
            shape: vec![3],
        }
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace {
            low: 0.0,
            high: 4.0,
            shape: vec![1],
        }
    }
}

impl fmt::Display for GridTaskEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "current state: ({}, {})", self.state.x, self.state.y)?;
        for y in 0..self.grid.height {
            for x in 0..self.grid.width {
                write!(f, " {} |", self.marker(Pos::new(x, y)))?;
            }
            writeln!(f)?;
            writeln!(f, "{}", "----".repeat(self.grid.width))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rounds_to_nearest() {
        assert_eq!(Movement::from_action(0.0).unwrap(), Movement::Up);
        assert_eq!(Movement::from_action(0.7).unwrap(), Movement::Right);
        assert_eq!(Movement::from_action(1.2).unwrap(), Movement::Right);
        assert_eq!(Movement::from_action(2.4).unwrap(), Movement::Down);
        assert_eq!(Movement::from_action(3.4).unwrap(), Movement::Left);
        assert_eq!(Movement::from_action(-0.4).unwrap(), Movement::Up);
    }

    #[test]
    fn decode_ties_go_to_even() {
        assert_eq!(Movement::from_action(0.5).unwrap(), Movement::Up);
        assert_eq!(Movement::from_action(1.5).unwrap(), Movement::Down);
        assert_eq!(Movement::from_action(2.5).unwrap(), Movement::Down);
    }

    #[test]
    fn decode_rejects_out_of_range() {
        for action in [3.5, 3.9, 4.0, -0.6, -3.0, 100.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(Movement::from_action(action), Err(EnvError::InvalidAction(_))));
        }
    }

    #[test]
    fn decode_inverts_to_action() {
        for movement in Movement::actions() {
            assert_eq!(Movement::from_action(movement.to_action()).unwrap(), movement);
        }
    }

    #[test]
    fn grid_iter_visits_every_cell_once() {
        let grid = GridSize::new(3, 2);
        let cells: Vec<Pos> = grid.iter_all_coordinates().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Pos::new(0, 0));
        assert_eq!(cells[1], Pos::new(1, 0));
        assert_eq!(cells[5], Pos::new(2, 1));
    }

    #[test]
    fn manhattan_is_symmetric() {
        let a = Pos::new(1, 4);
        let b = Pos::new(3, 0);
        assert_eq!(a.manhattan(b), 6);
        assert_eq!(b.manhattan(a), 6);
    }

    #[test]
    fn render_marks_agent_over_goal() {
        let mut env = GridTaskEnv::new(false, 2, (5, 5), 1337).unwrap();
        env.select_task(3).unwrap();
        let text = env.render_to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "current state: (0, 0)");
        // 1 header line + 2 lines per row
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[1], " X |   |   |   | G |");
        assert_eq!(lines[2], "--------------------");

        for _ in 0..4 {
            env.step_movement(Movement::Right);
        }
        let text = env.render_to_string();
        assert!(text.lines().nth(1).unwrap().ends_with(" X |"));
        assert!(!text.contains('G'));
        assert_eq!(text.matches('P').count(), 4);
    }
}
