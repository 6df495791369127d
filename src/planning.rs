//! Exact planning on the deterministic transition model.
//!
//! Useful as an oracle baseline: the greedy policy over the converged values
//! walks the shortest path to the goal, so a learner can be scored against
//! the Manhattan distance of each task.

use ndarray::Array2;
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::environment::{GridSize, Movement, Pos};
use crate::error::{EnvError, Result};
use crate::policy::DetPolicy;

fn check_params(discount: f32, max_delta: f32) -> Result<()> {
    if !(discount > 0.0 && discount < 1.0) {
        return Err(EnvError::Configuration(format!("discount must be in (0, 1), got {}", discount)));
    }
    if !(max_delta > 0.0) {
        return Err(EnvError::Configuration(format!("max_delta must be positive, got {}", max_delta)));
    }
    Ok(())
}

fn reward(goal: Pos, pos: Pos) -> f32 {
    if pos == goal { 1.0 } else { 0.0 }
}

/// Value of each action at `pos`, in `Movement::actions()` order.
/// \sum_{s'} T(s, a, s') * [R(s, a, s') + \gamma V(s')] with a single s'.
fn action_values(grid: GridSize, goal: Pos, pos: Pos, values: &Array2<f32>, discount: f32) -> Vec<(Movement, f32)> {
    Movement::actions()
        .into_iter()
        .map(|a| {
            let (new_pos, _) = grid.check_movement(pos, a);
            (a, reward(goal, new_pos) + discount * values[[new_pos.x, new_pos.y]])
        })
        .collect()
}

fn best_action(candidates: Vec<(Movement, f32)>) -> (Movement, f32) {
    candidates
        .into_iter()
        .max_by_key(|(_, v)| OrderedFloat(*v))
        .unwrap_or((Movement::Up, 0.0))
}

/// Optimal state values for reaching `goal`, indexed `[[x, y]]`.
///
/// There are no terminal states: standing on the goal keeps paying as long
/// as the agent can stay there by bumping into an edge.
pub fn value_iteration(grid: GridSize, goal: Pos, discount: f32, max_delta: f32) -> Result<Array2<f32>> {
    check_params(discount, max_delta)?;
    if !grid.contains(goal) {
        return Err(EnvError::Configuration(format!("goal {:?} outside the grid", goal)));
    }

    let mut values = Array2::<f32>::zeros((grid.width, grid.height));
    let mut delta = max_delta + 1.0;
    let mut sweeps = 0;
    while delta > max_delta { //if the max of all changes is very small, stop
        delta = 0.0;
        for pos in grid.iter_all_coordinates() {
            let (_, new_value) = best_action(action_values(grid, goal, pos, &values, discount));
            delta = delta.max((new_value - values[[pos.x, pos.y]]).abs());
            values[[pos.x, pos.y]] = new_value;
        }
        sweeps += 1;
    }
    debug!(sweeps, ?goal, "value iteration converged");
    Ok(values)
}

pub fn greedy_policy(grid: GridSize, goal: Pos, values: &Array2<f32>, discount: f32) -> DetPolicy {
    let mut policy = DetPolicy::new();
    for pos in grid.iter_all_coordinates() {
        let (movement, _) = best_action(action_values(grid, goal, pos, values, discount));
        policy.policy.insert(pos, movement);
    }
    policy
}

pub fn optimal_policy(grid: GridSize, goal: Pos, discount: f32, max_delta: f32) -> Result<DetPolicy> {
    let values = value_iteration(grid, goal, discount, max_delta)?;
    Ok(greedy_policy(grid, goal, &values, discount))
}
