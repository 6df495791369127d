use tracing::info;

use crate::environment::{Movement, Pos, TaskEnv, Transition};
use crate::error::Result;
use crate::policy::Policy;

/// Bookkeeping for one episode. The environment never ends an episode, so
/// the caller decides when to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub pos: Pos,
    pub reward: i32,
    pub steps: usize,
    /// 1-based step on which the goal was first reached.
    pub first_goal_step: Option<usize>,
}

impl Agent {
    pub fn new<E: TaskEnv + ?Sized>(env: &E) -> Self
    {
        Self {
            pos: env.observe().pos(),
            reward: 0,
            steps: 0,
            first_goal_step: None,
        }
    }

    /// Sends `movement` through the environment's action encoding.
    pub fn r#move<E: TaskEnv + ?Sized>(&mut self, env: &mut E, movement: Movement) -> Result<Transition>
    {
        let transition = env.step(movement.to_action())?;
        self.steps += 1;
        self.reward += transition.reward;
        self.pos = transition.observation.pos();
        if transition.reward > 0 && self.first_goal_step.is_none() {
            self.first_goal_step = Some(self.steps);
        }
        Ok(transition)
    }
}

/// Resets `env` and lets `policy` act for `max_steps` steps.
pub fn run_episode<E, P>(env: &mut E, policy: &mut P, max_steps: usize) -> Result<Agent>
where
    E: TaskEnv + ?Sized,
    P: Policy + ?Sized,
{
    let mut obs = env.reset();
    let mut agent = Agent::new(&*env);
    for _ in 0..max_steps {
        let movement = policy.act(&obs)?;
        obs = agent.r#move(&mut *env, movement)?.observation;
    }
    info!(
        goal = ?env.goal(),
        steps = agent.steps,
        reward = agent.reward,
        first_goal_step = ?agent.first_goal_step,
        "episode finished"
    );
    Ok(agent)
}
