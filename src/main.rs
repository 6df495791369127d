//! Command-line front end for the task gridworld.
//!
//! - `render`  -- print the grid for the selected task
//! - `rollout` -- run one episode per task with a random or optimal policy
//! - `play`    -- steer the agent with w/a/s/d on stdin

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use gridtask::agent::{run_episode, Agent};
use gridtask::planning;
use gridtask::policy::{HumanControlPolicy, Policy, RandomPolicy};
use gridtask::report::{self, EpisodeRecord};
use gridtask::{EnvConfig, EnvError, Registry, TaskEnv, BASE_GRIDWORLD};

const DISCOUNT: f32 = 0.9;
const MAX_DELTA: f32 = 1e-5;

#[derive(Parser)]
#[command(name = "gridtask", version, about)]
struct Cli {
    /// Path to a JSON environment configuration (defaults if not provided).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Registered environment name.
    #[arg(long, global = true, default_value = BASE_GRIDWORLD)]
    env: String,

    /// Task index to select. `rollout` runs every task when omitted.
    #[arg(long, global = true)]
    task: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    Random,
    Optimal,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the grid for the selected task.
    Render,

    /// Run one episode per task and report the rewards.
    Rollout {
        #[arg(long, value_enum, default_value = "optimal")]
        policy: PolicyChoice,

        /// Step budget per episode.
        #[arg(long, default_value_t = 20)]
        steps: usize,

        /// Seed for the random policy.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Write one CSV row per episode to this path.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Control the agent from stdin.
    Play {
        /// Step budget for the episode.
        #[arg(long, default_value_t = 50)]
        steps: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EnvConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EnvConfig::default(),
    };

    let registry = Registry::default();
    let mut env = registry
        .make(&cli.env, &config)
        .with_context(|| format!("Failed to build environment `{}`", cli.env))?;

    match cli.command {
        Commands::Render => cmd_render(env.as_mut(), cli.task),
        Commands::Rollout { policy, steps, seed, csv } => {
            cmd_rollout(env.as_mut(), cli.task, policy, steps, seed, csv)
        }
        Commands::Play { steps } => cmd_play(env.as_mut(), cli.task.unwrap_or(0), steps),
    }
}

fn cmd_render(env: &mut dyn TaskEnv, task: Option<usize>) -> Result<()> {
    env.select_task(task.unwrap_or(0))?;
    env.render();
    Ok(())
}

fn cmd_rollout(
    env: &mut dyn TaskEnv,
    task: Option<usize>,
    choice: PolicyChoice,
    steps: usize,
    seed: u64,
    csv: Option<PathBuf>,
) -> Result<()> {
    let tasks: Vec<usize> = match task {
        Some(idx) => vec![idx],
        None => env.list_task_indices().collect(),
    };

    let mut records = Vec::with_capacity(tasks.len());
    for idx in tasks {
        env.select_task(idx)?;
        let mut policy: Box<dyn Policy> = match choice {
            PolicyChoice::Random => Box::new(RandomPolicy::new(seed.wrapping_add(idx as u64))),
            PolicyChoice::Optimal => Box::new(planning::optimal_policy(
                env.grid_size(),
                env.goal(),
                DISCOUNT,
                MAX_DELTA,
            )?),
        };
        let agent = run_episode(&mut *env, policy.as_mut(), steps)?;
        records.push(EpisodeRecord::new(idx, env.goal(), &agent));
    }

    let total: i32 = records.iter().map(|r| r.total_reward).sum();
    tracing::info!(episodes = records.len(), total_reward = total, "rollout finished");

    if let Some(path) = csv {
        report::write_csv(&path, &records)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote episode records");
    }
    Ok(())
}

fn cmd_play(env: &mut dyn TaskEnv, task: usize, steps: usize) -> Result<()> {
    let mut obs = env.select_task(task)?;
    let mut agent = Agent::new(&*env);
    let stdin = io::stdin();
    let mut policy = HumanControlPolicy::new(stdin.lock());

    env.render();
    while agent.steps < steps {
        let movement = match policy.act(&obs) {
            Ok(movement) => movement,
            Err(EnvError::InputClosed) => break,
            Err(e) => return Err(e.into()),
        };
        let transition = agent.r#move(&mut *env, movement)?;
        obs = transition.observation;
        println!("{:?} => reward {} at {:?}", movement, transition.reward, agent.pos);
        env.render();
    }

    println!("Finished with total reward {} after {} steps", agent.reward, agent.steps);
    Ok(())
}
