use gridtask::agent::{run_episode, Agent};
use gridtask::policy::{DetPolicy, HumanControlPolicy, RandomPolicy};
use gridtask::report::{write_records, EpisodeRecord};
use gridtask::{EnvError, GridTaskEnv, Movement, Pos, Registry, TaskEnv, BASE_GRIDWORLD, EnvConfig};
use std::io::Cursor;

fn base_env() -> GridTaskEnv {
    GridTaskEnv::new(false, 2, (5, 5), 1337).unwrap()
}

#[test]
fn agent_tracks_reward_and_first_goal_step() {
    let mut env = base_env();
    let mut agent = Agent::new(&env);
    assert_eq!(agent.pos, Pos::ORIGIN);

    for movement in [Movement::Right, Movement::Down, Movement::Right, Movement::Right] {
        agent.r#move(&mut env, movement).unwrap();
    }
    assert_eq!(agent.pos, Pos::new(3, 1));
    assert_eq!(agent.first_goal_step, Some(4));
    assert_eq!(agent.reward, 1);

    agent.r#move(&mut env, Movement::Left).unwrap();
    agent.r#move(&mut env, Movement::Right).unwrap();
    assert_eq!(agent.reward, 2);
    assert_eq!(agent.steps, 6);
    assert_eq!(agent.first_goal_step, Some(4));
}

#[test]
fn episode_runs_until_step_budget() {
    let mut env = base_env();
    let mut policy = RandomPolicy::new(11);
    let agent = run_episode(&mut env, &mut policy, 100).unwrap();
    assert_eq!(agent.steps, 100);
    assert!(env.grid_size().contains(agent.pos));
    assert_eq!(agent.pos, env.position());
}

#[test]
fn episodes_start_from_origin() {
    let mut env = base_env();
    env.step(1.0).unwrap();
    let mut policy = RandomPolicy::new(0);
    let agent = run_episode(&mut env, &mut policy, 0).unwrap();
    assert_eq!(agent.pos, Pos::ORIGIN);
    assert_eq!(agent.steps, 0);
    assert_eq!(agent.first_goal_step, None);
}

#[test]
fn human_input_drives_a_boxed_env() {
    let mut env = Registry::default()
        .make(BASE_GRIDWORLD, &EnvConfig::default())
        .unwrap();
    env.select_task(3).unwrap();
    let mut policy = HumanControlPolicy::new(Cursor::new("d\nd\nd\nd\n"));
    let agent = run_episode(env.as_mut(), &mut policy, 4).unwrap();
    assert_eq!(agent.pos, Pos::new(4, 0));
    assert_eq!(agent.first_goal_step, Some(4));

    let mut policy = HumanControlPolicy::new(Cursor::new("d\n"));
    let err = run_episode(env.as_mut(), &mut policy, 4).unwrap_err();
    assert!(matches!(err, EnvError::InputClosed));
}

#[test]
fn det_policy_with_gaps_fails_cleanly() {
    let mut env = base_env();
    let mut policy = DetPolicy::new();
    policy.policy.insert(Pos::ORIGIN, Movement::Right);
    let err = run_episode(&mut env, &mut policy, 3).unwrap_err();
    assert!(matches!(err, EnvError::MissingPolicyEntry(pos) if pos == Pos::new(1, 0)));
}

#[test]
fn episode_records_reach_csv() {
    let mut env = base_env();
    let mut records = Vec::new();
    for idx in env.list_task_indices() {
        env.select_task(idx).unwrap();
        let mut policy = RandomPolicy::new(idx as u64);
        let agent = run_episode(&mut env, &mut policy, 10).unwrap();
        records.push(EpisodeRecord::new(idx, env.goal(), &agent));
    }
    assert_eq!(records[2].goal_x, 2);
    assert_eq!(records[2].goal_y, 2);

    let mut out = Vec::new();
    write_records(&mut out, &records).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 6);
    assert!(text.lines().nth(4).unwrap().starts_with("3,4,0,10,"));
}
