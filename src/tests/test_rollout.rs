use ndarray::array;

use super::fixtures::{scripted_agent, FixedLengthEnv, LineWalk, ScriptedNetwork};
use crate::agent::{Dqn, EpisodeProgress, Rollout};

/// Policy always picks action 0.
fn rightward_agent() -> Dqn<ScriptedNetwork> {
    scripted_agent(
        ScriptedNetwork::new(vec![0.0, 0.0], vec![1.0, 0.0]),
        ScriptedNetwork::new(vec![0.0, 0.0], vec![0.0, 0.0]),
        1,
    )
}

#[test]
fn test_rollout_ends_on_done_and_closes_env() {
    let mut agent = rightward_agent();
    let mut env = LineWalk::default();
    let mut rollout = Rollout::start(&mut env, 0.0, 1000).unwrap();

    let mut produced = Vec::new();
    while let Some(progress) = rollout.next_step(&mut env, &mut agent).unwrap() {
        assert_eq!(env.closes, 0);
        produced.push(progress);
    }

    assert_eq!(produced.len(), 5);
    assert_eq!(produced[0], EpisodeProgress { steps: 1, rewards: 1.0 });
    assert_eq!(produced[4], EpisodeProgress { steps: 5, rewards: 5.0 });
    assert_eq!(env.closes, 1);
    assert!(rollout.is_finished());

    // An ended rollout stays ended
    assert!(rollout.next_step(&mut env, &mut agent).unwrap().is_none());
    assert_eq!(env.closes, 1);
    assert_eq!(agent.replay().len(), 5);
}

#[test]
fn test_rollout_appends_transitions_in_order() {
    let mut agent = rightward_agent();
    let mut env = LineWalk::default();
    let mut rollout = Rollout::start(&mut env, 0.0, 1000).unwrap();
    while rollout.next_step(&mut env, &mut agent).unwrap().is_some() {}

    let transitions: Vec<_> = agent.replay().iter().collect();
    for (i, t) in transitions.iter().enumerate() {
        assert_eq!(t.observation, array![i as f32]);
        assert_eq!(t.next_observation, array![i as f32 + 1.0]);
        assert_eq!(t.action, 0);
        assert_eq!(t.reward, 1.0);
        assert_eq!(t.done, i == 4);
    }
}

#[test]
fn test_rollout_stops_at_step_cap() {
    let mut agent = rightward_agent();
    let mut env = FixedLengthEnv::new(100);
    let mut rollout = Rollout::start(&mut env, 0.0, 7).unwrap();

    let mut last = None;
    while let Some(progress) = rollout.next_step(&mut env, &mut agent).unwrap() {
        last = Some(progress);
    }

    assert_eq!(last, Some(EpisodeProgress { steps: 7, rewards: 7.0 }));
    assert_eq!(agent.replay().len(), 7);
    assert!(agent.replay().iter().all(|t| !t.done));
    assert_eq!(env.closes, 0);
}

#[test]
fn test_agent_can_train_between_steps() {
    let mut agent = rightward_agent();
    let mut env = FixedLengthEnv::new(10);
    let mut rollout = Rollout::start(&mut env, 0.5, 100).unwrap();

    let mut updates = 0;
    while let Some(progress) = rollout.next_step(&mut env, &mut agent).unwrap() {
        if progress.steps >= 2 {
            agent.train_step(2, 0.8).unwrap();
            updates += 1;
        }
    }

    assert_eq!(updates, 9);
    assert_eq!(agent.policy().fits.len(), 9);
    assert_eq!(rollout.epsilon(), 0.5);
}

#[test]
fn test_start_resets_env() {
    let mut env = FixedLengthEnv::new(3);
    let rollout = Rollout::start(&mut env, 1.0, 10).unwrap();
    assert_eq!(env.resets, 1);
    assert_eq!(rollout.progress(), EpisodeProgress::default());
    assert!(!rollout.is_finished());
}
