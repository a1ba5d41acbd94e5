use deepq::{
    agent::{Dqn, QNetwork, FINAL_CHECKPOINT},
    builders::DenseNetworkBuilder,
    config::{DqnConfig, LearnConfig},
    environment::{Environment, Step},
    error::{DeepQError, Result},
    network::NeuralNetwork,
};
use ndarray::{array, Array1};

/// Walk on a line: action 0 steps right for +1 and reaching 5 ends the
/// episode, action 1 steps left for -1.
struct LineWalk {
    position: f32,
}

impl Environment for LineWalk {
    fn action_n(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        self.position = 0.0;
        Ok(array![self.position])
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        match action {
            0 => {
                self.position += 1.0;
                Ok(Step::new(array![self.position], 1.0, self.position >= 5.0))
            }
            1 => {
                self.position -= 1.0;
                Ok(Step::new(array![self.position], -1.0, false))
            }
            _ => Err(DeepQError::InvalidAction { action, action_n: 2 }),
        }
    }
}

fn small_agent(seed: u64) -> Dqn<NeuralNetwork> {
    let mut builder = DenseNetworkBuilder::new(1).hidden(&[32, 32]).learning_rate(1e-3).seed(seed);
    Dqn::with_config(2, &DqnConfig::default().seed(seed), |action_n| builder.build(action_n)).unwrap()
}

#[test]
fn test_end_to_end_training_prefers_the_rewarding_action() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let mut agent = small_agent(42);
    let mut env = LineWalk { position: 0.0 };

    let config = LearnConfig::default()
        .timesteps(500)
        .train_every(1)
        .batch_size(8)
        .max_episode_timesteps(50)
        .plot(false)
        .model_dir(dir.path());
    let report = agent.learn(&mut env, &config).unwrap();

    assert!(report.state.global_steps >= 500);
    assert!(report.state.train_updates > 0);
    assert!(report.state.target_initialised);

    let q = agent.policy().predict(array![[0.0]].view()).unwrap();
    assert!(q[[0, 0]] > q[[0, 1]], "Q(0) = {:?}", q);
    assert_eq!(agent.greedy_action(array![0.0].view()).unwrap(), 0);
}

#[test]
fn test_final_checkpoint_restores_policy() {
    let dir = tempfile::tempdir().unwrap();
    let mut trained = small_agent(1);
    let mut env = LineWalk { position: 0.0 };

    let config = LearnConfig::default()
        .timesteps(100)
        .train_every(1)
        .batch_size(8)
        .max_episode_timesteps(50)
        .plot(false)
        .model_dir(dir.path());
    trained.learn(&mut env, &config).unwrap();

    let mut restored = small_agent(2);
    let target_before = restored.target().weights();
    restored.load(dir.path().join(FINAL_CHECKPOINT)).unwrap();

    let probe = array![[-3.0], [0.0], [2.0]];
    assert_eq!(
        restored.policy().predict(probe.view()).unwrap(),
        trained.policy().predict(probe.view()).unwrap()
    );
    assert_eq!(restored.target().weights(), target_before);
}

#[test]
fn test_play_returns_one_reward_per_episode() {
    let mut agent = small_agent(3);
    let mut env = LineWalk { position: 0.0 };

    let rewards = agent.play_episodes(&mut env, 3, 20).unwrap();

    assert_eq!(rewards.len(), 3);
    // Greedy play on an untrained network is deterministic
    assert!(rewards.windows(2).all(|w| w[0] == w[1]));
    assert!(agent.replay().is_empty());
}
