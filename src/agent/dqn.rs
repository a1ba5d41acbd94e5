use std::path::Path;

use log::debug;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::learner::{Learner, TrainingReport};
use super::traits::QNetwork;
use crate::config::{DqnConfig, LearnConfig};
use crate::environment::Environment;
use crate::error::{DeepQError, Result};
use crate::replay_buffer::{ReplayBuffer, Transition};

/// Number of greedy episodes run by [`Dqn::play`].
pub const PLAY_EPISODES: usize = 10;

/// Step cap of a single greedy episode in [`Dqn::play`].
pub const PLAY_MAX_EPISODE_TIMESTEPS: usize = 1000;

/// Deep Q-Network agent.
///
/// Owns a policy network that selects actions and receives gradient updates,
/// a target network that supplies the bootstrapped future values, and the
/// replay buffer the training updates sample from.
///
/// The target network starts from its own random weights. It is first
/// overwritten with the policy weights the first time a greedy action is
/// taken during a rollout, and afterwards at every scheduled sync of the
/// training loop.
///
/// # Example
///
/// ```rust,no_run
/// use deepq::agent::Dqn;
/// use deepq::builders::DenseNetworkBuilder;
/// use deepq::config::LearnConfig;
/// # use deepq::environment::{Environment, Step};
/// # use ndarray::{array, Array1};
/// # struct Walk;
/// # impl Environment for Walk {
/// #     fn action_n(&self) -> usize { 2 }
/// #     fn reset(&mut self) -> deepq::error::Result<Array1<f32>> { Ok(array![0.0]) }
/// #     fn step(&mut self, _a: usize) -> deepq::error::Result<Step> { Ok(Step::new(array![0.0], 1.0, true)) }
/// # }
/// let mut builder = DenseNetworkBuilder::new(1).hidden(&[32, 32]);
/// let mut agent = Dqn::new(2, |action_n| builder.build(action_n)).unwrap();
///
/// let mut env = Walk;
/// let report = agent.learn(&mut env, &LearnConfig::default().timesteps(500)).unwrap();
/// println!("trained for {} steps", report.state.global_steps);
/// agent.play(&mut env).unwrap();
/// ```
pub struct Dqn<N: QNetwork> {
    action_n: usize,
    policy: N,
    target: N,
    replay: ReplayBuffer,
    weights_initialised: bool,
    rng: StdRng,
}

impl<N: QNetwork> Dqn<N> {
    /// Creates an agent with the default replay capacity.
    ///
    /// `build` is called twice, once for the policy network and once for the
    /// target network, and must return a fresh network with `action_n` outputs.
    pub fn new<F>(action_n: usize, build: F) -> Result<Self>
    where
        F: FnMut(usize) -> Result<N>,
    {
        Self::with_config(action_n, &DqnConfig::default(), build)
    }

    pub fn with_config<F>(action_n: usize, config: &DqnConfig, mut build: F) -> Result<Self>
    where
        F: FnMut(usize) -> Result<N>,
    {
        if action_n == 0 {
            return Err(DeepQError::invalid_parameter("action_n", "must be greater than 0"));
        }
        if config.max_replay_size == 0 {
            return Err(DeepQError::invalid_parameter("max_replay_size", "must be greater than 0"));
        }

        let policy = build(action_n)?;
        let target = build(action_n)?;
        for network in [&policy, &target] {
            if network.action_n() != action_n {
                return Err(DeepQError::dimension_mismatch(
                    format!("{} network outputs", action_n),
                    format!("{} network outputs", network.action_n()),
                ));
            }
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Dqn {
            action_n,
            policy,
            target,
            replay: ReplayBuffer::new(config.max_replay_size),
            weights_initialised: false,
            rng,
        })
    }

    pub fn action_n(&self) -> usize {
        self.action_n
    }

    pub fn policy(&self) -> &N {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut N {
        &mut self.policy
    }

    pub fn target(&self) -> &N {
        &self.target
    }

    pub fn replay(&self) -> &ReplayBuffer {
        &self.replay
    }

    /// Whether the target network has received the policy weights at least once.
    pub fn target_initialised(&self) -> bool {
        self.weights_initialised
    }

    /// Trains the policy network on `env` for `config.timesteps` steps.
    pub fn learn<E: Environment>(&mut self, env: &mut E, config: &LearnConfig) -> Result<TrainingReport> {
        Learner::new(config)?.run(self, env)
    }

    /// Runs [`PLAY_EPISODES`] greedy episodes, rendering every step.
    ///
    /// Only the policy network is used; nothing is learned and the replay
    /// buffer is left untouched. Returns the reward of each episode.
    pub fn play<E: Environment>(&mut self, env: &mut E) -> Result<Vec<f32>> {
        self.play_episodes(env, PLAY_EPISODES, PLAY_MAX_EPISODE_TIMESTEPS)
    }

    pub fn play_episodes<E: Environment>(
        &mut self,
        env: &mut E,
        episodes: usize,
        max_episode_timesteps: usize,
    ) -> Result<Vec<f32>> {
        let mut rewards = Vec::with_capacity(episodes);
        for _ in 0..episodes {
            let mut observation = env.reset()?;
            let mut total = 0.0;
            for _ in 0..max_episode_timesteps {
                let action = self.greedy_action(observation.view())?;
                let step = env.step(action)?;
                env.render()?;
                total += step.reward;
                observation = step.observation;
                if step.done {
                    break;
                }
            }
            rewards.push(total);
        }
        Ok(rewards)
    }

    /// Replaces the policy network with the checkpoint at `path`.
    ///
    /// The target network is not touched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.policy = N::load(path.as_ref())?;
        Ok(())
    }

    /// Writes a checkpoint of the policy network.
    pub fn save_policy(&self, path: impl AsRef<Path>) -> Result<()> {
        self.policy.save(path.as_ref())
    }

    /// Index of the largest predicted Q-value; the first one wins ties.
    pub fn greedy_action(&self, observation: ArrayView1<f32>) -> Result<usize> {
        let q_values = self.policy.predict(observation.insert_axis(Axis(0)))?;
        argmax(q_values.row(0))
    }

    /// Epsilon-greedy action selection used by rollouts.
    ///
    /// Draws `u ~ U(0, 1)` and explores when `u <= epsilon`. The first greedy
    /// action ever taken also copies the policy weights into the target network.
    pub(crate) fn select_action<E: Environment>(
        &mut self,
        env: &mut E,
        observation: ArrayView1<f32>,
        epsilon: f64,
    ) -> Result<usize> {
        let draw: f64 = self.rng.gen();
        if draw <= epsilon {
            let action = env.sample_action(&mut self.rng);
            if action >= self.action_n {
                return Err(DeepQError::InvalidAction { action, action_n: self.action_n });
            }
            return Ok(action);
        }

        let action = self.greedy_action(observation)?;
        if !self.weights_initialised {
            self.target.sync_from(&self.policy)?;
            self.weights_initialised = true;
            debug!("target network initialised from policy network");
        }
        Ok(action)
    }

    pub(crate) fn remember(&mut self, transition: Transition) {
        self.replay.append(transition);
    }

    /// Copies the policy weights into the target network.
    pub fn sync_target(&mut self) -> Result<()> {
        self.target.sync_from(&self.policy)
    }

    /// One TD update of the policy network from a sampled minibatch.
    ///
    /// Fails with [`DeepQError::InsufficientData`] when the buffer holds fewer
    /// than `batch_size` transitions. Returns the training loss.
    pub fn train_step(&mut self, batch_size: usize, discount: f32) -> Result<f32> {
        let batch = self.replay.sample(batch_size, &mut self.rng)?;

        let observations = stack_rows(batch.iter().map(|t| t.observation.view()))?;
        let next_observations = stack_rows(batch.iter().map(|t| t.next_observation.view()))?;

        let curr_qs = self.policy.predict(observations.view())?;
        let future_qs = self.target.predict(next_observations.view())?;
        let targets = td_targets(curr_qs, future_qs.view(), &batch, discount)?;

        self.policy.fit(observations.view(), targets.view(), batch_size)
    }
}

/// Builds the supervised targets of a TD update.
///
/// Row `i` of `curr_qs` is the policy's prediction for `transitions[i]`.
/// Only the entry of the taken action is replaced: by the raw reward when
/// the transition is terminal, otherwise by `reward + discount *
/// max(future_qs[i])`. Every other entry keeps the policy's own prediction.
pub fn td_targets(
    mut curr_qs: Array2<f32>,
    future_qs: ArrayView2<f32>,
    transitions: &[&Transition],
    discount: f32,
) -> Result<Array2<f32>> {
    if curr_qs.nrows() != transitions.len() || future_qs.dim() != curr_qs.dim() {
        return Err(DeepQError::dimension_mismatch(
            format!("{:?}", (transitions.len(), curr_qs.ncols())),
            format!("current {:?}, future {:?}", curr_qs.dim(), future_qs.dim()),
        ));
    }

    let action_n = curr_qs.ncols();
    for (row, transition) in transitions.iter().enumerate() {
        if transition.action >= action_n {
            return Err(DeepQError::InvalidAction { action: transition.action, action_n });
        }
        let target = if transition.done {
            transition.reward
        } else {
            let max_future = future_qs
                .row(row)
                .iter()
                .fold(f32::NEG_INFINITY, |max, &q| max.max(q));
            transition.reward + discount * max_future
        };
        curr_qs[[row, transition.action]] = target;
    }

    Ok(curr_qs)
}

/// First index of the maximum value. NaN entries are ignored.
pub fn argmax(values: ArrayView1<f32>) -> Result<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
        .ok_or_else(|| DeepQError::Numerical("No valid Q-values".to_string()))
}

fn stack_rows<'a>(rows: impl Iterator<Item = ArrayView1<'a, f32>>) -> Result<Array2<f32>> {
    let views: Vec<ArrayView2<f32>> = rows.map(|r| r.insert_axis(Axis(0))).collect();
    ndarray::concatenate(Axis(0), &views)
        .map_err(|e| DeepQError::dimension_mismatch("observations of equal length".to_string(), e.to_string()))
}
